use crate::config::toml_config::TomlConfig;
use crate::config::LensSettings;
use crate::core::{Address, InterfaceId};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "launch-lens")]
#[command(about = "Aggregated read-only view over collection launch records")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Registry contract address
    #[arg(long)]
    pub registry: Option<Address>,

    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub auction_interface_id: Option<InterfaceId>,

    #[arg(long)]
    pub flat_interface_id: Option<InterfaceId>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Report which capability profile a record implements
    Classify { record: Address },

    /// Build the composite view of one record
    Aggregate {
        record: Address,

        #[arg(long)]
        requester: Option<Address>,
    },

    /// Aggregate a window of the registry listing for one type tag
    Collect {
        #[arg(long)]
        type_tag: u64,

        #[arg(long, default_value = "0")]
        offset: u64,

        #[arg(long, default_value = "20")]
        limit: u64,

        #[arg(long)]
        requester: Option<Address>,
    },
}

impl CliConfig {
    /// 先讀 TOML（若有指定），再以命令列參數覆蓋
    pub fn load_settings(&self) -> Result<LensSettings> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_settings(),
            None => LensSettings::default(),
        };

        if let Some(url) = &self.rpc_url {
            settings.rpc_endpoint = url.clone();
        }
        if let Some(registry) = self.registry {
            settings.registry = Some(registry);
        }
        if let Some(concurrent) = self.concurrent_requests {
            settings.concurrent_requests = concurrent;
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(id) = self.auction_interface_id {
            settings.auction_interface_id = id;
        }
        if let Some(id) = self.flat_interface_id {
            settings.flat_interface_id = id;
        }

        Ok(settings)
    }
}
