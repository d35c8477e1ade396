#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::classifier::{CapabilitySet, DEFAULT_AUCTION_INTERFACE_ID, DEFAULT_FLAT_INTERFACE_ID};
use crate::core::{Address, ConfigProvider, InterfaceId};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

pub const DEFAULT_RPC_ENDPOINT: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 8;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 合併 TOML 與命令列後的最終設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensSettings {
    pub rpc_endpoint: String,
    pub registry: Option<Address>,
    pub concurrent_requests: usize,
    pub timeout_seconds: u64,
    pub auction_interface_id: InterfaceId,
    pub flat_interface_id: InterfaceId,
    pub headers: HashMap<String, String>,
}

impl Default for LensSettings {
    fn default() -> Self {
        Self {
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            registry: None,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            auction_interface_id: DEFAULT_AUCTION_INTERFACE_ID,
            flat_interface_id: DEFAULT_FLAT_INTERFACE_ID,
            headers: HashMap::new(),
        }
    }
}

impl LensSettings {
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet {
            auction: self.auction_interface_id,
            flat: self.flat_interface_id,
        }
    }
}

impl ConfigProvider for LensSettings {
    fn rpc_endpoint(&self) -> &str {
        &self.rpc_endpoint
    }

    fn registry_address(&self) -> Option<Address> {
        self.registry
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn auction_interface_id(&self) -> InterfaceId {
        self.auction_interface_id
    }

    fn flat_interface_id(&self) -> InterfaceId {
        self.flat_interface_id
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for LensSettings {
    fn validate(&self) -> Result<()> {
        validate_url("source.endpoint", &self.rpc_endpoint)?;
        validate_range("source.concurrent_requests", self.concurrent_requests, 1, 64)?;
        validate_range("source.timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}
