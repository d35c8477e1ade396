use crate::config::{
    LensSettings, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_RPC_ENDPOINT, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::classifier::{DEFAULT_AUCTION_INTERFACE_ID, DEFAULT_FLAT_INTERFACE_ID};
use crate::core::{Address, InterfaceId};
use crate::utils::error::{LensError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    pub registry: Option<RegistryConfig>,
    pub capabilities: Option<CapabilityConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityConfig {
    pub auction_interface_id: Option<InterfaceId>,
    pub flat_interface_id: Option<InterfaceId>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LensError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LensError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RPC_URL})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LensError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_settings(self) -> LensSettings {
        let capabilities = self.capabilities.as_ref();
        LensSettings {
            rpc_endpoint: self
                .source
                .endpoint
                .unwrap_or_else(|| DEFAULT_RPC_ENDPOINT.to_string()),
            registry: self.registry.map(|r| r.address),
            concurrent_requests: self
                .source
                .concurrent_requests
                .unwrap_or(DEFAULT_CONCURRENT_REQUESTS),
            timeout_seconds: self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            auction_interface_id: capabilities
                .and_then(|c| c.auction_interface_id)
                .unwrap_or(DEFAULT_AUCTION_INTERFACE_ID),
            flat_interface_id: capabilities
                .and_then(|c| c.flat_interface_id)
                .unwrap_or(DEFAULT_FLAT_INTERFACE_ID),
            headers: self.source.headers.unwrap_or_default(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_settings().validate()
    }
}
