pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::RpcClient;
pub use config::LensSettings;
pub use core::classifier::CapabilitySet;
pub use core::lens::LaunchLens;
pub use domain::model::{Address, CapabilityProfile, CompositeRecord, SaleParameters};
pub use utils::error::{LensError, Result};
