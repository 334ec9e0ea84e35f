//! Configuration for the distribution engine

use registry_core::ParticipantId;
use serde::{Deserialize, Serialize};

/// Declared cap on fee percentages
///
/// Not consulted by `collect_fees`; whether and where to enforce it is a
/// governance-authority decision.
pub const MAX_FEE_PERCENTAGE: u8 = 5;

/// Distribution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Account fees are collected into
    pub fee_collector: ParticipantId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "distribution-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            fee_collector: ParticipantId::new("fee-collector"),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(account) = std::env::var("DISTRIBUTION_FEE_COLLECTOR") {
            config.fee_collector = ParticipantId::new(account);
        }

        Ok(config)
    }
}
