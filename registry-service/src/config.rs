//! Configuration for the registry service

use registry_core::RegistryConfig;
use serde::{Deserialize, Serialize};

/// Registry service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Actor mailbox capacity (bounded for backpressure)
    pub mailbox_capacity: usize,

    /// Administrators recognized by the governance authority at startup
    pub administrators: Vec<String>,

    /// Registry configuration
    pub registry: RegistryConfig,

    /// Distribution engine configuration
    pub distribution: distribution::Config,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "registry-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            mailbox_capacity: 1_000,
            administrators: vec!["governor".to_string()],
            registry: RegistryConfig::default(),
            distribution: distribution::Config::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: ServiceConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = ServiceConfig::default();

        if let Ok(capacity) = std::env::var("SERVICE_MAILBOX_CAPACITY") {
            config.mailbox_capacity = capacity
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad SERVICE_MAILBOX_CAPACITY: {}", e)))?;
        }

        if let Ok(admins) = std::env::var("SERVICE_ADMINISTRATORS") {
            config.administrators = admins.split(',').map(str::to_string).collect();
        }

        Ok(config)
    }
}
