//! Configuration for the registry

use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// First property id handed out by the allocator
    pub first_property_id: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            service_name: "registry-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            first_property_id: 1,
        }
    }
}

impl RegistryConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: RegistryConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = RegistryConfig::default();

        if let Ok(name) = std::env::var("REGISTRY_SERVICE_NAME") {
            config.service_name = name;
        }

        if let Ok(first_id) = std::env::var("REGISTRY_FIRST_PROPERTY_ID") {
            config.first_property_id = first_id
                .parse()
                .map_err(|e| crate::Error::Config(format!("Bad REGISTRY_FIRST_PROPERTY_ID: {}", e)))?;
        }

        Ok(config)
    }
}
