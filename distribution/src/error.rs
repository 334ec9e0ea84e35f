//! Error types for the distribution engine

use thiserror::Error;

/// Result type for distribution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Distribution errors
#[derive(Error, Debug)]
pub enum Error {
    /// Registry error (unknown property, arithmetic overflow, payout failure)
    #[error("Registry error: {0}")]
    Registry(#[from] registry_core::Error),

    /// Malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
