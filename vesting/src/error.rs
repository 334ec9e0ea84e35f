//! Error types for the vesting engine

use thiserror::Error;

/// Result type for vesting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Vesting errors
#[derive(Error, Debug)]
pub enum Error {
    /// Registry error (unknown property, insufficient locked shares, ...)
    #[error("Registry error: {0}")]
    Registry(#[from] registry_core::Error),

    /// Malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Operation invalid for the property's current configuration
    #[error("Invalid state: {0}")]
    State(String),
}
