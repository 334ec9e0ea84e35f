//! Error types for the registry service

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Error, Debug)]
pub enum Error {
    /// Registry error
    #[error("Registry error: {0}")]
    Registry(#[from] registry_core::Error),

    /// Distribution engine error
    #[error("Distribution error: {0}")]
    Distribution(#[from] distribution::Error),

    /// Vesting engine error
    #[error("Vesting error: {0}")]
    Vesting(#[from] vesting::Error),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
