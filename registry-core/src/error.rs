//! Error types for the registry

use crate::types::{ParticipantId, PropertyId};
use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registry errors
///
/// Every precondition failure aborts the whole operation with no partial
/// state mutation; the variant tells the caller which precondition failed.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input (zero amounts, out-of-range percentages, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown property id
    #[error("Property not found: {0}")]
    NotFound(PropertyId),

    /// Caller is not permitted to perform the operation
    #[error("Access denied: {0}")]
    Access(String),

    /// Overflow in a cost or amount computation
    #[error("Arithmetic overflow: {0}")]
    Arithmetic(String),

    /// Operation invalid for the property's current configuration
    #[error("Invalid state: {0}")]
    State(String),

    /// Unlock requested more shares than are currently locked
    #[error("Insufficient locked shares: requested {requested}, locked {locked}")]
    InsufficientLocked {
        /// Shares requested for unlock
        requested: u64,
        /// Shares currently locked
        locked: u64,
    },

    /// Balance shortfall in a share ledger or funding account
    #[error("Insufficient balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Account that came up short
        account: ParticipantId,
        /// Amount required
        requested: u64,
        /// Amount available
        available: u64,
    },

    /// Payout batch rejected by the funding source
    #[error("Payout failed: {0}")]
    Payout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
