//! Core types for the registry
//!
//! All quantities are unsigned integers in currency minor units or whole
//! shares. Arithmetic on them is overflow-checked at the call sites that
//! combine user-supplied values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant identity (wallet address, customer number, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Property identifier, allocated sequentially and never reused
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PropertyId(u64);

impl PropertyId {
    /// Create from a raw counter value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw counter value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tokenized property and its economic parameters
///
/// Created once by tokenization and never deleted; appraisal, locking, and
/// distribution mutate individual fields. Share balances live in the
/// property's [`crate::ShareLedger`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Property ID
    pub id: PropertyId,

    /// Physical location (free text)
    pub location: String,

    /// Declared value at tokenization (currency minor units)
    pub declared_value: u64,

    /// Registrant of the underlying asset (distinct from share ownership)
    pub owner: ParticipantId,

    /// Total share supply, fixed at creation
    pub share_supply: u64,

    /// Price per share (currency minor units)
    pub share_price: u64,

    /// Opaque handle to this property's share ledger
    pub ledger_id: Uuid,

    /// Rental income recorded against this property so far
    pub rental_income_accrued: u64,

    /// Most recent appraisal value
    pub last_appraisal_value: u64,

    /// Whether vesting releases are enabled
    pub vesting_enabled: bool,

    /// Vesting period in seconds (informational)
    pub vesting_period_secs: u64,

    /// Percentage of a vesting request released per call (0-100)
    pub vesting_percent: u8,

    /// Lock period in seconds (informational, no automatic expiry)
    pub lock_period_secs: u64,

    /// Aggregate locked share counter (not tracked per holder)
    pub locked_shares: u64,

    /// Tokenization timestamp
    pub tokenized_at: DateTime<Utc>,
}

/// Parameters for tokenizing a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizationRequest {
    /// Registrant; receives the full share supply at creation
    pub requester: ParticipantId,

    /// Physical location
    pub location: String,

    /// Declared value (currency minor units)
    pub declared_value: u64,

    /// Total share supply (must be > 0)
    pub share_supply: u64,

    /// Price per share (must be > 0)
    pub share_price: u64,

    /// Rental income already accrued at registration
    pub rental_income: u64,

    /// Initial appraisal value
    pub appraisal_value: u64,

    /// Enable vesting releases
    pub vesting_enabled: bool,

    /// Vesting period in seconds
    pub vesting_period_secs: u64,

    /// Vesting release percentage (0-100)
    pub vesting_percent: u8,

    /// Lock period in seconds
    pub lock_period_secs: u64,
}

/// Audit journal entry
///
/// Appended after an operation's state mutations succeed; rejected operations
/// leave no trace here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// Unique event ID (UUIDv7 for time-ordering)
    pub event_id: Uuid,

    /// Affected property, if the fact concerns one
    pub property_id: Option<PropertyId>,

    /// Event timestamp
    pub recorded_at: DateTime<Utc>,

    /// The fact and its changed quantities
    pub kind: EventKind,
}

impl RegistryEvent {
    /// Create a new journal entry stamped with the current time
    pub fn new(property_id: Option<PropertyId>, kind: EventKind) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            property_id,
            recorded_at: Utc::now(),
            kind,
        }
    }
}

/// Journaled facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A property was tokenized
    PropertyTokenized {
        /// Registrant and initial share holder
        owner: ParticipantId,
        /// Declared value
        declared_value: u64,
        /// Share supply minted
        share_supply: u64,
        /// Price per share
        share_price: u64,
    },

    /// A property was reappraised
    PropertyAppraised {
        /// Value before this appraisal
        previous: u64,
        /// New appraisal value
        appraised: u64,
    },

    /// A participant's verification flag changed
    UserVerified {
        /// Affected participant
        user: ParticipantId,
        /// New flag value
        verified: bool,
    },

    /// Shares moved from the issuer position to a buyer
    TokensPurchased {
        /// Buyer
        buyer: ParticipantId,
        /// Shares purchased
        amount: u64,
        /// Validated cost (amount * share_price)
        total_cost: u64,
    },

    /// Rental income was distributed across the holder index
    RentalIncomeDistributed {
        /// Gross amount distributed
        amount: u64,
        /// Floor(amount / share_supply) paid per index entry
        per_share: u64,
        /// Every index entry at distribution time, duplicates included
        recipients: Vec<ParticipantId>,
        /// per_share * recipients.len()
        paid_total: u64,
        /// amount - paid_total, retained by the funding source
        remainder: u64,
    },

    /// A fee was collected into the fee collector account
    FeeCollected {
        /// Account the fee was drawn from
        payer: ParticipantId,
        /// Fee collector account
        collector: ParticipantId,
        /// Fee amount
        amount: u64,
    },

    /// Shares were released under the vesting schedule
    TokensVested {
        /// Receiving participant
        user: ParticipantId,
        /// Amount requested
        requested: u64,
        /// Floor(requested * vesting_percent / 100) actually released
        released: u64,
    },

    /// Shares were added to the aggregate lock counter
    TokensLocked {
        /// Participant named in the lock request
        user: ParticipantId,
        /// Shares locked
        amount: u64,
        /// Requested lock period in seconds
        period_secs: u64,
    },

    /// Shares were removed from the aggregate lock counter
    TokensUnlocked {
        /// Participant named in the unlock request
        user: ParticipantId,
        /// Shares unlocked
        amount: u64,
    },
}
