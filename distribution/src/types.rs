//! Result types for distribution operations

use chrono::{DateTime, Utc};
use registry_core::{ParticipantId, PropertyId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one rental-income distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Unique distribution ID (UUIDv7 for time-ordering)
    pub distribution_id: Uuid,

    /// Distributed property
    pub property_id: PropertyId,

    /// Gross amount handed to the engine
    pub gross_amount: u64,

    /// Floor(gross_amount / share_supply) paid per holder index entry
    pub per_share_amount: u64,

    /// Holder index snapshot at distribution time, duplicates included
    pub recipients: Vec<ParticipantId>,

    /// per_share_amount * recipients.len()
    pub paid_total: u64,

    /// Portion of the gross amount retained by the funding source
    pub remainder: u64,

    /// Execution timestamp
    pub executed_at: DateTime<Utc>,
}

/// Outcome of one fee collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Unique fee ID
    pub fee_id: Uuid,

    /// Property the fee was charged against
    pub property_id: PropertyId,

    /// Account the fee was drawn from
    pub payer: ParticipantId,

    /// Account the fee landed in
    pub collector: ParticipantId,

    /// Caller that triggered the collection (audit trail)
    pub collected_by: ParticipantId,

    /// Fee amount
    pub amount: u64,

    /// Collection timestamp
    pub collected_at: DateTime<Utc>,
}
