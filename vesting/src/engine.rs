//! Vesting and lock operations
//!
//! Like the distribution engine, every method takes the registry by
//! exclusive borrow: one call is one serialized, atomic unit.

use crate::error::{Error, Result};
use registry_core::{ParticipantId, PropertyId, Registry};

/// Share vesting and lock engine
#[derive(Debug, Default)]
pub struct VestingLockEngine;

impl VestingLockEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Release vested shares to a user
    ///
    /// Transfers `floor(amount * vesting_percent / 100)` shares from the
    /// issuer position. Fails with [`Error::State`] and transfers nothing if
    /// vesting is not enabled for the property. Returns the released amount.
    pub fn vest_tokens(
        &self,
        registry: &mut Registry,
        property_id: PropertyId,
        user: &ParticipantId,
        amount: u64,
    ) -> Result<u64> {
        if amount == 0 {
            return Err(Error::Validation(
                "vesting amount must be positive".to_string(),
            ));
        }

        let property = registry.property(property_id)?;

        if !property.vesting_enabled {
            return Err(Error::State(format!(
                "vesting is not enabled for property {property_id}"
            )));
        }

        let released = amount
            .checked_mul(u64::from(property.vesting_percent))
            .ok_or_else(|| {
                registry_core::Error::Arithmetic(format!(
                    "vesting release overflows: {amount} shares at {}%",
                    property.vesting_percent
                ))
            })?
            / 100;

        tracing::debug!(
            property = %property_id,
            user = %user,
            requested = amount,
            released,
            "vesting release computed"
        );

        registry.release_vested_shares(property_id, user, amount, released)?;

        Ok(released)
    }

    /// Lock shares against a property
    ///
    /// Adds to the aggregate per-property counter; no specific holder's
    /// balance is encumbered. The period is journaled but never enforced —
    /// there is no automatic unlock at expiry.
    pub fn lock_tokens(
        &self,
        registry: &mut Registry,
        property_id: PropertyId,
        user: &ParticipantId,
        amount: u64,
        period_secs: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(Error::Validation("lock amount must be positive".to_string()));
        }

        if period_secs == 0 {
            return Err(Error::Validation("lock period must be positive".to_string()));
        }

        registry.lock_shares(property_id, user, amount, period_secs)?;

        Ok(())
    }

    /// Unlock previously locked shares
    pub fn unlock_tokens(
        &self,
        registry: &mut Registry,
        property_id: PropertyId,
        user: &ParticipantId,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(Error::Validation(
                "unlock amount must be positive".to_string(),
            ));
        }

        registry.unlock_shares(property_id, user, amount)?;

        Ok(())
    }
}
