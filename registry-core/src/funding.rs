//! Payment/settlement boundary
//!
//! The registry never holds participant funds. It checks affordability
//! before accepting a purchase or fee, and hands payout batches to the
//! funding source; actual money movement is the collaborator's problem.

use crate::error::{Error, Result};
use crate::types::ParticipantId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// External funds collaborator
pub trait FundingSource: Send + Sync {
    /// Balance the account can spend right now (read-only check)
    fn affordable_balance(&self, account: &ParticipantId) -> u64;

    /// Move funds between two accounts (fee settlement)
    fn move_funds(&self, from: &ParticipantId, to: &ParticipantId, amount: u64) -> Result<()>;

    /// Credit a payout batch, all-or-nothing
    ///
    /// Either every payout lands or none does; a partially-applied batch is
    /// a contract violation on the implementor's side.
    fn credit_batch(&self, payouts: &[(ParticipantId, u64)]) -> Result<()>;
}

/// In-process funding ledger
///
/// Batches commit under a single write lock, which is what makes
/// `credit_batch` atomic here.
#[derive(Debug, Default)]
pub struct InMemoryFunding {
    accounts: RwLock<HashMap<ParticipantId, u64>>,
}

impl InMemoryFunding {
    /// Create an empty funding ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account (test and bootstrap helper)
    pub fn deposit(&self, account: &ParticipantId, amount: u64) {
        let mut accounts = self.accounts.write();
        *accounts.entry(account.clone()).or_insert(0) += amount;
    }
}

impl FundingSource for InMemoryFunding {
    fn affordable_balance(&self, account: &ParticipantId) -> u64 {
        self.accounts.read().get(account).copied().unwrap_or(0)
    }

    fn move_funds(&self, from: &ParticipantId, to: &ParticipantId, amount: u64) -> Result<()> {
        let mut accounts = self.accounts.write();

        let available = accounts.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(Error::InsufficientBalance {
                account: from.clone(),
                requested: amount,
                available,
            });
        }

        if from == to {
            return Ok(());
        }

        let destination = accounts.get(to).copied().unwrap_or(0);
        let credited = destination
            .checked_add(amount)
            .ok_or_else(|| Error::Arithmetic(format!("credit overflow for {to}")))?;

        *accounts.get_mut(from).expect("payer balance checked above") -= amount;
        accounts.insert(to.clone(), credited);

        Ok(())
    }

    fn credit_batch(&self, payouts: &[(ParticipantId, u64)]) -> Result<()> {
        let mut accounts = self.accounts.write();

        // Validate the whole batch before applying any of it.
        for (recipient, amount) in payouts {
            let current = accounts.get(recipient).copied().unwrap_or(0);
            if current.checked_add(*amount).is_none() {
                return Err(Error::Payout(format!(
                    "credit overflow for {recipient}"
                )));
            }
        }

        for (recipient, amount) in payouts {
            *accounts.entry(recipient.clone()).or_insert(0) += amount;
        }

        Ok(())
    }
}
