//! Per-property share ledger
//!
//! One ledger instance per tokenized property, owned by the registry and
//! mutated only through registry operations. Transfers are balance-checked
//! and atomic: a failed transfer leaves both balances untouched, which is
//! what prevents two concurrent purchases from double-spending the issuer
//! position.

use crate::error::{Error, Result};
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Fungible share balance ledger for a single property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLedger {
    /// Opaque ledger handle, referenced from the owning property
    ledger_id: Uuid,

    /// Total supply, fixed at mint
    total_supply: u64,

    /// Current balances. Invariant: values sum to total_supply.
    balances: HashMap<ParticipantId, u64>,
}

impl ShareLedger {
    /// Mint a new ledger with the full supply credited to the issuer
    pub fn mint(issuer: ParticipantId, total_supply: u64) -> Self {
        let mut balances = HashMap::new();
        balances.insert(issuer, total_supply);

        Self {
            ledger_id: Uuid::now_v7(),
            total_supply,
            balances,
        }
    }

    /// Opaque ledger handle
    pub fn ledger_id(&self) -> Uuid {
        self.ledger_id
    }

    /// Total supply fixed at mint
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Current balance of an account (zero if never credited)
    pub fn balance_of(&self, account: &ParticipantId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Move `amount` shares between accounts
    ///
    /// Checks the sender balance before touching anything; on
    /// [`Error::InsufficientBalance`] both balances are unchanged.
    pub fn transfer(
        &mut self,
        from: &ParticipantId,
        to: &ParticipantId,
        amount: u64,
    ) -> Result<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(Error::InsufficientBalance {
                account: from.clone(),
                requested: amount,
                available,
            });
        }

        if from == to || amount == 0 {
            return Ok(());
        }

        *self.balances.get_mut(from).expect("sender balance checked above") -= amount;
        *self.balances.entry(to.clone()).or_insert(0) += amount;

        Ok(())
    }

    /// Sum of all balances (always equals the supply; exposed for tests and
    /// audit tooling)
    pub fn circulating(&self) -> u64 {
        self.balances.values().sum()
    }
}
