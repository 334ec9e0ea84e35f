//! Property registry state machine
//!
//! Owns the property table, every property's share ledger and holder index,
//! the monotonic id allocator, and the audit journal. All mutation goes
//! through `&mut self` methods, so a caller holding the registry exclusively
//! gets the serialization the accounting semantics assume: one operation
//! completes fully before the next begins.

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::funding::FundingSource;
use crate::holders::HolderIndex;
use crate::identity::{GovernanceAuthority, IdentityGate};
use crate::ledger::ShareLedger;
use crate::types::{
    EventKind, ParticipantId, Property, PropertyId, RegistryEvent, TokenizationRequest,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A property with its share ledger and holder index
struct PropertyRecord {
    property: Property,
    ledger: ShareLedger,
    holders: HolderIndex,
}

/// Source of truth for tokenized properties
pub struct Registry {
    config: RegistryConfig,

    /// KYC boundary, consulted before any participant-facing mutation
    identity: Arc<dyn IdentityGate>,

    /// Privileged-caller boundary for verification administration
    authority: Arc<dyn GovernanceAuthority>,

    /// Payment/settlement collaborator
    funding: Arc<dyn FundingSource>,

    /// Property table. Entries are never removed.
    properties: BTreeMap<PropertyId, PropertyRecord>,

    /// Next id handed out by the allocator; strictly increasing
    next_property_id: u64,

    /// Append-only audit journal
    journal: Vec<RegistryEvent>,
}

impl Registry {
    /// Create a registry with injected collaborators
    pub fn new(
        config: RegistryConfig,
        identity: Arc<dyn IdentityGate>,
        authority: Arc<dyn GovernanceAuthority>,
        funding: Arc<dyn FundingSource>,
    ) -> Self {
        let next_property_id = config.first_property_id;

        Self {
            config,
            identity,
            authority,
            funding,
            properties: BTreeMap::new(),
            next_property_id,
            journal: Vec::new(),
        }
    }

    /// Tokenize a property, minting its share ledger
    ///
    /// The full supply is credited to the requester, who also becomes the
    /// first holder index entry.
    pub fn tokenize_property(&mut self, request: TokenizationRequest) -> Result<PropertyId> {
        if !self.identity.is_verified(&request.requester) {
            return Err(Error::Access(format!(
                "participant {} is not verified",
                request.requester
            )));
        }

        if request.share_supply == 0 {
            return Err(Error::Validation("share supply must be positive".to_string()));
        }

        if request.share_price == 0 {
            return Err(Error::Validation("share price must be positive".to_string()));
        }

        if request.vesting_percent > 100 {
            return Err(Error::Validation(format!(
                "vesting percent {} out of range 0-100",
                request.vesting_percent
            )));
        }

        let id = PropertyId::new(self.next_property_id);
        self.next_property_id += 1;

        let ledger = ShareLedger::mint(request.requester.clone(), request.share_supply);

        let property = Property {
            id,
            location: request.location,
            declared_value: request.declared_value,
            owner: request.requester.clone(),
            share_supply: request.share_supply,
            share_price: request.share_price,
            ledger_id: ledger.ledger_id(),
            rental_income_accrued: request.rental_income,
            last_appraisal_value: request.appraisal_value,
            vesting_enabled: request.vesting_enabled,
            vesting_period_secs: request.vesting_period_secs,
            vesting_percent: request.vesting_percent,
            lock_period_secs: request.lock_period_secs,
            locked_shares: 0,
            tokenized_at: Utc::now(),
        };

        let mut holders = HolderIndex::new();
        holders.append(request.requester.clone());

        self.properties.insert(
            id,
            PropertyRecord {
                property,
                ledger,
                holders,
            },
        );

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::PropertyTokenized {
                owner: request.requester.clone(),
                declared_value: request.declared_value,
                share_supply: request.share_supply,
                share_price: request.share_price,
            },
        ));

        tracing::info!(
            property = %id,
            owner = %request.requester,
            supply = request.share_supply,
            price = request.share_price,
            "property tokenized"
        );

        Ok(id)
    }

    /// Update a property's appraisal value
    ///
    /// Deliberately unrestricted: any caller may reappraise.
    pub fn appraise_property(&mut self, id: PropertyId, new_value: u64) -> Result<()> {
        let record = self.properties.get_mut(&id).ok_or(Error::NotFound(id))?;

        let previous = record.property.last_appraisal_value;
        record.property.last_appraisal_value = new_value;

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::PropertyAppraised {
                previous,
                appraised: new_value,
            },
        ));

        tracing::info!(property = %id, previous, appraised = new_value, "property appraised");

        Ok(())
    }

    /// Set a participant's verification flag (privileged)
    pub fn verify_user(
        &mut self,
        admin: &ParticipantId,
        user: &ParticipantId,
        verified: bool,
    ) -> Result<()> {
        if !self.authority.is_administrator(admin) {
            tracing::warn!(caller = %admin, "verification attempt from non-administrator");
            return Err(Error::Access(format!(
                "{admin} may not administer verification"
            )));
        }

        self.identity.set_verified(user, verified);

        self.journal.push(RegistryEvent::new(
            None,
            EventKind::UserVerified {
                user: user.clone(),
                verified,
            },
        ));

        tracing::info!(user = %user, verified, "user verification updated");

        Ok(())
    }

    /// Buy shares from the issuer position
    ///
    /// Validates affordability against the funding source but does not settle
    /// the payment; only shares move here. Returns the validated total cost.
    pub fn purchase_tokens(
        &mut self,
        buyer: &ParticipantId,
        id: PropertyId,
        amount: u64,
    ) -> Result<u64> {
        if !self.identity.is_verified(buyer) {
            return Err(Error::Access(format!("participant {buyer} is not verified")));
        }

        if amount == 0 {
            return Err(Error::Validation("purchase amount must be positive".to_string()));
        }

        let record = self.properties.get_mut(&id).ok_or(Error::NotFound(id))?;
        let share_price = record.property.share_price;
        let owner = record.property.owner.clone();

        let total_cost = amount.checked_mul(share_price).ok_or_else(|| {
            Error::Arithmetic(format!(
                "purchase cost overflows: {amount} shares at {share_price}"
            ))
        })?;

        let affordable = self.funding.affordable_balance(buyer);
        if affordable < total_cost {
            return Err(Error::InsufficientBalance {
                account: buyer.clone(),
                requested: total_cost,
                available: affordable,
            });
        }

        // Balance-checked and atomic; a concurrent purchase that exhausted
        // the issuer position fails here with no state change.
        record.ledger.transfer(&owner, buyer, amount)?;
        record.holders.append(buyer.clone());

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::TokensPurchased {
                buyer: buyer.clone(),
                amount,
                total_cost,
            },
        ));

        tracing::info!(property = %id, buyer = %buyer, amount, total_cost, "tokens purchased");

        Ok(total_cost)
    }

    // --- Engine-facing mutators ---------------------------------------------
    //
    // The distribution and vesting engines compute their own semantics and
    // commit through these methods, which keep the per-property invariants
    // and the journal in one place.

    /// Accrue a completed income distribution and journal its recipient list
    pub fn record_distribution(
        &mut self,
        id: PropertyId,
        amount: u64,
        per_share: u64,
        recipients: Vec<ParticipantId>,
        paid_total: u64,
        remainder: u64,
    ) -> Result<()> {
        let record = self.properties.get_mut(&id).ok_or(Error::NotFound(id))?;

        record.property.rental_income_accrued = record
            .property
            .rental_income_accrued
            .checked_add(amount)
            .ok_or_else(|| {
                Error::Arithmetic(format!("accrued rental income overflows for property {id}"))
            })?;

        let recipient_count = recipients.len();

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::RentalIncomeDistributed {
                amount,
                per_share,
                recipients,
                paid_total,
                remainder,
            },
        ));

        tracing::info!(
            property = %id,
            amount,
            per_share,
            recipients = recipient_count,
            paid_total,
            remainder,
            "rental income distributed"
        );

        Ok(())
    }

    /// Journal a collected fee
    pub fn record_fee(
        &mut self,
        id: PropertyId,
        payer: &ParticipantId,
        collector: &ParticipantId,
        amount: u64,
    ) -> Result<()> {
        if !self.properties.contains_key(&id) {
            return Err(Error::NotFound(id));
        }

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::FeeCollected {
                payer: payer.clone(),
                collector: collector.clone(),
                amount,
            },
        ));

        tracing::info!(property = %id, payer = %payer, amount, "fee collected");

        Ok(())
    }

    /// Transfer vested shares from the issuer position to a user
    pub fn release_vested_shares(
        &mut self,
        id: PropertyId,
        user: &ParticipantId,
        requested: u64,
        released: u64,
    ) -> Result<()> {
        let record = self.properties.get_mut(&id).ok_or(Error::NotFound(id))?;
        let owner = record.property.owner.clone();

        record.ledger.transfer(&owner, user, released)?;

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::TokensVested {
                user: user.clone(),
                requested,
                released,
            },
        ));

        tracing::info!(property = %id, user = %user, requested, released, "tokens vested");

        Ok(())
    }

    /// Add shares to the aggregate per-property lock counter
    pub fn lock_shares(
        &mut self,
        id: PropertyId,
        user: &ParticipantId,
        amount: u64,
        period_secs: u64,
    ) -> Result<()> {
        let record = self.properties.get_mut(&id).ok_or(Error::NotFound(id))?;

        let new_locked = record
            .property
            .locked_shares
            .checked_add(amount)
            .ok_or_else(|| {
                Error::Arithmetic(format!("locked share counter overflows for property {id}"))
            })?;

        if new_locked > record.property.share_supply {
            return Err(Error::Validation(format!(
                "locking {amount} shares would exceed supply {}",
                record.property.share_supply
            )));
        }

        record.property.locked_shares = new_locked;

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::TokensLocked {
                user: user.clone(),
                amount,
                period_secs,
            },
        ));

        tracing::info!(property = %id, user = %user, amount, locked = new_locked, "tokens locked");

        Ok(())
    }

    /// Remove shares from the aggregate per-property lock counter
    pub fn unlock_shares(
        &mut self,
        id: PropertyId,
        user: &ParticipantId,
        amount: u64,
    ) -> Result<()> {
        let record = self.properties.get_mut(&id).ok_or(Error::NotFound(id))?;

        let locked = record.property.locked_shares;
        if locked < amount {
            return Err(Error::InsufficientLocked {
                requested: amount,
                locked,
            });
        }

        record.property.locked_shares = locked - amount;

        self.journal.push(RegistryEvent::new(
            Some(id),
            EventKind::TokensUnlocked {
                user: user.clone(),
                amount,
            },
        ));

        tracing::info!(property = %id, user = %user, amount, locked = locked - amount, "tokens unlocked");

        Ok(())
    }

    // --- Queries ------------------------------------------------------------

    /// Look up a property
    pub fn property(&self, id: PropertyId) -> Result<&Property> {
        self.properties
            .get(&id)
            .map(|r| &r.property)
            .ok_or(Error::NotFound(id))
    }

    /// Ids of every tokenized property, in allocation order
    pub fn property_ids(&self) -> Vec<PropertyId> {
        self.properties.keys().copied().collect()
    }

    /// A property's distribution fan-out list
    pub fn holder_index(&self, id: PropertyId) -> Result<&HolderIndex> {
        self.properties
            .get(&id)
            .map(|r| &r.holders)
            .ok_or(Error::NotFound(id))
    }

    /// A participant's share balance for a property
    pub fn share_balance(&self, id: PropertyId, account: &ParticipantId) -> Result<u64> {
        self.properties
            .get(&id)
            .map(|r| r.ledger.balance_of(account))
            .ok_or(Error::NotFound(id))
    }

    /// Aggregate locked share counter for a property
    pub fn locked_shares(&self, id: PropertyId) -> Result<u64> {
        self.property(id).map(|p| p.locked_shares)
    }

    /// Whether a participant passes the identity gate
    pub fn is_verified(&self, participant: &ParticipantId) -> bool {
        self.identity.is_verified(participant)
    }

    /// Full audit journal, oldest first
    pub fn events(&self) -> &[RegistryEvent] {
        &self.journal
    }

    /// Journal entries touching one property
    pub fn events_for(&self, id: PropertyId) -> Vec<&RegistryEvent> {
        self.journal
            .iter()
            .filter(|e| e.property_id == Some(id))
            .collect()
    }

    /// The payment/settlement collaborator
    pub fn funding(&self) -> Arc<dyn FundingSource> {
        Arc::clone(&self.funding)
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}
