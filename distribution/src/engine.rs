//! Distribution engine
//!
//! Operates on an exclusively borrowed [`Registry`], so a whole distribution
//! is one serialized unit: no other operation can observe it half-done, and
//! the external payout call cannot reenter the registry.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{DistributionReport, FeeRecord};
use chrono::Utc;
use registry_core::{ParticipantId, PropertyId, Registry};
use uuid::Uuid;

/// Rental-income and fee distribution engine
pub struct DistributionEngine {
    config: Config,
}

impl DistributionEngine {
    /// Create a new engine
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configured fee collector account
    pub fn fee_collector(&self) -> &ParticipantId {
        &self.config.fee_collector
    }

    /// Distribute rental income across a property's holder index
    ///
    /// Every index entry is paid `floor(amount / share_supply)`; an entry
    /// appearing n times is paid n times. The division remainder is retained
    /// by the funding source, never redistributed. All-or-nothing: the payout
    /// batch either lands completely or the registry is left untouched.
    pub fn distribute_rental_income(
        &self,
        registry: &mut Registry,
        property_id: PropertyId,
        amount: u64,
    ) -> Result<DistributionReport> {
        if amount == 0 {
            return Err(Error::Validation(
                "distribution amount must be positive".to_string(),
            ));
        }

        let property = registry.property(property_id)?;
        let share_supply = property.share_supply;

        // Pre-validate the accrual so the commit below cannot fail after the
        // payout batch has landed.
        if property.rental_income_accrued.checked_add(amount).is_none() {
            return Err(Error::Registry(registry_core::Error::Arithmetic(format!(
                "accrued rental income overflows for property {property_id}"
            ))));
        }

        let per_share = amount / share_supply;
        let recipients: Vec<ParticipantId> =
            registry.holder_index(property_id)?.entries().to_vec();

        let paid_total = per_share
            .checked_mul(recipients.len() as u64)
            .ok_or_else(|| {
                Error::Registry(registry_core::Error::Arithmetic(format!(
                    "total payout overflows for property {property_id}"
                )))
            })?;
        let remainder = amount.saturating_sub(paid_total);

        // Zero payouts are withheld from the batch; the recipients still
        // appear in the journal entry and the report.
        let payouts: Vec<(ParticipantId, u64)> = if per_share > 0 {
            recipients
                .iter()
                .map(|r| (r.clone(), per_share))
                .collect()
        } else {
            Vec::new()
        };

        registry.funding().credit_batch(&payouts)?;
        registry.record_distribution(
            property_id,
            amount,
            per_share,
            recipients.clone(),
            paid_total,
            remainder,
        )?;

        tracing::debug!(
            property = %property_id,
            per_share,
            payouts = payouts.len(),
            "payout batch credited"
        );

        Ok(DistributionReport {
            distribution_id: Uuid::now_v7(),
            property_id,
            gross_amount: amount,
            per_share_amount: per_share,
            recipients,
            paid_total,
            remainder,
            executed_at: Utc::now(),
        })
    }

    /// Collect a fee from a payer into the fee collector account
    ///
    /// Operator-facing: the identity gate is not consulted here. The caller
    /// is recorded for the audit trail.
    pub fn collect_fees(
        &self,
        registry: &mut Registry,
        caller: &ParticipantId,
        property_id: PropertyId,
        payer: &ParticipantId,
        amount: u64,
    ) -> Result<FeeRecord> {
        if amount == 0 {
            return Err(Error::Validation("fee amount must be positive".to_string()));
        }

        registry.property(property_id)?;

        let collector = self.config.fee_collector.clone();
        registry.funding().move_funds(payer, &collector, amount)?;
        registry.record_fee(property_id, payer, &collector, amount)?;

        tracing::info!(
            property = %property_id,
            caller = %caller,
            payer = %payer,
            amount,
            "fee collected"
        );

        Ok(FeeRecord {
            fee_id: Uuid::now_v7(),
            property_id,
            payer: payer.clone(),
            collector,
            collected_by: caller.clone(),
            amount,
            collected_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_core::{
        EventKind, FundingSource, InMemoryFunding, InMemoryIdentityGate, Registry, RegistryConfig,
        StaticAuthority, TokenizationRequest,
    };
    use std::sync::Arc;

    fn admin() -> ParticipantId {
        ParticipantId::new("governor")
    }

    fn setup() -> (Registry, Arc<InMemoryFunding>, DistributionEngine) {
        let identity = Arc::new(InMemoryIdentityGate::new());
        let authority = Arc::new(StaticAuthority::new([admin()]));
        let funding = Arc::new(InMemoryFunding::new());

        let registry = Registry::new(
            RegistryConfig::default(),
            identity,
            authority,
            funding.clone(),
        );
        let engine = DistributionEngine::new(Config::default());

        (registry, funding, engine)
    }

    fn tokenize(
        registry: &mut Registry,
        owner: &ParticipantId,
        supply: u64,
        price: u64,
    ) -> PropertyId {
        registry
            .tokenize_property(TokenizationRequest {
                requester: owner.clone(),
                location: "12 Harbor Road".to_string(),
                declared_value: 1_000_000,
                share_supply: supply,
                share_price: price,
                rental_income: 0,
                appraisal_value: 1_000_000,
                vesting_enabled: false,
                vesting_period_secs: 0,
                vesting_percent: 0,
                lock_period_secs: 0,
            })
            .unwrap()
    }

    #[test]
    fn test_per_share_floor_division() {
        let (mut registry, funding, engine) = setup();
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");
        registry.verify_user(&admin(), &alice, true).unwrap();
        registry.verify_user(&admin(), &bob, true).unwrap();
        funding.deposit(&bob, 10_000);

        let id = tokenize(&mut registry, &alice, 100, 10);
        registry.purchase_tokens(&bob, id, 40).unwrap();

        // 1050 / 100 = 10 per entry, two entries (issuer + bob)
        let report = engine
            .distribute_rental_income(&mut registry, id, 1_050)
            .unwrap();

        assert_eq!(report.per_share_amount, 10);
        assert_eq!(report.recipients.len(), 2);
        assert_eq!(report.paid_total, 20);
        assert_eq!(report.remainder, 1_030);

        assert_eq!(funding.affordable_balance(&alice), 10);
        // bob started with 10_000 and was paid 10
        assert_eq!(funding.affordable_balance(&bob), 10_010);

        assert_eq!(
            registry.property(id).unwrap().rental_income_accrued,
            1_050
        );
    }

    #[test]
    fn test_payments_weighted_by_occurrence_not_balance() {
        let (mut registry, funding, engine) = setup();
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");
        registry.verify_user(&admin(), &alice, true).unwrap();
        registry.verify_user(&admin(), &bob, true).unwrap();
        funding.deposit(&bob, 10_000);

        let id = tokenize(&mut registry, &alice, 100, 10);

        // Two separate purchases: bob appears twice in the index
        registry.purchase_tokens(&bob, id, 10).unwrap();
        registry.purchase_tokens(&bob, id, 10).unwrap();

        let report = engine
            .distribute_rental_income(&mut registry, id, 300)
            .unwrap();

        // 300 / 100 = 3 per entry; bob is paid twice, alice once. Payment
        // settlement for the purchases themselves is external, so bob's
        // funding balance only moves by the payout.
        assert_eq!(report.per_share_amount, 3);
        assert_eq!(report.recipients.len(), 3);
        assert_eq!(funding.affordable_balance(&bob), 10_006);
        assert_eq!(funding.affordable_balance(&alice), 3);
    }

    #[test]
    fn test_sub_supply_amount_pays_zero_to_everyone() {
        let (mut registry, funding, engine) = setup();
        let alice = ParticipantId::new("alice");
        registry.verify_user(&admin(), &alice, true).unwrap();

        let id = tokenize(&mut registry, &alice, 1_000, 10);

        // 600 / 1000 floors to 0; the whole amount is retained
        let report = engine
            .distribute_rental_income(&mut registry, id, 600)
            .unwrap();

        assert_eq!(report.per_share_amount, 0);
        assert_eq!(report.paid_total, 0);
        assert_eq!(report.remainder, 600);
        assert_eq!(funding.affordable_balance(&alice), 0);

        // The journal still carries the full recipient list
        let events = registry.events_for(id);
        let last = events.last().unwrap();
        match &last.kind {
            EventKind::RentalIncomeDistributed {
                recipients,
                paid_total,
                remainder,
                ..
            } => {
                assert_eq!(recipients.len(), 1);
                assert_eq!(*paid_total, 0);
                assert_eq!(*remainder, 600);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_zero_amount_rejected() {
        let (mut registry, _, engine) = setup();
        let alice = ParticipantId::new("alice");
        registry.verify_user(&admin(), &alice, true).unwrap();
        let id = tokenize(&mut registry, &alice, 100, 10);

        let err = engine
            .distribute_rental_income(&mut registry, id, 0)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(registry.events_for(id).len(), 1); // only the tokenization
    }

    #[test]
    fn test_unknown_property_rejected() {
        let (mut registry, _, engine) = setup();

        let err = engine
            .distribute_rental_income(&mut registry, PropertyId::new(42), 100)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(registry_core::Error::NotFound(_))
        ));
    }

    #[test]
    fn test_collect_fees_moves_funds() {
        let (mut registry, funding, engine) = setup();
        let alice = ParticipantId::new("alice");
        let operator = ParticipantId::new("operator");
        registry.verify_user(&admin(), &alice, true).unwrap();
        funding.deposit(&alice, 1_000);

        let id = tokenize(&mut registry, &alice, 100, 10);
        let record = engine
            .collect_fees(&mut registry, &operator, id, &alice, 250)
            .unwrap();

        assert_eq!(record.amount, 250);
        assert_eq!(record.collected_by, operator);
        assert_eq!(funding.affordable_balance(&alice), 750);
        assert_eq!(funding.affordable_balance(engine.fee_collector()), 250);

        let events = registry.events_for(id);
        assert!(matches!(
            events.last().unwrap().kind,
            EventKind::FeeCollected { amount: 250, .. }
        ));
    }

    #[test]
    fn test_collect_fees_insufficient_payer_balance() {
        let (mut registry, funding, engine) = setup();
        let alice = ParticipantId::new("alice");
        let operator = ParticipantId::new("operator");
        registry.verify_user(&admin(), &alice, true).unwrap();
        funding.deposit(&alice, 100);

        let id = tokenize(&mut registry, &alice, 100, 10);
        let err = engine
            .collect_fees(&mut registry, &operator, id, &alice, 101)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Registry(registry_core::Error::InsufficientBalance { .. })
        ));
        assert_eq!(funding.affordable_balance(&alice), 100);
        assert_eq!(registry.events_for(id).len(), 1);
    }
}
