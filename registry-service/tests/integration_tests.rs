//! End-to-end tests driving the full service stack through the actor handle

use registry_core::{
    EventKind, FundingSource, InMemoryFunding, InMemoryIdentityGate, ParticipantId,
    StaticAuthority, TokenizationRequest,
};
use registry_service::{spawn_registry_service, RegistryHandle, ServiceConfig};
use std::sync::Arc;

fn admin() -> ParticipantId {
    ParticipantId::new("governor")
}

fn spawn_service() -> (RegistryHandle, Arc<InMemoryFunding>) {
    let identity = Arc::new(InMemoryIdentityGate::new());
    let authority = Arc::new(StaticAuthority::new([admin()]));
    let funding = Arc::new(InMemoryFunding::new());

    let handle = spawn_registry_service(
        ServiceConfig::default(),
        identity,
        authority,
        funding.clone(),
    );

    (handle, funding)
}

fn harbor_road(requester: &ParticipantId) -> TokenizationRequest {
    TokenizationRequest {
        requester: requester.clone(),
        location: "12 Harbor Road".to_string(),
        declared_value: 50_000_000,
        share_supply: 1_000,
        share_price: 10,
        rental_income: 0,
        appraisal_value: 50_000_000,
        vesting_enabled: true,
        vesting_period_secs: 86_400,
        vesting_percent: 40,
        lock_period_secs: 86_400,
    }
}

/// Tokenize with supply 1000 / price 10, three verified buyers purchase
/// 100/200/300 shares, then distribute 600: floor(600/1000) = 0 lands on each
/// of the four index entries, the whole 600 is retained.
#[tokio::test]
async fn test_sub_supply_distribution_pays_zero() {
    let (handle, funding) = spawn_service();
    let issuer = ParticipantId::new("issuer");
    handle
        .verify_user(admin(), issuer.clone(), true)
        .await
        .unwrap();

    let id = handle.tokenize_property(harbor_road(&issuer)).await.unwrap();

    for (name, shares) in [("buyer-1", 100u64), ("buyer-2", 200), ("buyer-3", 300)] {
        let buyer = ParticipantId::new(name);
        handle
            .verify_user(admin(), buyer.clone(), true)
            .await
            .unwrap();
        funding.deposit(&buyer, 100_000);
        handle.purchase_tokens(buyer, id, shares).await.unwrap();
    }

    let report = handle.distribute_rental_income(id, 600).await.unwrap();

    assert_eq!(report.per_share_amount, 0);
    assert_eq!(report.recipients.len(), 4);
    assert_eq!(report.paid_total, 0);
    assert_eq!(report.remainder, 600);

    // Nobody's funding balance moved
    for name in ["buyer-1", "buyer-2", "buyer-3"] {
        assert_eq!(
            funding.affordable_balance(&ParticipantId::new(name)),
            100_000
        );
    }
    assert_eq!(funding.affordable_balance(&issuer), 0);

    // The journal entry still carries all four recipients
    let events = handle.events(Some(id)).await.unwrap();
    let distribution = events
        .iter()
        .find_map(|e| match &e.kind {
            EventKind::RentalIncomeDistributed {
                recipients,
                paid_total,
                remainder,
                ..
            } => Some((recipients.len(), *paid_total, *remainder)),
            _ => None,
        })
        .expect("distribution event journaled");
    assert_eq!(distribution, (4, 0, 600));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_full_property_lifecycle() {
    let (handle, funding) = spawn_service();
    let issuer = ParticipantId::new("issuer");
    let investor = ParticipantId::new("investor");
    let operator = ParticipantId::new("operator");

    handle
        .verify_user(admin(), issuer.clone(), true)
        .await
        .unwrap();
    handle
        .verify_user(admin(), investor.clone(), true)
        .await
        .unwrap();
    funding.deposit(&investor, 1_000_000);

    // 1. Tokenize
    let id = handle.tokenize_property(harbor_road(&issuer)).await.unwrap();

    // 2. Purchase: 400 shares at 10 each
    let cost = handle
        .purchase_tokens(investor.clone(), id, 400)
        .await
        .unwrap();
    assert_eq!(cost, 4_000);
    assert_eq!(
        handle.share_balance(id, investor.clone()).await.unwrap(),
        400
    );

    // 3. Appraise upward
    handle.appraise_property(id, 55_000_000).await.unwrap();
    assert_eq!(
        handle.property(id).await.unwrap().last_appraisal_value,
        55_000_000
    );

    // 4. Distribute 2500: floor(2500/1000) = 2 per entry, 2 entries
    let report = handle.distribute_rental_income(id, 2_500).await.unwrap();
    assert_eq!(report.per_share_amount, 2);
    assert_eq!(report.paid_total, 4);
    assert_eq!(report.remainder, 2_496);
    assert_eq!(funding.affordable_balance(&investor), 1_000_002);

    // 5. Vest 50 at 40 percent: 20 released to the investor
    let released = handle
        .vest_tokens(id, investor.clone(), 50)
        .await
        .unwrap();
    assert_eq!(released, 20);
    assert_eq!(
        handle.share_balance(id, investor.clone()).await.unwrap(),
        420
    );

    // 6. Lock and unlock
    handle
        .lock_tokens(id, investor.clone(), 100, 86_400)
        .await
        .unwrap();
    assert_eq!(handle.property(id).await.unwrap().locked_shares, 100);
    handle
        .unlock_tokens(id, investor.clone(), 100)
        .await
        .unwrap();
    assert_eq!(handle.property(id).await.unwrap().locked_shares, 0);

    // 7. Collect a 150 fee from the investor
    let fee = handle
        .collect_fees(operator.clone(), id, investor.clone(), 150)
        .await
        .unwrap();
    assert_eq!(fee.amount, 150);
    assert_eq!(funding.affordable_balance(&investor), 999_852);

    // 8. The journal saw every step
    let events = handle.events(Some(id)).await.unwrap();
    let kinds: Vec<&'static str> = events
        .iter()
        .map(|e| match e.kind {
            EventKind::PropertyTokenized { .. } => "tokenized",
            EventKind::PropertyAppraised { .. } => "appraised",
            EventKind::TokensPurchased { .. } => "purchased",
            EventKind::RentalIncomeDistributed { .. } => "distributed",
            EventKind::TokensVested { .. } => "vested",
            EventKind::TokensLocked { .. } => "locked",
            EventKind::TokensUnlocked { .. } => "unlocked",
            EventKind::FeeCollected { .. } => "fee",
            EventKind::UserVerified { .. } => "verified",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "tokenized",
            "purchased",
            "appraised",
            "distributed",
            "vested",
            "locked",
            "unlocked",
            "fee"
        ]
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unverified_investor_cannot_transact() {
    let (handle, funding) = spawn_service();
    let issuer = ParticipantId::new("issuer");
    let mallory = ParticipantId::new("mallory");

    handle
        .verify_user(admin(), issuer.clone(), true)
        .await
        .unwrap();
    funding.deposit(&mallory, 1_000_000);

    let id = handle.tokenize_property(harbor_road(&issuer)).await.unwrap();
    let events_before = handle.events(None).await.unwrap().len();

    let err = handle
        .purchase_tokens(mallory.clone(), id, 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        registry_service::Error::Registry(registry_core::Error::Access(_))
    ));

    // No state change, no journal entry
    assert_eq!(handle.events(None).await.unwrap().len(), events_before);
    assert_eq!(handle.share_balance(id, mallory).await.unwrap(), 0);
    assert_eq!(handle.holder_index(id).await.unwrap().len(), 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_revoked_verification_blocks_further_purchases() {
    let (handle, funding) = spawn_service();
    let issuer = ParticipantId::new("issuer");
    let investor = ParticipantId::new("investor");

    handle
        .verify_user(admin(), issuer.clone(), true)
        .await
        .unwrap();
    handle
        .verify_user(admin(), investor.clone(), true)
        .await
        .unwrap();
    funding.deposit(&investor, 100_000);

    let id = handle.tokenize_property(harbor_road(&issuer)).await.unwrap();
    handle
        .purchase_tokens(investor.clone(), id, 50)
        .await
        .unwrap();

    // Governance revokes the investor
    handle
        .verify_user(admin(), investor.clone(), false)
        .await
        .unwrap();

    let err = handle
        .purchase_tokens(investor.clone(), id, 50)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        registry_service::Error::Registry(registry_core::Error::Access(_))
    ));

    // The shares already bought are untouched
    assert_eq!(handle.share_balance(id, investor).await.unwrap(), 50);

    handle.shutdown().await.unwrap();
}
