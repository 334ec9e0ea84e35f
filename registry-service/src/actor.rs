//! Actor-based serialization for the registry
//!
//! This module implements the single-writer pattern using Tokio actors:
//! - One task exclusively owns the registry and both engines
//! - Every operation runs to completion before the next is taken off the
//!   mailbox, which is the global serialization the accounting assumes
//! - Async message passing with backpressure (bounded channel)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Callers (many tasks)                  │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ RegistryHandle (Clone)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              mpsc::channel (bounded)                  │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │            RegistryActor (single task)                │
//! │   Registry + DistributionEngine + VestingLockEngine   │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use distribution::{DistributionEngine, DistributionReport, FeeRecord};
use registry_core::{
    FundingSource, GovernanceAuthority, IdentityGate, ParticipantId, Property, PropertyId,
    Registry, RegistryEvent, TokenizationRequest,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use vesting::VestingLockEngine;

/// Message sent to the registry actor
pub enum ServiceMessage {
    /// Tokenize a property
    TokenizeProperty {
        /// Tokenization parameters
        request: TokenizationRequest,
        /// Response channel
        response: oneshot::Sender<Result<PropertyId>>,
    },

    /// Reappraise a property
    AppraiseProperty {
        /// Target property
        property_id: PropertyId,
        /// New appraisal value
        new_value: u64,
        /// Response channel
        response: oneshot::Sender<Result<()>>,
    },

    /// Set a participant's verification flag (privileged)
    VerifyUser {
        /// Calling administrator
        admin: ParticipantId,
        /// Affected participant
        user: ParticipantId,
        /// New flag value
        verified: bool,
        /// Response channel
        response: oneshot::Sender<Result<()>>,
    },

    /// Buy shares from the issuer position
    PurchaseTokens {
        /// Buyer
        buyer: ParticipantId,
        /// Target property
        property_id: PropertyId,
        /// Shares to buy
        amount: u64,
        /// Response channel carrying the validated total cost
        response: oneshot::Sender<Result<u64>>,
    },

    /// Distribute rental income over the holder index
    DistributeRentalIncome {
        /// Target property
        property_id: PropertyId,
        /// Gross amount
        amount: u64,
        /// Response channel
        response: oneshot::Sender<Result<DistributionReport>>,
    },

    /// Collect a fee into the fee collector account
    CollectFees {
        /// Caller, recorded for the audit trail
        caller: ParticipantId,
        /// Target property
        property_id: PropertyId,
        /// Account the fee is drawn from
        payer: ParticipantId,
        /// Fee amount
        amount: u64,
        /// Response channel
        response: oneshot::Sender<Result<FeeRecord>>,
    },

    /// Release vested shares
    VestTokens {
        /// Target property
        property_id: PropertyId,
        /// Receiving participant
        user: ParticipantId,
        /// Requested amount
        amount: u64,
        /// Response channel carrying the released amount
        response: oneshot::Sender<Result<u64>>,
    },

    /// Lock shares (aggregate per-property counter)
    LockTokens {
        /// Target property
        property_id: PropertyId,
        /// Participant named in the lock
        user: ParticipantId,
        /// Shares to lock
        amount: u64,
        /// Lock period in seconds (informational)
        period_secs: u64,
        /// Response channel
        response: oneshot::Sender<Result<()>>,
    },

    /// Unlock previously locked shares
    UnlockTokens {
        /// Target property
        property_id: PropertyId,
        /// Participant named in the unlock
        user: ParticipantId,
        /// Shares to unlock
        amount: u64,
        /// Response channel
        response: oneshot::Sender<Result<()>>,
    },

    /// Get a property snapshot
    GetProperty {
        /// Target property
        property_id: PropertyId,
        /// Response channel
        response: oneshot::Sender<Result<Property>>,
    },

    /// Get a property's holder index snapshot
    GetHolderIndex {
        /// Target property
        property_id: PropertyId,
        /// Response channel
        response: oneshot::Sender<Result<Vec<ParticipantId>>>,
    },

    /// Get a participant's share balance for a property
    GetShareBalance {
        /// Target property
        property_id: PropertyId,
        /// Account to look up
        account: ParticipantId,
        /// Response channel
        response: oneshot::Sender<Result<u64>>,
    },

    /// Get journal entries, optionally filtered to one property
    GetEvents {
        /// Property filter
        property_id: Option<PropertyId>,
        /// Response channel
        response: oneshot::Sender<Result<Vec<RegistryEvent>>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes registry messages
pub struct RegistryActor {
    /// Exclusively-owned registry state
    registry: Registry,

    /// Income/fee engine
    distribution: DistributionEngine,

    /// Vesting/lock engine
    vesting: VestingLockEngine,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<ServiceMessage>,
}

impl RegistryActor {
    /// Create new actor
    pub fn new(
        registry: Registry,
        distribution: DistributionEngine,
        vesting: VestingLockEngine,
        mailbox: mpsc::Receiver<ServiceMessage>,
    ) -> Self {
        Self {
            registry,
            distribution,
            vesting,
            mailbox,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                ServiceMessage::Shutdown => break,
                _ => self.handle_message(msg),
            }
        }

        tracing::info!("registry actor stopped");
    }

    /// Handle a single message to completion
    fn handle_message(&mut self, msg: ServiceMessage) {
        match msg {
            ServiceMessage::TokenizeProperty { request, response } => {
                let result = self.registry.tokenize_property(request);
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::AppraiseProperty {
                property_id,
                new_value,
                response,
            } => {
                let result = self.registry.appraise_property(property_id, new_value);
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::VerifyUser {
                admin,
                user,
                verified,
                response,
            } => {
                let result = self.registry.verify_user(&admin, &user, verified);
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::PurchaseTokens {
                buyer,
                property_id,
                amount,
                response,
            } => {
                let result = self.registry.purchase_tokens(&buyer, property_id, amount);
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::DistributeRentalIncome {
                property_id,
                amount,
                response,
            } => {
                let result = self.distribution.distribute_rental_income(
                    &mut self.registry,
                    property_id,
                    amount,
                );
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::CollectFees {
                caller,
                property_id,
                payer,
                amount,
                response,
            } => {
                let result = self.distribution.collect_fees(
                    &mut self.registry,
                    &caller,
                    property_id,
                    &payer,
                    amount,
                );
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::VestTokens {
                property_id,
                user,
                amount,
                response,
            } => {
                let result =
                    self.vesting
                        .vest_tokens(&mut self.registry, property_id, &user, amount);
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::LockTokens {
                property_id,
                user,
                amount,
                period_secs,
                response,
            } => {
                let result = self.vesting.lock_tokens(
                    &mut self.registry,
                    property_id,
                    &user,
                    amount,
                    period_secs,
                );
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::UnlockTokens {
                property_id,
                user,
                amount,
                response,
            } => {
                let result =
                    self.vesting
                        .unlock_tokens(&mut self.registry, property_id, &user, amount);
                let _ = response.send(result.map_err(Error::from));
            }

            ServiceMessage::GetProperty {
                property_id,
                response,
            } => {
                let result = self
                    .registry
                    .property(property_id)
                    .cloned()
                    .map_err(Error::from);
                let _ = response.send(result);
            }

            ServiceMessage::GetHolderIndex {
                property_id,
                response,
            } => {
                let result = self
                    .registry
                    .holder_index(property_id)
                    .map(|index| index.entries().to_vec())
                    .map_err(Error::from);
                let _ = response.send(result);
            }

            ServiceMessage::GetShareBalance {
                property_id,
                account,
                response,
            } => {
                let result = self
                    .registry
                    .share_balance(property_id, &account)
                    .map_err(Error::from);
                let _ = response.send(result);
            }

            ServiceMessage::GetEvents {
                property_id,
                response,
            } => {
                let events = match property_id {
                    Some(id) => self
                        .registry
                        .events_for(id)
                        .into_iter()
                        .cloned()
                        .collect(),
                    None => self.registry.events().to_vec(),
                };
                let _ = response.send(Ok(events));
            }

            ServiceMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<ServiceMessage>,
}

impl RegistryHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<ServiceMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> ServiceMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Tokenize a property
    pub async fn tokenize_property(&self, request: TokenizationRequest) -> Result<PropertyId> {
        self.request(|response| ServiceMessage::TokenizeProperty { request, response })
            .await
    }

    /// Reappraise a property
    pub async fn appraise_property(&self, property_id: PropertyId, new_value: u64) -> Result<()> {
        self.request(|response| ServiceMessage::AppraiseProperty {
            property_id,
            new_value,
            response,
        })
        .await
    }

    /// Set a participant's verification flag (privileged)
    pub async fn verify_user(
        &self,
        admin: ParticipantId,
        user: ParticipantId,
        verified: bool,
    ) -> Result<()> {
        self.request(|response| ServiceMessage::VerifyUser {
            admin,
            user,
            verified,
            response,
        })
        .await
    }

    /// Buy shares from the issuer position; returns the validated total cost
    pub async fn purchase_tokens(
        &self,
        buyer: ParticipantId,
        property_id: PropertyId,
        amount: u64,
    ) -> Result<u64> {
        self.request(|response| ServiceMessage::PurchaseTokens {
            buyer,
            property_id,
            amount,
            response,
        })
        .await
    }

    /// Distribute rental income over the holder index
    pub async fn distribute_rental_income(
        &self,
        property_id: PropertyId,
        amount: u64,
    ) -> Result<DistributionReport> {
        self.request(|response| ServiceMessage::DistributeRentalIncome {
            property_id,
            amount,
            response,
        })
        .await
    }

    /// Collect a fee into the fee collector account
    pub async fn collect_fees(
        &self,
        caller: ParticipantId,
        property_id: PropertyId,
        payer: ParticipantId,
        amount: u64,
    ) -> Result<FeeRecord> {
        self.request(|response| ServiceMessage::CollectFees {
            caller,
            property_id,
            payer,
            amount,
            response,
        })
        .await
    }

    /// Release vested shares; returns the released amount
    pub async fn vest_tokens(
        &self,
        property_id: PropertyId,
        user: ParticipantId,
        amount: u64,
    ) -> Result<u64> {
        self.request(|response| ServiceMessage::VestTokens {
            property_id,
            user,
            amount,
            response,
        })
        .await
    }

    /// Lock shares against a property
    pub async fn lock_tokens(
        &self,
        property_id: PropertyId,
        user: ParticipantId,
        amount: u64,
        period_secs: u64,
    ) -> Result<()> {
        self.request(|response| ServiceMessage::LockTokens {
            property_id,
            user,
            amount,
            period_secs,
            response,
        })
        .await
    }

    /// Unlock previously locked shares
    pub async fn unlock_tokens(
        &self,
        property_id: PropertyId,
        user: ParticipantId,
        amount: u64,
    ) -> Result<()> {
        self.request(|response| ServiceMessage::UnlockTokens {
            property_id,
            user,
            amount,
            response,
        })
        .await
    }

    /// Get a property snapshot
    pub async fn property(&self, property_id: PropertyId) -> Result<Property> {
        self.request(|response| ServiceMessage::GetProperty {
            property_id,
            response,
        })
        .await
    }

    /// Get a property's holder index snapshot
    pub async fn holder_index(&self, property_id: PropertyId) -> Result<Vec<ParticipantId>> {
        self.request(|response| ServiceMessage::GetHolderIndex {
            property_id,
            response,
        })
        .await
    }

    /// Get a participant's share balance for a property
    pub async fn share_balance(
        &self,
        property_id: PropertyId,
        account: ParticipantId,
    ) -> Result<u64> {
        self.request(|response| ServiceMessage::GetShareBalance {
            property_id,
            account,
            response,
        })
        .await
    }

    /// Get journal entries, optionally filtered to one property
    pub async fn events(&self, property_id: Option<PropertyId>) -> Result<Vec<RegistryEvent>> {
        self.request(|response| ServiceMessage::GetEvents {
            property_id,
            response,
        })
        .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(ServiceMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the registry actor and return its handle
pub fn spawn_registry_service(
    config: ServiceConfig,
    identity: Arc<dyn IdentityGate>,
    authority: Arc<dyn GovernanceAuthority>,
    funding: Arc<dyn FundingSource>,
) -> RegistryHandle {
    let registry = Registry::new(config.registry.clone(), identity, authority, funding);
    let distribution = DistributionEngine::new(config.distribution.clone());
    let vesting = VestingLockEngine::new();

    let (tx, rx) = mpsc::channel(config.mailbox_capacity);
    let actor = RegistryActor::new(registry, distribution, vesting, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    RegistryHandle::new(tx)
}
