//! Identity verification and governance authority seams
//!
//! Both are capability traits injected into the registry at construction.
//! The identity gate is the KYC boundary consulted before any participant
//! may transact; the governance authority is the opaque privileged-caller
//! boundary (voting/quorum/timelock live behind it, not here).

use crate::types::ParticipantId;
use dashmap::DashMap;
use std::collections::HashSet;

/// Verification predicate gating participant actions
///
/// Last write wins; no history is retained.
pub trait IdentityGate: Send + Sync {
    /// Whether a participant has passed verification
    fn is_verified(&self, participant: &ParticipantId) -> bool;

    /// Set a participant's verification flag
    fn set_verified(&self, participant: &ParticipantId, verified: bool);
}

/// Process-local identity gate backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryIdentityGate {
    verified: DashMap<ParticipantId, bool>,
}

impl InMemoryIdentityGate {
    /// Create an empty gate (everyone unverified)
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityGate for InMemoryIdentityGate {
    fn is_verified(&self, participant: &ParticipantId) -> bool {
        self.verified.get(participant).map(|v| *v).unwrap_or(false)
    }

    fn set_verified(&self, participant: &ParticipantId, verified: bool) {
        self.verified.insert(participant.clone(), verified);
    }
}

/// Opaque privileged-caller boundary
///
/// The registry only needs the call site to be distinguishable; how a
/// participant became an administrator (election, multisig, timelock) is a
/// governance concern outside this crate.
pub trait GovernanceAuthority: Send + Sync {
    /// Whether a participant may invoke privileged operations
    fn is_administrator(&self, participant: &ParticipantId) -> bool;
}

/// Authority over a fixed administrator set
#[derive(Debug, Default)]
pub struct StaticAuthority {
    admins: HashSet<ParticipantId>,
}

impl StaticAuthority {
    /// Create an authority recognizing the given administrators
    pub fn new(admins: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

impl GovernanceAuthority for StaticAuthority {
    fn is_administrator(&self, participant: &ParticipantId) -> bool {
        self.admins.contains(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_participant_is_unverified() {
        let gate = InMemoryIdentityGate::new();
        assert!(!gate.is_verified(&ParticipantId::new("alice")));
    }

    #[test]
    fn test_last_write_wins() {
        let gate = InMemoryIdentityGate::new();
        let alice = ParticipantId::new("alice");

        gate.set_verified(&alice, true);
        assert!(gate.is_verified(&alice));

        gate.set_verified(&alice, false);
        assert!(!gate.is_verified(&alice));
    }

    #[test]
    fn test_static_authority() {
        let admin = ParticipantId::new("governor");
        let authority = StaticAuthority::new([admin.clone()]);

        assert!(authority.is_administrator(&admin));
        assert!(!authority.is_administrator(&ParticipantId::new("alice")));
    }
}
