//! # Domain Entities
//!
//! Core entities for the Deadman Switch: the attested transaction record,
//! the per-vault activation state, and the immutable domain context.

use super::errors::{DeadmanError, Result};
use super::value_objects::{Address, Hash, OperationKind, SwitchPhase, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attested claim about the vault's most recent transaction.
///
/// Every field is attester-supplied and untrusted until the fingerprint is
/// recomputed and matches `claimed_fingerprint`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAttestation {
    /// Vault that executed the transaction.
    pub vault_address: Address,
    /// Call target.
    pub destination: Address,
    /// Native-asset amount sent.
    pub value: U256,
    /// Calldata.
    pub payload: Vec<u8>,
    /// Call or delegate-call.
    pub operation: OperationKind,
    /// Gas budget for the inner execution (`safeTxGas`).
    pub exec_gas_budget: U256,
    /// Fixed gas overhead charged for refunds.
    pub base_gas_cost: U256,
    /// Refund gas price.
    pub gas_price: U256,
    /// Refund token; zero address means native asset.
    pub gas_token: Address,
    /// Refund recipient.
    pub refund_receiver: Address,
    /// Vault nonce consumed by this transaction.
    pub sequence_number: U256,
    /// Block time at which the transaction was mined.
    pub observed_timestamp: U256,
    /// Digest the attester asserts matches this transaction.
    pub claimed_fingerprint: Hash,
}

/// Origin metadata delivered alongside the attestation words.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationMetadata {
    /// Chain the proof was generated against.
    pub source_chain_id: u64,
    /// Proof-schema identifier.
    pub query_schema: Hash,
    /// Identity that delivered the callback.
    pub relay: Address,
    /// Oracle query identifier (informational).
    pub query_id: U256,
}

/// Per-deployment anchors. Fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DomainContext {
    /// Vault's domain separator, read once from the vault.
    pub domain_separator: Hash,
    /// The protected vault.
    pub vault_address: Address,
    /// Expected attestation-source chain.
    pub source_chain_id: u64,
    /// Expected proof schema.
    pub query_schema: Hash,
    /// Expected callback relay.
    pub attestation_relay: Address,
}

/// Mutable per-vault record owned by the switch service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationState {
    /// Administrative identity.
    pub owner: Address,
    /// Minimum silence (seconds) before activation.
    pub dormancy_period_secs: u64,
    /// One-shot flag. Never reset.
    pub switch_activated: bool,
    /// Threshold applied on every signer addition.
    threshold: u64,
    /// Identities granted authority on activation.
    contingent_signers: BTreeSet<Address>,
}

impl ActivationState {
    /// Create an armed state.
    ///
    /// # Errors
    /// `ZeroThreshold` if `threshold == 0`, `InvalidSigner` on a zero address.
    pub fn new(
        owner: Address,
        dormancy_period_secs: u64,
        threshold: u64,
        signers: impl IntoIterator<Item = Address>,
    ) -> Result<Self> {
        if threshold == 0 {
            return Err(DeadmanError::ZeroThreshold);
        }
        let mut contingent_signers = BTreeSet::new();
        for signer in signers {
            if signer.is_zero() {
                return Err(DeadmanError::InvalidSigner(signer));
            }
            contingent_signers.insert(signer);
        }
        Ok(Self {
            owner,
            dormancy_period_secs,
            switch_activated: false,
            threshold,
            contingent_signers,
        })
    }

    /// Current phase derived from the one-shot flag.
    #[must_use]
    pub fn phase(&self) -> SwitchPhase {
        if self.switch_activated {
            SwitchPhase::Activated
        } else {
            SwitchPhase::Armed
        }
    }

    /// Configured threshold.
    #[must_use]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Set the threshold.
    ///
    /// # Errors
    /// `ZeroThreshold` if `threshold == 0`.
    pub fn set_threshold(&mut self, threshold: u64) -> Result<()> {
        if threshold == 0 {
            return Err(DeadmanError::ZeroThreshold);
        }
        self.threshold = threshold;
        Ok(())
    }

    /// Contingency signers in stable (sorted) order.
    pub fn contingent_signers(&self) -> impl Iterator<Item = &Address> {
        self.contingent_signers.iter()
    }

    /// Number of contingency signers.
    #[must_use]
    pub fn signer_count(&self) -> usize {
        self.contingent_signers.len()
    }

    /// Add signers, skipping duplicates. Returns the newly inserted ones.
    ///
    /// All-or-nothing: a zero address rejects the whole list.
    ///
    /// # Errors
    /// `InvalidSigner` on a zero address.
    pub fn add_signers(&mut self, signers: &[Address]) -> Result<Vec<Address>> {
        if let Some(bad) = signers.iter().find(|s| s.is_zero()) {
            return Err(DeadmanError::InvalidSigner(*bad));
        }
        Ok(signers
            .iter()
            .filter(|s| self.contingent_signers.insert(**s))
            .copied()
            .collect())
    }

    /// Remove signers. Returns the ones that were present.
    pub fn remove_signers(&mut self, signers: &[Address]) -> Vec<Address> {
        signers
            .iter()
            .filter(|s| self.contingent_signers.remove(*s))
            .copied()
            .collect()
    }

    /// Flip the one-shot flag.
    ///
    /// # Errors
    /// `AlreadyActivated` if the switch already fired.
    pub fn mark_activated(&mut self) -> Result<()> {
        if !self.phase().can_transition_to(SwitchPhase::Activated) {
            return Err(DeadmanError::AlreadyActivated);
        }
        self.switch_activated = true;
        Ok(())
    }
}

/// A single call the vault executes on its own behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCall {
    /// Call target.
    pub destination: Address,
    /// Native-asset amount.
    pub value: U256,
    /// Calldata.
    pub payload: Vec<u8>,
    /// Call or delegate-call.
    pub operation: OperationKind,
}

/// Outcome of a successful activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Oracle query that carried the attestation.
    pub query_id: U256,
    /// Fingerprint of the attested (last) vault transaction.
    pub fingerprint: Hash,
    /// Signers granted authority, in rollout order.
    pub signers_added: Vec<Address>,
    /// Threshold applied on every addition.
    pub threshold: u64,
    /// Time of activation (seconds).
    pub activated_at: u64,
}
