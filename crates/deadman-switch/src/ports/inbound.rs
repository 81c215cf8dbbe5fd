//! # Inbound Ports
//!
//! What the Deadman Switch offers: the attestation callback, read-only
//! queries, and the owner-gated administration surface.

use crate::domain::{
    ActivationReport, ActivationState, Address, AttestationMetadata, DomainContext, Result,
    SwitchPhase, Word,
};
use async_trait::async_trait;

/// Deadman switch API - inbound port.
#[async_trait]
pub trait DeadmanSwitchApi: Send + Sync {
    /// Single callback entry point for attestation delivery.
    ///
    /// Vault address, sequence number and digest come only from `words`.
    /// On any error no state changes.
    async fn handle_attestation(
        &mut self,
        metadata: AttestationMetadata,
        words: &[Word],
    ) -> Result<ActivationReport>;

    /// Current phase.
    fn phase(&self) -> SwitchPhase;

    /// Current activation state.
    fn state(&self) -> &ActivationState;

    /// Immutable deployment anchors.
    fn context(&self) -> &DomainContext;
}

/// Administration API - inbound port.
///
/// Every method fails with `NotOwner` unless `caller` is the owner. None of
/// them touch the one-shot flag.
pub trait SwitchAdminApi: Send + Sync {
    /// Add contingency signers. Returns the newly inserted ones.
    fn add_contingency_signers(
        &mut self,
        caller: Address,
        signers: &[Address],
    ) -> Result<Vec<Address>>;

    /// Remove contingency signers. Returns the ones that were present.
    fn remove_contingency_signers(
        &mut self,
        caller: Address,
        signers: &[Address],
    ) -> Result<Vec<Address>>;

    /// Set the threshold applied on activation.
    fn set_threshold(&mut self, caller: Address, threshold: u64) -> Result<()>;

    /// Set the dormancy period in seconds.
    fn set_dormancy_period(&mut self, caller: Address, period_secs: u64) -> Result<()>;

    /// Hand administration to `new_owner`.
    fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()>;
}
