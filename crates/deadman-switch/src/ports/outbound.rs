//! # Outbound Ports
//!
//! Traits for the switch's external collaborators: the vault it guards, a
//! time source, and an event sink.

use crate::domain::{Address, Hash, VaultCall, VaultError, U256};
use crate::events::SwitchEvent;
use async_trait::async_trait;

/// Result type for vault port calls.
pub type VaultResult<T> = std::result::Result<T, VaultError>;

/// The multi-signature vault - outbound port.
///
/// The switch is installed as a module of the vault and may execute calls
/// on its behalf.
#[async_trait]
pub trait VaultAccount: Send + Sync {
    /// Execute one call as the vault. `Ok(false)` means the call reverted.
    async fn execute_as_vault(&self, call: &VaultCall) -> VaultResult<bool>;

    /// Execute calls as one all-or-nothing unit.
    ///
    /// On failure nothing is committed and the error names the index of the
    /// first failing call.
    async fn execute_batch_as_vault(&self, calls: &[VaultCall]) -> VaultResult<()>;

    /// Next nonce the vault will consume.
    async fn current_nonce(&self) -> VaultResult<U256>;

    /// Address the vault executes as.
    async fn vault_address(&self) -> VaultResult<Address>;

    /// The vault's typed-data domain separator.
    async fn domain_separator(&self) -> VaultResult<Hash>;

    /// Whether `who` is currently a vault owner.
    async fn is_authority_signer(&self, who: &Address) -> VaultResult<bool>;

    /// Current signature threshold.
    async fn current_threshold(&self) -> VaultResult<u64>;
}

/// Time source - outbound port.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Event sink - outbound port.
pub trait EventPublisher: Send + Sync {
    /// Publish one event. Delivery failures are the sink's concern.
    fn publish(&self, event: SwitchEvent);
}
