//! In-Memory Vault Adapter
//!
//! Simulated multi-signature vault implementing `VaultAccount`. Understands
//! self-calls to `addOwnerWithThreshold` and enforces the same owner rules a
//! real vault does.

use crate::algorithms::fingerprint::domain_separator;
use crate::algorithms::rollout::decode_add_owner_call;
use crate::domain::{Address, Hash, OperationKind, VaultCall, VaultError, U256};
use crate::ports::outbound::{VaultAccount, VaultResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

#[derive(Clone, Debug)]
struct Ledger {
    owners: Vec<Address>,
    threshold: u64,
    nonce: U256,
}

impl Ledger {
    fn apply(&mut self, vault: Address, call: &VaultCall) -> Result<(), String> {
        if call.destination != vault {
            return Err(format!("unsupported target {:?}", call.destination));
        }
        if call.operation != OperationKind::Call {
            return Err("delegate-call not allowed".to_string());
        }
        let (owner, threshold) =
            decode_add_owner_call(&call.payload).ok_or_else(|| "unsupported method".to_string())?;

        if owner.is_zero() || owner == vault {
            return Err(format!("invalid owner {owner:?}"));
        }
        if self.owners.contains(&owner) {
            return Err(format!("owner {owner:?} already exists"));
        }
        if threshold.is_zero() {
            return Err("threshold must be at least 1".to_string());
        }
        let owner_count = self.owners.len() + 1;
        if threshold > U256::from(owner_count) {
            return Err(format!("threshold {threshold} exceeds {owner_count} owners"));
        }

        self.owners.push(owner);
        self.threshold = threshold.low_u64();
        Ok(())
    }
}

/// Simulated vault.
pub struct InMemoryVault {
    chain_id: u64,
    address: Address,
    domain_separator: Hash,
    ledger: RwLock<Ledger>,
    /// Batch position at which the next batches fail.
    fail_at: RwLock<Option<usize>>,
    unavailable: AtomicBool,
}

impl InMemoryVault {
    /// Create a vault with initial owners and threshold.
    pub fn new(chain_id: u64, address: Address, owners: Vec<Address>, threshold: u64) -> Self {
        Self {
            chain_id,
            address,
            domain_separator: domain_separator(chain_id, &address),
            ledger: RwLock::new(Ledger {
                owners,
                threshold,
                nonce: U256::zero(),
            }),
            fail_at: RwLock::new(None),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Chain the vault lives on.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Vault address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current owners in insertion order.
    pub fn owners(&self) -> Vec<Address> {
        self.ledger.read().owners.clone()
    }

    /// Overwrite the nonce.
    pub fn set_nonce(&self, nonce: U256) {
        self.ledger.write().nonce = nonce;
    }

    /// Record one owner-signed transaction. Returns the nonce it consumed.
    pub fn record_transaction(&self) -> U256 {
        let mut ledger = self.ledger.write();
        let consumed = ledger.nonce;
        ledger.nonce = consumed.saturating_add(U256::one());
        consumed
    }

    /// Make every batch fail at position `index` until cleared.
    pub fn fail_batch_at(&self, index: usize) {
        *self.fail_at.write() = Some(index);
    }

    /// Remove an injected batch failure.
    pub fn clear_failure(&self) {
        *self.fail_at.write() = None;
    }

    /// Simulate an unreachable vault.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> VaultResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VaultError::Unavailable(format!("vault {:?} offline", self.address)));
        }
        Ok(())
    }
}

#[async_trait]
impl VaultAccount for InMemoryVault {
    async fn execute_as_vault(&self, call: &VaultCall) -> VaultResult<bool> {
        self.ensure_available()?;
        let mut ledger = self.ledger.write();
        match ledger.apply(self.address, call) {
            Ok(()) => Ok(true),
            Err(reason) => {
                debug!("[dms] vault call reverted: {}", reason);
                Ok(false)
            }
        }
    }

    async fn execute_batch_as_vault(&self, calls: &[VaultCall]) -> VaultResult<()> {
        self.ensure_available()?;
        let fail_at = *self.fail_at.read();
        let mut ledger = self.ledger.write();
        let mut staged = ledger.clone();

        for (index, call) in calls.iter().enumerate() {
            if fail_at == Some(index) {
                return Err(VaultError::CallReverted {
                    index,
                    reason: "injected failure".to_string(),
                });
            }
            staged
                .apply(self.address, call)
                .map_err(|reason| VaultError::CallReverted { index, reason })?;
        }

        debug!("[dms] vault batch committed: {} calls", calls.len());
        *ledger = staged;
        Ok(())
    }

    async fn current_nonce(&self) -> VaultResult<U256> {
        self.ensure_available()?;
        Ok(self.ledger.read().nonce)
    }

    async fn vault_address(&self) -> VaultResult<Address> {
        self.ensure_available()?;
        Ok(self.address)
    }

    async fn domain_separator(&self) -> VaultResult<Hash> {
        self.ensure_available()?;
        Ok(self.domain_separator)
    }

    async fn is_authority_signer(&self, who: &Address) -> VaultResult<bool> {
        self.ensure_available()?;
        Ok(self.ledger.read().owners.contains(who))
    }

    async fn current_threshold(&self) -> VaultResult<u64> {
        self.ensure_available()?;
        Ok(self.ledger.read().threshold)
    }
}
