//! # Transaction Fingerprint Codec
//!
//! Recomputes the vault's canonical transaction digest (typed structured
//! data, EIP-712 layout):
//!
//! ```text
//! payload_hash = keccak256(payload)
//! struct_hash  = keccak256(TYPE_HASH ‖ to ‖ value ‖ payload_hash ‖ operation
//!                          ‖ safeTxGas ‖ baseGas ‖ gasPrice ‖ gasToken
//!                          ‖ refundReceiver ‖ nonce)          // 32-byte words
//! fingerprint  = keccak256(0x19 ‖ 0x01 ‖ domain_separator ‖ struct_hash)
//! ```
//!
//! Field order and the type string are fixed by the vault's hashing rule.
//! Any deviation yields digests that never match real attestations.

use crate::domain::{
    u256_to_word, Address, Hash, OperationKind, TransactionAttestation, Word, U256,
};
use sha3::{Digest, Keccak256};

/// Type string of the vault transaction struct.
pub const VAULT_TX_TYPE: &str = "SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)";

/// Type string of the vault's signing domain.
pub const DOMAIN_TYPE: &str = "EIP712Domain(uint256 chainId,address verifyingContract)";

/// Version prefix of the outer hash.
pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    Hash::new(Keccak256::digest(data).into())
}

/// `keccak256(VAULT_TX_TYPE)`.
pub fn vault_tx_type_hash() -> Hash {
    keccak256(VAULT_TX_TYPE.as_bytes())
}

/// `keccak256(DOMAIN_TYPE)`.
pub fn domain_type_hash() -> Hash {
    keccak256(DOMAIN_TYPE.as_bytes())
}

/// The canonical fields a vault signs over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalTransaction<'a> {
    /// Call target.
    pub destination: Address,
    /// Native-asset amount.
    pub value: U256,
    /// Calldata.
    pub payload: &'a [u8],
    /// Call or delegate-call.
    pub operation: OperationKind,
    /// `safeTxGas`.
    pub exec_gas_budget: U256,
    /// `baseGas`.
    pub base_gas_cost: U256,
    /// `gasPrice`.
    pub gas_price: U256,
    /// `gasToken`.
    pub gas_token: Address,
    /// `refundReceiver`.
    pub refund_receiver: Address,
    /// Vault nonce consumed by the transaction.
    pub sequence_number: U256,
}

impl<'a> From<&'a TransactionAttestation> for CanonicalTransaction<'a> {
    fn from(att: &'a TransactionAttestation) -> Self {
        Self {
            destination: att.destination,
            value: att.value,
            payload: &att.payload,
            operation: att.operation,
            exec_gas_budget: att.exec_gas_budget,
            base_gas_cost: att.base_gas_cost,
            gas_price: att.gas_price,
            gas_token: att.gas_token,
            refund_receiver: att.refund_receiver,
            sequence_number: att.sequence_number,
        }
    }
}

/// Inner struct hash (layer one).
pub fn struct_hash(tx: &CanonicalTransaction<'_>) -> Hash {
    let payload_hash = keccak256(tx.payload);
    let words: [Word; 11] = [
        vault_tx_type_hash().0,
        tx.destination.to_word(),
        u256_to_word(tx.value),
        payload_hash.0,
        u256_to_word(U256::from(tx.operation.as_u8())),
        u256_to_word(tx.exec_gas_budget),
        u256_to_word(tx.base_gas_cost),
        u256_to_word(tx.gas_price),
        tx.gas_token.to_word(),
        tx.refund_receiver.to_word(),
        u256_to_word(tx.sequence_number),
    ];

    let mut hasher = Keccak256::new();
    for word in &words {
        hasher.update(word);
    }
    Hash::new(hasher.finalize().into())
}

/// Final fingerprint bound to one vault's domain (layer two).
pub fn transaction_fingerprint(tx: &CanonicalTransaction<'_>, domain_separator: &Hash) -> Hash {
    let inner = struct_hash(tx);
    let mut hasher = Keccak256::new();
    hasher.update(TYPED_DATA_PREFIX);
    hasher.update(domain_separator.as_bytes());
    hasher.update(inner.as_bytes());
    Hash::new(hasher.finalize().into())
}

/// Fingerprint of an attestation's own fields.
pub fn attestation_fingerprint(att: &TransactionAttestation, domain_separator: &Hash) -> Hash {
    transaction_fingerprint(&CanonicalTransaction::from(att), domain_separator)
}

/// Domain separator a vault derives for itself.
///
/// Real vaults are asked for this value; simulated ones compute it here.
pub fn domain_separator(chain_id: u64, vault: &Address) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(domain_type_hash().as_bytes());
    hasher.update(u256_to_word(U256::from(chain_id)));
    hasher.update(vault.to_word());
    Hash::new(hasher.finalize().into())
}
