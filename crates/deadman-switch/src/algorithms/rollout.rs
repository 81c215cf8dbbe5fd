//! # Signer Rollout
//!
//! Builds the `addOwnerWithThreshold(address,uint256)` calls that grant the
//! contingency signers authority over the vault. Every call targets the
//! vault itself, carries no value and uses a plain call.

use crate::domain::{u256_to_word, Address, OperationKind, VaultCall, U256};
use sha3::{Digest, Keccak256};

/// Vault method used to add one owner and set the threshold.
pub const ADD_OWNER_WITH_THRESHOLD_SIGNATURE: &str = "addOwnerWithThreshold(address,uint256)";

/// Four-byte method selector of a canonical signature.
pub fn method_selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Selector of [`ADD_OWNER_WITH_THRESHOLD_SIGNATURE`] (`0x0d582f13`).
pub fn add_owner_selector() -> [u8; 4] {
    method_selector(ADD_OWNER_WITH_THRESHOLD_SIGNATURE)
}

/// ABI-encode `addOwnerWithThreshold(owner, threshold)`.
pub fn encode_add_owner_call(owner: &Address, threshold: u64) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + 64);
    payload.extend_from_slice(&add_owner_selector());
    payload.extend_from_slice(&owner.to_word());
    payload.extend_from_slice(&u256_to_word(U256::from(threshold)));
    payload
}

/// Inverse of [`encode_add_owner_call`]. `None` for any other payload.
pub fn decode_add_owner_call(payload: &[u8]) -> Option<(Address, U256)> {
    if payload.len() != 4 + 64 || payload[..4] != add_owner_selector() {
        return None;
    }
    let owner_word: &[u8; 32] = payload[4..36].try_into().ok()?;
    let threshold_word: &[u8; 32] = payload[36..68].try_into().ok()?;
    if owner_word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Some((
        Address::from_word(owner_word),
        U256::from_big_endian(threshold_word),
    ))
}

/// One call per signer, in iteration order, each with the final threshold.
pub fn plan_rollout<'a>(
    vault: Address,
    signers: impl IntoIterator<Item = &'a Address>,
    threshold: u64,
) -> Vec<VaultCall> {
    signers
        .into_iter()
        .map(|signer| VaultCall {
            destination: vault,
            value: U256::zero(),
            payload: encode_add_owner_call(signer, threshold),
            operation: OperationKind::Call,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_owner_selector_constant() {
        assert_eq!(hex::encode(add_owner_selector()), "0d582f13");
    }

    #[test]
    fn test_encode_layout() {
        let owner = Address::new([0xAB; 20]);
        let payload = encode_add_owner_call(&owner, 3);

        assert_eq!(payload.len(), 68);
        assert_eq!(&payload[..4], &[0x0d, 0x58, 0x2f, 0x13]);
        assert!(payload[4..16].iter().all(|b| *b == 0));
        assert_eq!(&payload[16..36], owner.as_bytes());
        assert_eq!(payload[67], 3);
    }

    #[test]
    fn test_decode_accepts_own_encoding() {
        let owner = Address::new([0x42; 20]);
        let (decoded, threshold) = decode_add_owner_call(&encode_add_owner_call(&owner, 2)).unwrap();
        assert_eq!(decoded, owner);
        assert_eq!(threshold, U256::from(2u64));
    }

    #[test]
    fn test_decode_rejects_foreign_payloads() {
        assert!(decode_add_owner_call(&[]).is_none());
        assert!(decode_add_owner_call(&[0xa9, 0x05, 0x9c, 0xbb]).is_none());

        let mut dirty = encode_add_owner_call(&Address::new([1; 20]), 1);
        dirty[4] = 0xFF;
        assert!(decode_add_owner_call(&dirty).is_none());
    }

    #[test]
    fn test_plan_targets_vault_with_final_threshold() {
        let vault = Address::new([0x10; 20]);
        let signers = [Address::new([1; 20]), Address::new([2; 20]), Address::new([3; 20])];

        let calls = plan_rollout(vault, &signers, 2);

        assert_eq!(calls.len(), 3);
        for (call, signer) in calls.iter().zip(signers.iter()) {
            assert_eq!(call.destination, vault);
            assert_eq!(call.value, U256::zero());
            assert_eq!(call.operation, OperationKind::Call);
            let (owner, threshold) = decode_add_owner_call(&call.payload).unwrap();
            assert_eq!(owner, *signer);
            assert_eq!(threshold, U256::from(2u64));
        }
    }

    #[test]
    fn test_plan_empty_set() {
        assert!(plan_rollout(Address::new([0x10; 20]), &[], 1).is_empty());
    }
}
