//! # Attestation Decoder
//!
//! Parses the flat word array produced by the proof pipeline.
//!
//! ## Layout
//!
//! | Slot | Field | Reinterpretation |
//! |------|-------|------------------|
//! | 0 | vault address | low 160 bits |
//! | 1 | destination | low 160 bits |
//! | 2 | value | uint256 |
//! | 3 | operation | uint256 → [`OperationKind`] |
//! | 4 | exec gas budget | uint256 |
//! | 5 | base gas cost | uint256 |
//! | 6 | gas price | uint256 |
//! | 7 | gas token | low 160 bits |
//! | 8 | refund receiver | low 160 bits |
//! | 9 | sequence number | uint256 |
//! | 10 | observed timestamp | uint256 |
//! | 11 | claimed fingerprint | raw bytes |
//! | 12 | payload selector | low 32 bits |
//! | 13.. | payload tail | whole words, in order |
//!
//! Only shape is checked here. Semantics belong to the validator.

use crate::domain::{
    u256_to_word, word_to_u256, Address, DeadmanError, Hash, OperationKind, Result,
    TransactionAttestation, Word, U256,
};

/// Minimum number of words in a well-formed attestation.
pub const MIN_ATTESTATION_WORDS: usize = 13;

/// Length of the payload selector carried in slot 12.
pub const SELECTOR_LEN: usize = 4;

/// Fixed slot positions.
pub mod slots {
    /// Vault address.
    pub const VAULT: usize = 0;
    /// Call target.
    pub const DESTINATION: usize = 1;
    /// Native value.
    pub const VALUE: usize = 2;
    /// Operation kind.
    pub const OPERATION: usize = 3;
    /// `safeTxGas`.
    pub const EXEC_GAS_BUDGET: usize = 4;
    /// `baseGas`.
    pub const BASE_GAS_COST: usize = 5;
    /// `gasPrice`.
    pub const GAS_PRICE: usize = 6;
    /// `gasToken`.
    pub const GAS_TOKEN: usize = 7;
    /// `refundReceiver`.
    pub const REFUND_RECEIVER: usize = 8;
    /// Nonce consumed.
    pub const SEQUENCE_NUMBER: usize = 9;
    /// Block timestamp.
    pub const OBSERVED_TIMESTAMP: usize = 10;
    /// Attested digest.
    pub const CLAIMED_FINGERPRINT: usize = 11;
    /// Payload selector.
    pub const SELECTOR: usize = 12;
    /// First payload tail word.
    pub const PAYLOAD_TAIL: usize = 13;
}

/// Decode an attestation word array.
///
/// # Errors
/// - `MalformedAttestation` if fewer than 13 words
/// - `UnknownOperationKind` if slot 3 is not 0 or 1
pub fn decode_attestation(words: &[Word]) -> Result<TransactionAttestation> {
    if words.len() < MIN_ATTESTATION_WORDS {
        return Err(DeadmanError::MalformedAttestation {
            got: words.len(),
            required: MIN_ATTESTATION_WORDS,
        });
    }

    let operation_raw = word_to_u256(&words[slots::OPERATION]);
    let operation = OperationKind::from_u256(operation_raw)
        .ok_or(DeadmanError::UnknownOperationKind(operation_raw))?;

    let tail = &words[slots::PAYLOAD_TAIL..];
    let mut payload = Vec::with_capacity(SELECTOR_LEN + tail.len() * 32);
    payload.extend_from_slice(&words[slots::SELECTOR][32 - SELECTOR_LEN..]);
    for word in tail {
        payload.extend_from_slice(word);
    }

    Ok(TransactionAttestation {
        vault_address: Address::from_word(&words[slots::VAULT]),
        destination: Address::from_word(&words[slots::DESTINATION]),
        value: word_to_u256(&words[slots::VALUE]),
        payload,
        operation,
        exec_gas_budget: word_to_u256(&words[slots::EXEC_GAS_BUDGET]),
        base_gas_cost: word_to_u256(&words[slots::BASE_GAS_COST]),
        gas_price: word_to_u256(&words[slots::GAS_PRICE]),
        gas_token: Address::from_word(&words[slots::GAS_TOKEN]),
        refund_receiver: Address::from_word(&words[slots::REFUND_RECEIVER]),
        sequence_number: word_to_u256(&words[slots::SEQUENCE_NUMBER]),
        observed_timestamp: word_to_u256(&words[slots::OBSERVED_TIMESTAMP]),
        claimed_fingerprint: Hash::new(words[slots::CLAIMED_FINGERPRINT]),
    })
}

/// Lay an attestation out in the word format the proof pipeline emits.
///
/// Returns `None` when the payload cannot be carried: it must be a 4-byte
/// selector followed by whole 32-byte words.
pub fn encode_attestation(att: &TransactionAttestation) -> Option<Vec<Word>> {
    if att.payload.len() < SELECTOR_LEN || (att.payload.len() - SELECTOR_LEN) % 32 != 0 {
        return None;
    }

    let mut selector = [0u8; 32];
    selector[32 - SELECTOR_LEN..].copy_from_slice(&att.payload[..SELECTOR_LEN]);

    let mut words = vec![
        att.vault_address.to_word(),
        att.destination.to_word(),
        u256_to_word(att.value),
        u256_to_word(U256::from(att.operation.as_u8())),
        u256_to_word(att.exec_gas_budget),
        u256_to_word(att.base_gas_cost),
        u256_to_word(att.gas_price),
        att.gas_token.to_word(),
        att.refund_receiver.to_word(),
        u256_to_word(att.sequence_number),
        u256_to_word(att.observed_timestamp),
        att.claimed_fingerprint.0,
        selector,
    ];
    for chunk in att.payload[SELECTOR_LEN..].chunks_exact(32) {
        let mut word = [0u8; 32];
        word.copy_from_slice(chunk);
        words.push(word);
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> Vec<Word> {
        (0..n)
            .map(|i| u256_to_word(U256::from(if i == slots::OPERATION { 0 } else { i as u64 + 1 })))
            .collect()
    }

    #[test]
    fn test_twelve_words_rejected() {
        let err = decode_attestation(&numbered_words(12)).unwrap_err();
        assert!(matches!(
            err,
            DeadmanError::MalformedAttestation { got: 12, required: 13 }
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(decode_attestation(&[]).is_err());
    }

    #[test]
    fn test_thirteen_words_gives_selector_only_payload() {
        let mut words = numbered_words(13);
        words[slots::SELECTOR] = [0u8; 32];
        words[slots::SELECTOR][28..].copy_from_slice(&[0xa9, 0x05, 0x9c, 0xbb]);

        let att = decode_attestation(&words).unwrap();
        assert_eq!(att.payload, vec![0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_scalar_slots_map_to_fields() {
        let words = numbered_words(13);
        let att = decode_attestation(&words).unwrap();

        assert_eq!(att.value, U256::from(3u64));
        assert_eq!(att.operation, OperationKind::Call);
        assert_eq!(att.exec_gas_budget, U256::from(5u64));
        assert_eq!(att.base_gas_cost, U256::from(6u64));
        assert_eq!(att.gas_price, U256::from(7u64));
        assert_eq!(att.sequence_number, U256::from(10u64));
        assert_eq!(att.observed_timestamp, U256::from(11u64));
        assert_eq!(att.claimed_fingerprint, Hash::new(u256_to_word(U256::from(12u64))));
        assert_eq!(att.vault_address.0[19], 1);
        assert_eq!(att.destination.0[19], 2);
        assert_eq!(att.gas_token.0[19], 8);
        assert_eq!(att.refund_receiver.0[19], 9);
    }

    #[test]
    fn test_address_slots_drop_high_bits() {
        let mut words = numbered_words(13);
        words[slots::VAULT] = [0xFF; 32];
        let att = decode_attestation(&words).unwrap();
        assert_eq!(att.vault_address, Address::new([0xFF; 20]));
    }

    #[test]
    fn test_tail_words_appended_in_order() {
        let mut words = numbered_words(13);
        words[slots::SELECTOR][28..].copy_from_slice(&[1, 2, 3, 4]);
        words.push([0xAA; 32]);
        words.push([0xBB; 32]);

        let att = decode_attestation(&words).unwrap();
        assert_eq!(att.payload.len(), 4 + 64);
        assert_eq!(&att.payload[..4], &[1, 2, 3, 4]);
        assert!(att.payload[4..36].iter().all(|b| *b == 0xAA));
        assert!(att.payload[36..].iter().all(|b| *b == 0xBB));
    }

    #[test]
    fn test_unknown_operation_kind_rejected() {
        let mut words = numbered_words(13);
        words[slots::OPERATION] = u256_to_word(U256::from(2u64));
        let err = decode_attestation(&words).unwrap_err();
        assert!(matches!(err, DeadmanError::UnknownOperationKind(v) if v == U256::from(2u64)));
    }

    #[test]
    fn test_encode_rejects_unaligned_payload() {
        let mut att = decode_attestation(&numbered_words(13)).unwrap();
        att.payload = vec![1, 2, 3];
        assert!(encode_attestation(&att).is_none());
        att.payload = vec![0u8; 4 + 31];
        assert!(encode_attestation(&att).is_none());
    }

    #[test]
    fn test_encode_then_decode_preserves_call_data() {
        let mut att = decode_attestation(&numbered_words(13)).unwrap();
        att.payload = [vec![0x0d, 0x58, 0x2f, 0x13], vec![0x42; 64]].concat();
        let words = encode_attestation(&att).unwrap();
        assert_eq!(words.len(), 15);
        assert_eq!(decode_attestation(&words).unwrap(), att);
    }
}
