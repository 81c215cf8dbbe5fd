//! # Domain Invariants
//!
//! The individual activation checks. Each returns the error the validator
//! surfaces when it fails. Ordering lives in `algorithms::validation`.

use super::entities::{ActivationState, AttestationMetadata, DomainContext, TransactionAttestation};
use super::errors::{DeadmanError, Result};
use super::value_objects::{Hash, U256};

/// Invariant: the attestation came from the configured chain, schema and relay.
pub fn invariant_source_binding(
    context: &DomainContext,
    metadata: &AttestationMetadata,
) -> Result<()> {
    if metadata.source_chain_id != context.source_chain_id {
        return Err(DeadmanError::OriginMismatch {
            field: "source_chain_id",
            expected: context.source_chain_id.to_string(),
            actual: metadata.source_chain_id.to_string(),
        });
    }
    if metadata.query_schema != context.query_schema {
        return Err(DeadmanError::OriginMismatch {
            field: "query_schema",
            expected: format!("{:?}", context.query_schema),
            actual: format!("{:?}", metadata.query_schema),
        });
    }
    if metadata.relay != context.attestation_relay {
        return Err(DeadmanError::OriginMismatch {
            field: "relay",
            expected: format!("{:?}", context.attestation_relay),
            actual: format!("{:?}", metadata.relay),
        });
    }
    Ok(())
}

/// Invariant: the attestation is about the protected vault.
pub fn invariant_vault_binding(
    context: &DomainContext,
    attestation: &TransactionAttestation,
) -> Result<()> {
    if attestation.vault_address != context.vault_address {
        return Err(DeadmanError::WrongTarget {
            expected: context.vault_address,
            actual: attestation.vault_address,
        });
    }
    Ok(())
}

/// Invariant: recomputed fingerprint equals the attested one.
pub fn invariant_fingerprint_match(claimed: &Hash, computed: &Hash) -> Result<()> {
    if claimed != computed {
        return Err(DeadmanError::FingerprintMismatch {
            claimed: *claimed,
            computed: *computed,
        });
    }
    Ok(())
}

/// Invariant: the attested transaction is the vault's most recent one.
///
/// `current_nonce == sequence_number + 1`. Older and future nonces both fail.
pub fn invariant_sequence_continuity(sequence_number: U256, current_nonce: U256) -> Result<()> {
    match sequence_number.checked_add(U256::one()) {
        Some(next) if next == current_nonce => Ok(()),
        _ => Err(DeadmanError::StaleOrNonFinalNonce {
            attested: sequence_number,
            current: current_nonce,
        }),
    }
}

/// Invariant: `now >= observed_timestamp + dormancy_period`.
///
/// An overflowing sum never becomes dormant.
pub fn invariant_dormancy_elapsed(
    observed_timestamp: U256,
    dormancy_period_secs: u64,
    now: u64,
) -> Result<()> {
    match observed_timestamp.checked_add(U256::from(dormancy_period_secs)) {
        Some(dormant_at) if U256::from(now) >= dormant_at => Ok(()),
        Some(dormant_at) => Err(DeadmanError::NotYetDormant { now, dormant_at }),
        None => Err(DeadmanError::NotYetDormant {
            now,
            dormant_at: U256::MAX,
        }),
    }
}

/// Invariant: the switch has not fired.
pub fn invariant_not_activated(state: &ActivationState) -> Result<()> {
    if state.switch_activated {
        return Err(DeadmanError::AlreadyActivated);
    }
    Ok(())
}
