//! # Activation Validator
//!
//! Runs the activation checks in a fixed order and stops at the first
//! failure:
//!
//! 1. source binding (chain, schema, relay)
//! 2. vault binding
//! 3. fingerprint equality
//! 4. sequence continuity (reads the vault nonce)
//! 5. dormancy elapsed (reads the clock)
//! 6. one-shot guard
//!
//! Nothing here mutates state. The vault is only queried once checks 1-3
//! pass, and the clock only once check 4 passes.

use super::attestation::decode_attestation;
use super::fingerprint::attestation_fingerprint;
use crate::domain::{
    invariant_dormancy_elapsed, invariant_fingerprint_match, invariant_not_activated,
    invariant_sequence_continuity, invariant_source_binding, invariant_vault_binding,
    ActivationState, AttestationMetadata, DomainContext, Hash, Result, TransactionAttestation,
    Word,
};
use crate::ports::{Clock, VaultAccount};

/// An attestation that passed every check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedActivation {
    /// Decoded attestation.
    pub attestation: TransactionAttestation,
    /// Recomputed fingerprint (equal to the claimed one).
    pub fingerprint: Hash,
    /// Clock reading used for the dormancy check.
    pub checked_at: u64,
}

/// Checks that need nothing beyond the attestation and the domain context.
///
/// Returns the recomputed fingerprint.
pub fn verify_authenticity(
    context: &DomainContext,
    metadata: &AttestationMetadata,
    attestation: &TransactionAttestation,
) -> Result<Hash> {
    invariant_source_binding(context, metadata)?;
    invariant_vault_binding(context, attestation)?;
    let computed = attestation_fingerprint(attestation, &context.domain_separator);
    invariant_fingerprint_match(&attestation.claimed_fingerprint, &computed)?;
    Ok(computed)
}

/// Decode `words` and run the full check chain against live vault and
/// clock readings.
pub async fn validate_activation<V, C>(
    context: &DomainContext,
    state: &ActivationState,
    metadata: &AttestationMetadata,
    words: &[Word],
    vault: &V,
    clock: &C,
) -> Result<ValidatedActivation>
where
    V: VaultAccount + ?Sized,
    C: Clock + ?Sized,
{
    let attestation = decode_attestation(words)?;
    let fingerprint = verify_authenticity(context, metadata, &attestation)?;

    let current_nonce = vault.current_nonce().await?;
    invariant_sequence_continuity(attestation.sequence_number, current_nonce)?;

    let now = clock.now_secs();
    invariant_dormancy_elapsed(attestation.observed_timestamp, state.dormancy_period_secs, now)?;

    invariant_not_activated(state)?;

    Ok(ValidatedActivation {
        attestation,
        fingerprint,
        checked_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryVault, ManualClock};
    use crate::algorithms::attestation::encode_attestation;
    use crate::algorithms::fingerprint::domain_separator;
    use crate::domain::{Address, DeadmanError, OperationKind, U256};

    const DAY: u64 = 86_400;

    struct Fixture {
        context: DomainContext,
        state: ActivationState,
        metadata: AttestationMetadata,
        vault: InMemoryVault,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let vault_address = Address::new([0x10; 20]);
        let vault = InMemoryVault::new(1, vault_address, vec![Address::new([0x01; 20])], 1);
        vault.set_nonce(U256::from(6u64));
        Fixture {
            context: DomainContext {
                domain_separator: domain_separator(1, &vault_address),
                vault_address,
                source_chain_id: 1,
                query_schema: Hash::new([0x5c; 32]),
                attestation_relay: Address::new([0xA0; 20]),
            },
            state: ActivationState::new(Address::new([0xEE; 20]), 50 * DAY, 1, [Address::new([0x77; 20])])
                .unwrap(),
            metadata: AttestationMetadata {
                source_chain_id: 1,
                query_schema: Hash::new([0x5c; 32]),
                relay: Address::new([0xA0; 20]),
                query_id: U256::from(1u64),
            },
            vault,
            clock: ManualClock::new(1_000 + 50 * DAY),
        }
    }

    fn attestation(context: &DomainContext) -> TransactionAttestation {
        let mut att = TransactionAttestation {
            vault_address: context.vault_address,
            destination: Address::new([0x22; 20]),
            value: U256::from(1u64),
            payload: vec![0xa9, 0x05, 0x9c, 0xbb],
            operation: OperationKind::Call,
            exec_gas_budget: U256::zero(),
            base_gas_cost: U256::zero(),
            gas_price: U256::zero(),
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            sequence_number: U256::from(5u64),
            observed_timestamp: U256::from(1_000u64),
            claimed_fingerprint: Hash::ZERO,
        };
        att.claimed_fingerprint = attestation_fingerprint(&att, &context.domain_separator);
        att
    }

    async fn run(f: &Fixture, att: &TransactionAttestation) -> Result<ValidatedActivation> {
        let words = encode_attestation(att).unwrap();
        validate_activation(&f.context, &f.state, &f.metadata, &words, &f.vault, &f.clock).await
    }

    #[tokio::test]
    async fn test_valid_attestation_passes() {
        let f = fixture();
        let att = attestation(&f.context);
        let validated = run(&f, &att).await.unwrap();
        assert_eq!(validated.fingerprint, att.claimed_fingerprint);
        assert_eq!(validated.checked_at, 1_000 + 50 * DAY);
    }

    #[tokio::test]
    async fn test_origin_checked_before_fingerprint() {
        let mut f = fixture();
        f.metadata.source_chain_id = 10;
        let mut att = attestation(&f.context);
        att.claimed_fingerprint = Hash::ZERO;
        let err = run(&f, &att).await.unwrap_err();
        assert!(matches!(err, DeadmanError::OriginMismatch { .. }));
    }

    #[tokio::test]
    async fn test_target_checked_before_fingerprint() {
        let f = fixture();
        let mut att = attestation(&f.context);
        att.vault_address = Address::new([0x11; 20]);
        let err = run(&f, &att).await.unwrap_err();
        assert!(matches!(err, DeadmanError::WrongTarget { .. }));
    }

    #[tokio::test]
    async fn test_tampered_value_rejected() {
        let f = fixture();
        let mut att = attestation(&f.context);
        att.value = att.value + U256::one();
        let err = run(&f, &att).await.unwrap_err();
        assert!(matches!(err, DeadmanError::FingerprintMismatch { .. }));
    }

    #[tokio::test]
    async fn test_fingerprint_checked_before_nonce() {
        let f = fixture();
        f.vault.set_nonce(U256::from(100u64));
        let mut att = attestation(&f.context);
        att.gas_price = U256::one();
        let err = run(&f, &att).await.unwrap_err();
        assert!(matches!(err, DeadmanError::FingerprintMismatch { .. }));
    }

    #[tokio::test]
    async fn test_stale_nonce_rejected() {
        let f = fixture();
        f.vault.set_nonce(U256::from(7u64));
        let err = run(&f, &attestation(&f.context)).await.unwrap_err();
        assert!(matches!(err, DeadmanError::StaleOrNonFinalNonce { .. }));
    }

    #[tokio::test]
    async fn test_nonce_checked_before_dormancy() {
        let f = fixture();
        f.vault.set_nonce(U256::from(5u64));
        f.clock.set(0);
        let err = run(&f, &attestation(&f.context)).await.unwrap_err();
        assert!(matches!(err, DeadmanError::StaleOrNonFinalNonce { .. }));
    }

    #[tokio::test]
    async fn test_dormancy_one_second_short() {
        let f = fixture();
        f.clock.set(1_000 + 50 * DAY - 1);
        let err = run(&f, &attestation(&f.context)).await.unwrap_err();
        assert!(matches!(err, DeadmanError::NotYetDormant { .. }));
    }

    #[tokio::test]
    async fn test_activated_state_rejected() {
        let mut f = fixture();
        f.state.mark_activated().unwrap();
        let err = run(&f, &attestation(&f.context)).await.unwrap_err();
        assert!(matches!(err, DeadmanError::AlreadyActivated));
    }

    #[tokio::test]
    async fn test_short_word_array_rejected_first() {
        let mut f = fixture();
        f.metadata.relay = Address::ZERO;
        let words = vec![[0u8; 32]; 12];
        let err = validate_activation(&f.context, &f.state, &f.metadata, &words, &f.vault, &f.clock)
            .await
            .unwrap_err();
        assert!(matches!(err, DeadmanError::MalformedAttestation { .. }));
    }
}
