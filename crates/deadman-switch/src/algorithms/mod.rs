//! # Algorithms Module
//!
//! Fingerprint codec, attestation decoder, activation validator and signer
//! rollout planning.

pub mod attestation;
pub mod fingerprint;
pub mod rollout;
pub mod validation;

pub use attestation::{decode_attestation, encode_attestation, MIN_ATTESTATION_WORDS};
pub use fingerprint::{
    attestation_fingerprint, domain_separator, keccak256, struct_hash, transaction_fingerprint,
    CanonicalTransaction,
};
pub use rollout::{
    add_owner_selector, decode_add_owner_call, encode_add_owner_call, plan_rollout,
    ADD_OWNER_WITH_THRESHOLD_SIGNATURE,
};
pub use validation::{validate_activation, verify_authenticity, ValidatedActivation};
