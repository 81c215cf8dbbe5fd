//! # Domain Errors
//!
//! Error types for the Deadman Switch.
//!
//! All errors use the `DMS_ERR_` prefix. Codes are grouped by concern:
//! - 1xx: attestation decoding
//! - 2xx: authenticity (origin, target, fingerprint)
//! - 3xx: ordering and time
//! - 4xx: one-shot guard
//! - 5xx: vault interaction
//! - 6xx: administration
//! - 9xx: configuration

use super::value_objects::{Address, Hash, U256};
use thiserror::Error;

/// Deadman switch error types.
#[derive(Debug, Error)]
pub enum DeadmanError {
    // =========================================================================
    // Decoding (1xx)
    // =========================================================================
    /// Attestation word sequence is too short.
    #[error("DMS_ERR_100: Malformed attestation: {got} words, need at least {required}")]
    MalformedAttestation {
        /// Words received
        got: usize,
        /// Minimum words required
        required: usize,
    },

    /// Operation word is neither call nor delegate-call.
    #[error("DMS_ERR_101: Unknown operation kind: {0}")]
    UnknownOperationKind(U256),

    // =========================================================================
    // Authenticity (2xx)
    // =========================================================================
    /// Attestation came from an unexpected chain, schema, or relay.
    #[error("DMS_ERR_200: Origin mismatch: {field} expected {expected}, got {actual}")]
    OriginMismatch {
        /// Which metadata field disagreed
        field: &'static str,
        /// Configured value
        expected: String,
        /// Delivered value
        actual: String,
    },

    /// Attestation is about a different vault.
    #[error("DMS_ERR_201: Wrong target vault: expected {expected:?}, got {actual:?}")]
    WrongTarget {
        /// Configured vault
        expected: Address,
        /// Attested vault
        actual: Address,
    },

    /// Recomputed fingerprint differs from the attested one.
    #[error("DMS_ERR_202: Fingerprint mismatch: claimed {claimed:?}, computed {computed:?}")]
    FingerprintMismatch {
        /// Fingerprint asserted by the attester
        claimed: Hash,
        /// Fingerprint recomputed from the attested fields
        computed: Hash,
    },

    // =========================================================================
    // Ordering / time (3xx)
    // =========================================================================
    /// Attested transaction is not the vault's most recent one.
    #[error("DMS_ERR_300: Stale or non-final nonce: attested {attested}, vault nonce {current}")]
    StaleOrNonFinalNonce {
        /// Nonce consumed by the attested transaction
        attested: U256,
        /// Live vault nonce
        current: U256,
    },

    /// Dormancy period has not yet elapsed.
    #[error("DMS_ERR_301: Not yet dormant: now {now}, dormant at {dormant_at}")]
    NotYetDormant {
        /// Current time (seconds)
        now: u64,
        /// Earliest activation time; saturates on overflow
        dormant_at: U256,
    },

    // =========================================================================
    // One-shot (4xx)
    // =========================================================================
    /// The switch already fired.
    #[error("DMS_ERR_400: Switch already activated")]
    AlreadyActivated,

    // =========================================================================
    // Vault (5xx)
    // =========================================================================
    /// A call in the signer rollout batch failed; nothing was committed.
    #[error("DMS_ERR_500: Vault call {index} failed: {reason}")]
    VaultCallFailed {
        /// Position of the failing call in the batch
        index: usize,
        /// Vault-reported reason
        reason: String,
    },

    /// Vault port could not be reached or answered unexpectedly.
    #[error("DMS_ERR_501: Vault error: {0}")]
    Vault(String),

    // =========================================================================
    // Administration (6xx)
    // =========================================================================
    /// Caller is not the administrative owner.
    #[error("DMS_ERR_600: Caller {0:?} is not the owner")]
    NotOwner(Address),

    /// Threshold must be positive.
    #[error("DMS_ERR_601: Threshold must be greater than zero")]
    ZeroThreshold,

    /// Signer identity not usable (zero address).
    #[error("DMS_ERR_602: Invalid signer: {0:?}")]
    InvalidSigner(Address),

    /// Dormancy period below the configured floor.
    #[error("DMS_ERR_603: Dormancy period {requested}s below minimum {minimum}s")]
    DormancyBelowMinimum {
        /// Requested period
        requested: u64,
        /// Configured minimum
        minimum: u64,
    },

    /// Ownership cannot pass to this identity (zero address).
    #[error("DMS_ERR_604: Invalid owner: {0:?}")]
    InvalidOwner(Address),

    // =========================================================================
    // Configuration (9xx)
    // =========================================================================
    /// Invalid or unreadable configuration.
    #[error("DMS_ERR_900: Configuration error: {0}")]
    Configuration(String),
}

impl DeadmanError {
    /// Whether a later attempt may succeed without changing the attestation
    /// source (time passing, a fresher attestation, vault conditions).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StaleOrNonFinalNonce { .. }
                | Self::NotYetDormant { .. }
                | Self::VaultCallFailed { .. }
                | Self::Vault(_)
        )
    }

    /// Whether the attestation itself failed to authenticate.
    #[must_use]
    pub fn is_authenticity_failure(&self) -> bool {
        matches!(
            self,
            Self::OriginMismatch { .. } | Self::WrongTarget { .. } | Self::FingerprintMismatch { .. }
        )
    }
}

/// Failures reported by the vault port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// A call inside an atomic batch failed; the batch was not committed.
    #[error("call {index} reverted: {reason}")]
    CallReverted {
        /// Position of the failing call
        index: usize,
        /// Vault-reported reason
        reason: String,
    },

    /// The vault could not be queried.
    #[error("vault unavailable: {0}")]
    Unavailable(String),
}

impl From<VaultError> for DeadmanError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::CallReverted { index, reason } => Self::VaultCallFailed { index, reason },
            VaultError::Unavailable(reason) => Self::Vault(reason),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DeadmanError>;

impl From<serde_json::Error> for DeadmanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for DeadmanError {
    fn from(err: std::io::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
