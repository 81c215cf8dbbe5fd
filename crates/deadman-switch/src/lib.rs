//! # Deadman Switch
//!
//! Hands control of a multi-signature vault to a pre-registered set of
//! contingency signers once the vault has been dormant for a configured
//! period, as proven by an externally attested transaction record.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Activation checks
//!
//! | Order | Check | Error |
//! |-------|-------|-------|
//! | 1 | Attestation origin (chain, schema, relay) | `DMS_ERR_200` |
//! | 2 | Attested vault is the guarded vault | `DMS_ERR_201` |
//! | 3 | Recomputed fingerprint equals attested one | `DMS_ERR_202` |
//! | 4 | Vault nonce is attested nonce + 1 | `DMS_ERR_300` |
//! | 5 | Dormancy period elapsed | `DMS_ERR_301` |
//! | 6 | Switch not yet activated | `DMS_ERR_400` |
//!
//! The signer rollout is submitted as one all-or-nothing vault batch. The
//! one-shot flag flips only after the batch commits.
//!
//! ## Module Structure
//!
//! ```text
//! deadman-switch/
//! ├── domain/          # Attestation, ActivationState, invariants, errors
//! ├── algorithms/      # Fingerprint codec, decoder, validator, rollout
//! ├── ports/           # DeadmanSwitchApi, SwitchAdminApi, VaultAccount, Clock
//! ├── adapters/        # InMemoryVault, clocks, event sinks
//! └── service.rs       # DeadmanSwitchService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod constants;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{InMemoryEventLog, InMemoryVault, ManualClock, SystemClock, TracingEventPublisher};
pub use algorithms::{
    add_owner_selector, attestation_fingerprint, decode_attestation, domain_separator,
    encode_add_owner_call, encode_attestation, keccak256, plan_rollout, transaction_fingerprint,
    validate_activation, CanonicalTransaction, ValidatedActivation, MIN_ATTESTATION_WORDS,
};
pub use config::SwitchConfig;
pub use domain::{
    ActivationReport, ActivationState, Address, AttestationMetadata, DeadmanError, DomainContext,
    Hash, OperationKind, Result, SwitchPhase, TransactionAttestation, VaultCall, VaultError, Word,
    U256,
};
pub use events::SwitchEvent;
pub use ports::{Clock, DeadmanSwitchApi, EventPublisher, SwitchAdminApi, VaultAccount};
pub use service::{DeadmanSwitchService, ServiceStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
