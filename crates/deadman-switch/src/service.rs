//! # Deadman Switch Service
//!
//! Owns the activation state for one vault and wires the validator, the
//! signer rollout and the administration surface to the outbound ports.
//!
//! ## Callback flow
//!
//! 1. Refuse immediately once the switch has fired.
//! 2. Decode and validate the attestation (see `algorithms::validation`).
//! 3. Submit one `addOwnerWithThreshold` call per contingency signer as a
//!    single all-or-nothing vault batch.
//! 4. Only after the batch commits, flip the one-shot flag and publish
//!    `SwitchActivated`.
//!
//! Any failure publishes `ActivationRejected` and leaves state untouched.

use crate::algorithms::{plan_rollout, validate_activation};
use crate::config::SwitchConfig;
use crate::domain::{
    ActivationReport, ActivationState, Address, AttestationMetadata, DeadmanError, DomainContext,
    Result, SwitchPhase, Word,
};
use crate::events::SwitchEvent;
use crate::ports::inbound::{DeadmanSwitchApi, SwitchAdminApi};
use crate::ports::outbound::{Clock, EventPublisher, VaultAccount};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Counters for the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Attestation callbacks received.
    pub callbacks_received: u64,
    /// Callbacks rejected.
    pub rejections: u64,
    /// Successful activations (0 or 1).
    pub activations: u64,
    /// Accepted administrative mutations.
    pub admin_updates: u64,
}

/// The Deadman Switch for one vault.
pub struct DeadmanSwitchService<V: VaultAccount, C: Clock, E: EventPublisher> {
    /// Guarded vault.
    vault: Arc<V>,
    /// Time source.
    clock: Arc<C>,
    /// Event sink.
    events: Arc<E>,
    /// Immutable anchors.
    context: DomainContext,
    /// Mutable per-vault record.
    state: ActivationState,
    /// Floor for `set_dormancy_period`.
    min_dormancy_period_secs: u64,
    /// Counters.
    stats: ServiceStats,
}

impl<V: VaultAccount, C: Clock, E: EventPublisher> DeadmanSwitchService<V, C, E> {
    /// Create a service for the vault named in `config`.
    ///
    /// Validates the config, checks that `vault` is the configured vault and
    /// reads its domain separator once.
    pub async fn new(
        vault: Arc<V>,
        clock: Arc<C>,
        events: Arc<E>,
        config: SwitchConfig,
    ) -> Result<Self> {
        config.validate()?;

        let actual = vault.vault_address().await?;
        if actual != config.vault_address {
            return Err(DeadmanError::Configuration(format!(
                "vault adapter is bound to {:?}, config names {:?}",
                actual, config.vault_address
            )));
        }
        let domain_separator = vault.domain_separator().await?;
        let context = DomainContext {
            domain_separator,
            vault_address: config.vault_address,
            source_chain_id: config.source_chain_id,
            query_schema: config.query_schema,
            attestation_relay: config.attestation_relay,
        };
        let state = ActivationState::new(
            config.owner,
            config.dormancy_period_secs,
            config.threshold,
            config.contingency_signers,
        )?;

        info!(
            vault = ?context.vault_address,
            source_chain_id = context.source_chain_id,
            dormancy_secs = state.dormancy_period_secs,
            signers = state.signer_count(),
            threshold = state.threshold(),
            "[dms] switch armed"
        );

        Ok(Self {
            vault,
            clock,
            events,
            context,
            state,
            min_dormancy_period_secs: config.min_dormancy_period_secs,
            stats: ServiceStats::default(),
        })
    }

    /// Current counters.
    pub fn stats(&self) -> ServiceStats {
        self.stats.clone()
    }

    #[instrument(skip_all, fields(query_id = %metadata.query_id))]
    async fn activate(
        &mut self,
        metadata: &AttestationMetadata,
        words: &[Word],
    ) -> Result<ActivationReport> {
        if self.state.phase().is_terminal() {
            return Err(DeadmanError::AlreadyActivated);
        }

        let validated = validate_activation(
            &self.context,
            &self.state,
            metadata,
            words,
            self.vault.as_ref(),
            self.clock.as_ref(),
        )
        .await?;

        let signers: Vec<Address> = self.state.contingent_signers().copied().collect();
        let threshold = self.state.threshold();
        if signers.is_empty() {
            warn!("[dms] activating with no contingency signers registered");
        }

        let calls = plan_rollout(self.context.vault_address, &signers, threshold);
        debug!(calls = calls.len(), threshold, "[dms] submitting signer rollout");
        self.vault.execute_batch_as_vault(&calls).await?;

        self.state.mark_activated()?;

        let report = ActivationReport {
            query_id: metadata.query_id,
            fingerprint: validated.fingerprint,
            signers_added: signers,
            threshold,
            activated_at: validated.checked_at,
        };
        info!(
            fingerprint = ?report.fingerprint,
            signers = report.signers_added.len(),
            threshold,
            "[dms] switch activated"
        );
        Ok(report)
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.state.owner {
            warn!(caller = ?caller, "[dms] rejected admin call from non-owner");
            return Err(DeadmanError::NotOwner(caller));
        }
        Ok(())
    }

    fn admin_event(&mut self, event: SwitchEvent) {
        self.stats.admin_updates += 1;
        debug!(event = event.name(), "[dms] admin update");
        self.events.publish(event);
    }
}

#[async_trait]
impl<V: VaultAccount, C: Clock, E: EventPublisher> DeadmanSwitchApi
    for DeadmanSwitchService<V, C, E>
{
    async fn handle_attestation(
        &mut self,
        metadata: AttestationMetadata,
        words: &[Word],
    ) -> Result<ActivationReport> {
        self.stats.callbacks_received += 1;
        info!(
            query_id = %metadata.query_id,
            relay = ?metadata.relay,
            words = words.len(),
            "[dms] attestation received"
        );

        match self.activate(&metadata, words).await {
            Ok(report) => {
                self.stats.activations += 1;
                self.events.publish(SwitchEvent::SwitchActivated {
                    vault: self.context.vault_address,
                    query_id: report.query_id,
                    fingerprint: report.fingerprint,
                    signers: report.signers_added.clone(),
                    threshold: report.threshold,
                    activated_at: report.activated_at,
                });
                Ok(report)
            }
            Err(err) => {
                self.stats.rejections += 1;
                warn!(
                    query_id = %metadata.query_id,
                    error = %err,
                    transient = err.is_transient(),
                    "[dms] attestation rejected"
                );
                self.events
                    .publish(SwitchEvent::rejected(metadata.query_id, &err));
                Err(err)
            }
        }
    }

    fn phase(&self) -> SwitchPhase {
        self.state.phase()
    }

    fn state(&self) -> &ActivationState {
        &self.state
    }

    fn context(&self) -> &DomainContext {
        &self.context
    }
}

impl<V: VaultAccount, C: Clock, E: EventPublisher> SwitchAdminApi
    for DeadmanSwitchService<V, C, E>
{
    fn add_contingency_signers(
        &mut self,
        caller: Address,
        signers: &[Address],
    ) -> Result<Vec<Address>> {
        self.require_owner(caller)?;
        let added = self.state.add_signers(signers)?;
        self.admin_event(SwitchEvent::ContingencySignersAdded {
            signers: added.clone(),
        });
        Ok(added)
    }

    fn remove_contingency_signers(
        &mut self,
        caller: Address,
        signers: &[Address],
    ) -> Result<Vec<Address>> {
        self.require_owner(caller)?;
        let removed = self.state.remove_signers(signers);
        self.admin_event(SwitchEvent::ContingencySignersRemoved {
            signers: removed.clone(),
        });
        Ok(removed)
    }

    fn set_threshold(&mut self, caller: Address, threshold: u64) -> Result<()> {
        self.require_owner(caller)?;
        let old = self.state.threshold();
        self.state.set_threshold(threshold)?;
        self.admin_event(SwitchEvent::ThresholdUpdated {
            old,
            new: threshold,
        });
        Ok(())
    }

    fn set_dormancy_period(&mut self, caller: Address, period_secs: u64) -> Result<()> {
        self.require_owner(caller)?;
        if period_secs < self.min_dormancy_period_secs {
            return Err(DeadmanError::DormancyBelowMinimum {
                requested: period_secs,
                minimum: self.min_dormancy_period_secs,
            });
        }
        let old_secs = self.state.dormancy_period_secs;
        self.state.dormancy_period_secs = period_secs;
        self.admin_event(SwitchEvent::DormancyPeriodUpdated {
            old_secs,
            new_secs: period_secs,
        });
        Ok(())
    }

    fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(DeadmanError::InvalidOwner(new_owner));
        }
        let previous = self.state.owner;
        self.state.owner = new_owner;
        info!(previous = ?previous, new = ?new_owner, "[dms] ownership transferred");
        self.admin_event(SwitchEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        Ok(())
    }
}
