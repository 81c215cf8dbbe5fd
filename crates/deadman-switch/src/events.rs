//! # Event Schema
//!
//! Notifications emitted by the Deadman Switch. Every administrative
//! mutation and every callback outcome produces exactly one event.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `ContingencySignersAdded` | `add_contingency_signers` |
//! | `ContingencySignersRemoved` | `remove_contingency_signers` |
//! | `ThresholdUpdated` | `set_threshold` |
//! | `DormancyPeriodUpdated` | `set_dormancy_period` |
//! | `OwnershipTransferred` | `transfer_ownership` |
//! | `SwitchActivated` | `handle_attestation` (success) |
//! | `ActivationRejected` | `handle_attestation` (failure) |

use crate::domain::{Address, DeadmanError, Hash, U256};
use serde::{Deserialize, Serialize};

/// Deadman switch event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchEvent {
    /// New contingency signers registered.
    ContingencySignersAdded {
        /// Newly inserted signers (duplicates excluded).
        signers: Vec<Address>,
    },

    /// Contingency signers deregistered.
    ContingencySignersRemoved {
        /// Signers that were present and are now gone.
        signers: Vec<Address>,
    },

    /// Activation threshold changed.
    ThresholdUpdated {
        /// Previous value.
        old: u64,
        /// New value.
        new: u64,
    },

    /// Dormancy period changed.
    DormancyPeriodUpdated {
        /// Previous value (seconds).
        old_secs: u64,
        /// New value (seconds).
        new_secs: u64,
    },

    /// Administrative owner changed.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner.
        new: Address,
    },

    /// The switch fired and the signers were granted authority.
    SwitchActivated {
        /// Vault whose control was handed over.
        vault: Address,
        /// Query that carried the attestation.
        query_id: U256,
        /// Fingerprint of the attested transaction.
        fingerprint: Hash,
        /// Signers added, in rollout order.
        signers: Vec<Address>,
        /// Threshold applied.
        threshold: u64,
        /// Activation time (seconds).
        activated_at: u64,
    },

    /// A callback was refused. State is unchanged.
    ActivationRejected {
        /// Query that carried the attestation.
        query_id: U256,
        /// `DMS_ERR_` code of the failure.
        code: String,
        /// Full error message.
        reason: String,
    },
}

impl SwitchEvent {
    /// Rejection event for a failed callback.
    pub fn rejected(query_id: U256, err: &DeadmanError) -> Self {
        let reason = err.to_string();
        let code = reason
            .split(':')
            .next()
            .unwrap_or_default()
            .to_string();
        Self::ActivationRejected {
            query_id,
            code,
            reason,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContingencySignersAdded { .. } => "contingency_signers_added",
            Self::ContingencySignersRemoved { .. } => "contingency_signers_removed",
            Self::ThresholdUpdated { .. } => "threshold_updated",
            Self::DormancyPeriodUpdated { .. } => "dormancy_period_updated",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
            Self::SwitchActivated { .. } => "switch_activated",
            Self::ActivationRejected { .. } => "activation_rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_event_carries_code() {
        let event = SwitchEvent::rejected(U256::from(9u64), &DeadmanError::AlreadyActivated);
        match event {
            SwitchEvent::ActivationRejected { query_id, code, reason } => {
                assert_eq!(query_id, U256::from(9u64));
                assert_eq!(code, "DMS_ERR_400");
                assert!(reason.contains("already activated"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_json_is_tagged() {
        let event = SwitchEvent::ThresholdUpdated { old: 1, new: 2 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "threshold_updated");
        assert_eq!(json["new"], 2);
        assert_eq!(event.name(), "threshold_updated");
    }

    #[test]
    fn test_addresses_serialize_as_hex() {
        let event = SwitchEvent::OwnershipTransferred {
            previous: Address::new([0x01; 20]),
            new: Address::new([0x02; 20]),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("0x0202020202020202020202020202020202020202"));
        let back: SwitchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
