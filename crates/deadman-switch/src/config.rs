//! Switch configuration.
//!
//! Loaded from JSON (string or file) or from `DMS_*` environment variables.
//! Addresses and hashes are `0x`-prefixed hex strings.

use crate::constants::{
    DEFAULT_DORMANCY_PERIOD_SECS, DEFAULT_MIN_DORMANCY_PERIOD_SECS, DEFAULT_THRESHOLD, ENV_PREFIX,
};
use crate::domain::{Address, DeadmanError, Hash, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Deployment configuration for one guarded vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// The protected vault.
    pub vault_address: Address,
    /// Administrative owner.
    pub owner: Address,
    /// Chain the attestations are proven against.
    pub source_chain_id: u64,
    /// Accepted proof schema.
    pub query_schema: Hash,
    /// Identity allowed to deliver callbacks.
    pub attestation_relay: Address,
    /// Required silence before activation, in seconds.
    #[serde(default = "default_dormancy")]
    pub dormancy_period_secs: u64,
    /// Lower bound enforced by `set_dormancy_period`.
    #[serde(default = "default_min_dormancy")]
    pub min_dormancy_period_secs: u64,
    /// Threshold applied on activation.
    #[serde(default = "default_threshold")]
    pub threshold: u64,
    /// Signers granted authority on activation.
    #[serde(default)]
    pub contingency_signers: Vec<Address>,
}

fn default_dormancy() -> u64 {
    DEFAULT_DORMANCY_PERIOD_SECS
}

fn default_min_dormancy() -> u64 {
    DEFAULT_MIN_DORMANCY_PERIOD_SECS
}

fn default_threshold() -> u64 {
    DEFAULT_THRESHOLD
}

impl SwitchConfig {
    /// Config with defaults for everything but the anchors.
    pub fn new(
        vault_address: Address,
        owner: Address,
        source_chain_id: u64,
        query_schema: Hash,
        attestation_relay: Address,
    ) -> Self {
        Self {
            vault_address,
            owner,
            source_chain_id,
            query_schema,
            attestation_relay,
            dormancy_period_secs: DEFAULT_DORMANCY_PERIOD_SECS,
            min_dormancy_period_secs: DEFAULT_MIN_DORMANCY_PERIOD_SECS,
            threshold: DEFAULT_THRESHOLD,
            contingency_signers: Vec::new(),
        }
    }

    /// Parse and validate JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Build from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DMS_VAULT_ADDRESS` (required)
    /// - `DMS_OWNER` (required)
    /// - `DMS_SOURCE_CHAIN_ID` (required)
    /// - `DMS_QUERY_SCHEMA` (required)
    /// - `DMS_ATTESTATION_RELAY` (required)
    /// - `DMS_DORMANCY_PERIOD_SECS` (default: 50 days)
    /// - `DMS_MIN_DORMANCY_PERIOD_SECS` (default: 0)
    /// - `DMS_THRESHOLD` (default: 1)
    /// - `DMS_CONTINGENCY_SIGNERS`: comma-separated addresses (default: none)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup using the `DMS_*` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(format!("{ENV_PREFIX}{name}").as_str());
        let required = |name: &str| {
            get(name).ok_or_else(|| {
                DeadmanError::Configuration(format!("missing {ENV_PREFIX}{name}"))
            })
        };

        let mut config = Self::new(
            parse_field("VAULT_ADDRESS", &required("VAULT_ADDRESS")?)?,
            parse_field("OWNER", &required("OWNER")?)?,
            parse_field("SOURCE_CHAIN_ID", &required("SOURCE_CHAIN_ID")?)?,
            parse_field("QUERY_SCHEMA", &required("QUERY_SCHEMA")?)?,
            parse_field("ATTESTATION_RELAY", &required("ATTESTATION_RELAY")?)?,
        );
        if let Some(v) = get("DORMANCY_PERIOD_SECS") {
            config.dormancy_period_secs = parse_field("DORMANCY_PERIOD_SECS", &v)?;
        }
        if let Some(v) = get("MIN_DORMANCY_PERIOD_SECS") {
            config.min_dormancy_period_secs = parse_field("MIN_DORMANCY_PERIOD_SECS", &v)?;
        }
        if let Some(v) = get("THRESHOLD") {
            config.threshold = parse_field("THRESHOLD", &v)?;
        }
        if let Some(v) = get("CONTINGENCY_SIGNERS") {
            config.contingency_signers = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_field("CONTINGENCY_SIGNERS", s))
                .collect::<Result<_>>()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the switch cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.vault_address.is_zero() {
            return Err(DeadmanError::Configuration("vault_address is zero".into()));
        }
        if self.owner.is_zero() {
            return Err(DeadmanError::Configuration("owner is zero".into()));
        }
        if self.attestation_relay.is_zero() {
            return Err(DeadmanError::Configuration("attestation_relay is zero".into()));
        }
        if self.query_schema.is_zero() {
            return Err(DeadmanError::Configuration("query_schema is zero".into()));
        }
        if self.threshold == 0 {
            return Err(DeadmanError::ZeroThreshold);
        }
        if self.dormancy_period_secs < self.min_dormancy_period_secs {
            return Err(DeadmanError::DormancyBelowMinimum {
                requested: self.dormancy_period_secs,
                minimum: self.min_dormancy_period_secs,
            });
        }
        if let Some(bad) = self.contingency_signers.iter().find(|s| s.is_zero()) {
            return Err(DeadmanError::InvalidSigner(*bad));
        }
        Ok(())
    }
}

fn parse_field<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        DeadmanError::Configuration(format!("invalid {ENV_PREFIX}{name} '{raw}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECS_PER_DAY;
    use std::collections::HashMap;
    use std::io::Write;

    const VAULT: &str = "0x1010101010101010101010101010101010101010";
    const OWNER: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";
    const RELAY: &str = "0xa0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0";
    const SCHEMA: &str = "0x5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c";

    fn base_json() -> String {
        format!(
            r#"{{
                "vault_address": "{VAULT}",
                "owner": "{OWNER}",
                "source_chain_id": 1,
                "query_schema": "{SCHEMA}",
                "attestation_relay": "{RELAY}"
            }}"#
        )
    }

    fn base_env() -> HashMap<String, String> {
        [
            ("DMS_VAULT_ADDRESS", VAULT),
            ("DMS_OWNER", OWNER),
            ("DMS_SOURCE_CHAIN_ID", "1"),
            ("DMS_QUERY_SCHEMA", SCHEMA),
            ("DMS_ATTESTATION_RELAY", RELAY),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_json_defaults() {
        let config = SwitchConfig::from_json_str(&base_json()).unwrap();
        assert_eq!(config.dormancy_period_secs, 50 * SECS_PER_DAY);
        assert_eq!(config.min_dormancy_period_secs, 0);
        assert_eq!(config.threshold, 1);
        assert!(config.contingency_signers.is_empty());
        assert_eq!(config.vault_address, Address::new([0x10; 20]));
    }

    #[test]
    fn test_json_rejects_bad_hex() {
        let json = base_json().replace(VAULT, "0x1234");
        let err = SwitchConfig::from_json_str(&json).unwrap_err();
        assert!(matches!(err, DeadmanError::Configuration(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(base_json().as_bytes()).unwrap();
        let config = SwitchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.source_chain_id, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = SwitchConfig::from_file("/nonexistent/dms.json").unwrap_err();
        assert!(matches!(err, DeadmanError::Configuration(_)));
    }

    #[test]
    fn test_env_lookup_parses_signer_list() {
        let mut env = base_env();
        env.insert(
            "DMS_CONTINGENCY_SIGNERS".into(),
            "0x0101010101010101010101010101010101010101, 0x0202020202020202020202020202020202020202,".into(),
        );
        env.insert("DMS_THRESHOLD".into(), "2".into());

        let config = SwitchConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(
            config.contingency_signers,
            vec![Address::new([0x01; 20]), Address::new([0x02; 20])]
        );
        assert_eq!(config.threshold, 2);
    }

    #[test]
    fn test_env_lookup_missing_required() {
        let mut env = base_env();
        env.remove("DMS_OWNER");
        let err = SwitchConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("DMS_OWNER"));
    }

    #[test]
    fn test_json_rejects_zero_relay() {
        let json = base_json().replace(RELAY, "0x0000000000000000000000000000000000000000");
        let err = SwitchConfig::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("attestation_relay"));
    }

    #[test]
    fn test_env_lookup_bad_number() {
        let mut env = base_env();
        env.insert("DMS_DORMANCY_PERIOD_SECS".into(), "soon".into());
        let err = SwitchConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("DMS_DORMANCY_PERIOD_SECS"));
    }

    #[test]
    fn test_validate_rules() {
        let base = SwitchConfig::from_json_str(&base_json()).unwrap();

        let mut c = base.clone();
        c.threshold = 0;
        assert!(matches!(c.validate(), Err(DeadmanError::ZeroThreshold)));

        let mut c = base.clone();
        c.owner = Address::ZERO;
        assert!(matches!(c.validate(), Err(DeadmanError::Configuration(_))));

        let mut c = base.clone();
        c.attestation_relay = Address::ZERO;
        assert!(matches!(c.validate(), Err(DeadmanError::Configuration(_))));

        let mut c = base.clone();
        c.query_schema = Hash::ZERO;
        assert!(matches!(c.validate(), Err(DeadmanError::Configuration(_))));

        let mut c = base.clone();
        c.min_dormancy_period_secs = c.dormancy_period_secs + 1;
        assert!(matches!(c.validate(), Err(DeadmanError::DormancyBelowMinimum { .. })));

        let mut c = base;
        c.contingency_signers.push(Address::ZERO);
        assert!(matches!(c.validate(), Err(DeadmanError::InvalidSigner(_))));
    }
}
