//! Deployment defaults.

/// Seconds per day.
pub const SECS_PER_DAY: u64 = 86_400;

/// Default dormancy period: 50 days.
pub const DEFAULT_DORMANCY_PERIOD_SECS: u64 = 50 * SECS_PER_DAY;

/// Default floor for `set_dormancy_period`. Zero disables the floor.
pub const DEFAULT_MIN_DORMANCY_PERIOD_SECS: u64 = 0;

/// Default threshold applied on activation.
pub const DEFAULT_THRESHOLD: u64 = 1;

/// Prefix for environment variables read by `SwitchConfig::from_env`.
pub const ENV_PREFIX: &str = "DMS_";
