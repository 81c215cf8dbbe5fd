//! # DMS Telemetry
//!
//! Structured logging for the Deadman Switch.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dm_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Logs are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `deadman-switch` | Service name in records |
//! | `DMS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `DMS_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `DMS_CONSOLE_OUTPUT` | `true` | Write to stdout |

#![warn(missing_docs)]

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use logging::json_field;

#[doc(hidden)]
pub use tracing;

use std::sync::Once;
use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The log filter could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active. Logs a shutdown line on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "[dms] shutting down telemetry");
    }
}

static TEST_LOGGING: Once = Once::new();

/// Install a test-friendly subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
