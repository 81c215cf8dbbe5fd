//! Structured logging helpers.
//!
//! Every record written through these macros carries:
//! - `component`: emitting component (`service`, `vault`, `events`, ...)
//! - `event`: short machine-readable name
//! - any extra fields supplied by the caller

/// Log a switch event with standard fields.
///
/// ```rust,ignore
/// log_switch_event!(info, "service", "switch_activated", "[dms] switch activated", signers = 3);
/// ```
#[macro_export]
macro_rules! log_switch_event {
    ($level:ident, $component:expr, $event:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = $component,
            event = $event,
            $($($field)*,)?
            $msg
        )
    };
}

/// Render a serializable payload for a log field.
///
/// Never fails: unserializable values become a placeholder string.
pub fn json_field<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Sample {
        threshold: u64,
    }

    #[test]
    fn test_json_field() {
        assert_eq!(json_field(&Sample { threshold: 2 }), r#"{"threshold":2}"#);
    }

    #[test]
    fn test_macro_expands_at_every_level() {
        crate::init_test_logging();
        log_switch_event!(info, "test", "threshold_updated", "[dms] info", new = 2);
        log_switch_event!(warn, "test", "activation_rejected", "[dms] warn");
        log_switch_event!(debug, "test", "rollout", "[dms] debug", calls = 3, ok = true);
        log_switch_event!(error, "test", "vault", "[dms] error");
    }
}
