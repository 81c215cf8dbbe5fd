//! Event Publisher Adapters

use crate::events::SwitchEvent;
use crate::ports::outbound::EventPublisher;
use dm_telemetry::{json_field, log_switch_event};
use parking_lot::Mutex;

/// Keeps every published event in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<SwitchEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events, oldest first.
    pub fn events(&self) -> Vec<SwitchEvent> {
        self.events.lock().clone()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<SwitchEvent> {
        self.events.lock().last().cloned()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing was published.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: SwitchEvent) {
        self.events.lock().push(event);
    }
}

/// Writes each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: SwitchEvent) {
        let payload = json_field(&event);
        log_switch_event!(info, "events", event.name(), "[dms] event", payload = %payload);
    }
}
