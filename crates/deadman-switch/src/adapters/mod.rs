//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports.

mod clock;
mod event_log;
mod in_memory_vault;

pub use clock::{ManualClock, SystemClock};
pub use event_log::{InMemoryEventLog, TracingEventPublisher};
pub use in_memory_vault::InMemoryVault;
