// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod engine;
pub mod fetch;
pub mod listing;
pub mod monitor;
pub mod notify;
pub mod offer;
pub mod snapshot;
pub mod throttle;

// ---- Re-exports for stable public API ----
pub use crate::engine::{decide, Alert, AlertKind, TrackedDateFilter};
pub use crate::monitor::{run_monitor, Monitor, TickReport};
pub use crate::notify::{AlertSink, OutboundMessage};
pub use crate::offer::{FlightKey, FlightOffer};
pub use crate::snapshot::{ErrorMarker, FlightState, Snapshot};
