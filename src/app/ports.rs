//! Port traits: the hexagonal boundary between the monitor core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Monitor (domain)
//! ```
//!
//! Driven adapters (sensors, journal, uplink, clock, event sinks) implement
//! these traits. The [`Monitor`](super::service::Monitor) consumes them via
//! generics, so the core never touches sysfs, files, or sockets directly and
//! is fully exercisable with mocks.

use chrono::NaiveDateTime;

use crate::error::{PersistenceError, SensorFault};

use super::events::{ContactState, JournalEntry, MonitorEvent};

// ───────────────────────────────────────────────────────────────
// Sensor ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Reed-switch read. A digital input always has a level, so this cannot
/// fail; adapters that lose the backing input hold the last observed state.
pub trait ContactPort {
    fn read_contact(&mut self) -> ContactState;
}

/// Temperature probe read. Blocks for at most one sensor conversion. A
/// fault is non-fatal: the monitor treats it as "no new information" and
/// keeps its previous reference.
pub trait TemperaturePort {
    fn read_temperature(&mut self) -> Result<f64, SensorFault>;
}

// ───────────────────────────────────────────────────────────────
// Journal port (domain → durable store)
// ───────────────────────────────────────────────────────────────

/// Append-only observation store with crash recovery of the sequence index.
pub trait JournalPort {
    /// Create the backing store with its header if absent. Idempotent:
    /// calling this on an existing store must not touch it.
    fn ensure_initialized(&mut self) -> Result<(), PersistenceError>;

    /// Index for the next entry: last persisted index + 1, or 0 for an
    /// empty/absent store. An unreadable tail also yields 0; the adapter
    /// flags it for operator review rather than guessing.
    fn recover_next_index(&mut self) -> u64;

    /// Append one row. Never rewrites prior rows. Failure is reported, not
    /// retried; the caller decides whether to proceed without persistence.
    fn append(&mut self, entry: &JournalEntry) -> Result<(), PersistenceError>;
}

// ───────────────────────────────────────────────────────────────
// Uplink port (domain → collector)
// ───────────────────────────────────────────────────────────────

/// Terminal result of a delivery, after any internal retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
}

/// Delivers one JSON payload to an endpoint path on the collector.
/// At-least-once: a retried send that actually landed may be duplicated.
/// Exhausted retries surface as [`DeliveryOutcome::Failed`], never as a
/// panic or error; delivery failure must not stop the poll loop.
pub trait UplinkPort {
    fn deliver(&mut self, endpoint: &str, payload: &serde_json::Value) -> DeliveryOutcome;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Calendar time source for journal rows (wall clock, ideally NTP-synced
/// by the host).
pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The monitor emits structured [`MonitorEvent`]s through this port.
/// Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &MonitorEvent);
}
