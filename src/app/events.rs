//! Domain data and outbound events.
//!
//! The [`Monitor`](super::service::Monitor) emits [`MonitorEvent`]s through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them; the shipped sink writes them to the
//! `log` facade.

use chrono::NaiveDateTime;

// ───────────────────────────────────────────────────────────────
// Contact state
// ───────────────────────────────────────────────────────────────

/// Debounced reed-switch state. With the input pulled up and the switch
/// wired to ground, the magnet (door/window shut) closes the circuit and
/// pulls the line low: low = `Closed`, high = `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactState {
    Open,
    Closed,
}

impl ContactState {
    /// Interpret a raw digital input level.
    pub fn from_level(high: bool) -> Self {
        if high { Self::Open } else { Self::Closed }
    }

    /// Raw wire representation, as the collector and journal expect it
    /// (`1` = open, `0` = closed).
    pub fn as_level(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Closed => 0,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl core::fmt::Display for ContactState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Journal entry
// ───────────────────────────────────────────────────────────────

/// Temperature placeholder written when no reading was available.
pub const TEMPERATURE_UNAVAILABLE: &str = "N/A";

/// One observation row in the append-only journal.
///
/// The CSV shape (`Index,Date,Time,Temperature,Status`, dates as
/// `DD/MM/YYYY`, times as `HH:MM:SS`, `N/A` for a missing temperature,
/// status as `0`/`1`) is consumed downstream and must not change.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub index: u64,
    pub date: String,
    pub time: String,
    pub temperature: Option<f64>,
    pub status: ContactState,
}

impl JournalEntry {
    pub fn new(index: u64, at: NaiveDateTime, temperature: Option<f64>, status: ContactState) -> Self {
        Self {
            index,
            date: at.format("%d/%m/%Y").to_string(),
            time: at.format("%H:%M:%S").to_string(),
            temperature,
            status,
        }
    }

    /// Render the row exactly as it appears in the journal file, without
    /// the trailing newline.
    pub fn csv_row(&self) -> String {
        let temperature = match self.temperature {
            Some(t) => t.to_string(),
            None => TEMPERATURE_UNAVAILABLE.to_string(),
        };
        format!(
            "{},{},{},{},{}",
            self.index,
            self.date,
            self.time,
            temperature,
            self.status.as_level()
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Monitor events
// ───────────────────────────────────────────────────────────────

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// The monitor came up; carries the boot-time contact state.
    Started(ContactState),

    /// The contact changed state. Temperature is the best-effort reading
    /// taken in the same cycle, if one was available.
    ContactChanged {
        state: ContactState,
        temperature: Option<f64>,
    },

    /// A plain temperature sample was taken this cycle.
    TemperatureSample(f64),

    /// The reading dropped at least the threshold below the reference.
    TemperatureDrop { reference: f64, current: f64 },

    /// A delivery exhausted its retry budget.
    DeliveryFailed { endpoint: String },
}
