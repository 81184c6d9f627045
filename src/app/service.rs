//! Monitor core: the per-cycle detection and delivery state machine.
//!
//! [`Monitor`] owns all cross-cycle state and runs two independent
//! detectors every poll cycle:
//!
//! - **Contact detector**: journals and reports a reed-switch transition.
//! - **Drift detector**: raises an alert when the temperature has fallen at
//!   least the configured threshold below the stored reference.
//!
//! All I/O flows through port traits injected at call sites, making the
//! whole cycle testable with mock adapters. Failure semantics: a sensor
//! fault skips detection and retains state, a delivery failure is reported
//! and the loop continues, a journal write failure still advances the
//! in-memory index so later entries stay internally consistent.

use log::{debug, warn};
use serde_json::json;

use crate::config::{MonitorConfig, ReferencePolicy};

use super::events::{ContactState, JournalEntry, MonitorEvent};
use super::ports::{
    ClockPort, ContactPort, DeliveryOutcome, EventSink, JournalPort, TemperaturePort, UplinkPort,
};

// ───────────────────────────────────────────────────────────────
// Cross-cycle state
// ───────────────────────────────────────────────────────────────

/// Everything the monitor carries from one poll cycle to the next. One
/// value, owned by the single loop; no module-level statics.
#[derive(Debug, Clone, Copy)]
pub struct MonitorState {
    /// Contact state observed in the previous cycle.
    last_contact: ContactState,
    /// Drift baseline. `None` until the first successful reading.
    reference_c: Option<f64>,
    /// Suppresses a second alert within the same cycle's evaluation.
    /// Cleared at the start of every cycle.
    alert_cooldown: bool,
    /// Journal index the next entry will use.
    next_index: u64,
}

// ───────────────────────────────────────────────────────────────
// Monitor
// ───────────────────────────────────────────────────────────────

/// The orchestrator: polls the sources, runs both detectors, journals
/// observations, and hands detected events to the uplink.
pub struct Monitor {
    config: MonitorConfig,
    state: MonitorState,
}

impl Monitor {
    /// Construct the monitor from boot-time sensor reads and the index
    /// recovered from the journal.
    ///
    /// If the initial temperature read failed, the reference stays unset
    /// and the first successful reading seeds it with no drift evaluation
    /// that cycle.
    pub fn new(
        config: MonitorConfig,
        initial_contact: ContactState,
        initial_temperature: Option<f64>,
        next_index: u64,
    ) -> Self {
        Self {
            config,
            state: MonitorState {
                last_contact: initial_contact,
                reference_c: initial_temperature,
                alert_cooldown: false,
                next_index,
            },
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Report the boot-time contact state to the collector once, before
    /// the poll loop starts.
    pub fn announce(&mut self, uplink: &mut impl UplinkPort, sink: &mut impl EventSink) {
        let contact = self.state.last_contact;
        sink.emit(&MonitorEvent::Started(contact));
        Self::deliver(
            uplink,
            sink,
            &self.config.contact_endpoint,
            &json!({ "reed_state": contact.is_open() }),
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full poll cycle: read sources → contact detector → drift
    /// detector → plain temperature delivery.
    ///
    /// The `sensors` parameter satisfies **both** [`ContactPort`] and
    /// [`TemperaturePort`]: one mutable borrow, explicit port boundary.
    /// Contact handling runs first, so a transition resets the drift
    /// reference before the drift detector evaluates it.
    pub fn poll_cycle(
        &mut self,
        sensors: &mut (impl ContactPort + TemperaturePort),
        journal: &mut impl JournalPort,
        uplink: &mut impl UplinkPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        // One-cycle debounce: the cooldown never outlives the cycle it
        // was set in.
        self.state.alert_cooldown = false;

        let contact = sensors.read_contact();
        let temperature = match sensors.read_temperature() {
            Ok(t) => Some(t),
            Err(fault) => {
                debug!("temperature unavailable this cycle: {fault}");
                None
            }
        };

        // ── Contact detector ──────────────────────────────────
        if contact != self.state.last_contact {
            self.state.last_contact = contact;
            if let Some(t) = temperature {
                self.state.reference_c = Some(t);
            }

            let entry = JournalEntry::new(self.state.next_index, clock.now(), temperature, contact);
            // The in-memory index advances even when the write is lost, so
            // future entries never collide with each other.
            self.state.next_index += 1;
            if let Err(e) = journal.append(&entry) {
                warn!("continuing without persistence for index {}: {e}", entry.index);
            }

            sink.emit(&MonitorEvent::ContactChanged {
                state: contact,
                temperature,
            });
            Self::deliver(
                uplink,
                sink,
                &self.config.contact_endpoint,
                &json!({ "reed_state": contact.is_open() }),
            );
        }

        // ── Drift detector ────────────────────────────────────
        let Some(current) = temperature else {
            // Sensor fault: skip evaluation, retain the reference.
            return;
        };

        match self.state.reference_c {
            None => {
                // First successful reading seeds the baseline; no drift
                // evaluation this cycle.
                self.state.reference_c = Some(current);
            }
            Some(reference) => {
                let drop = reference - current;
                // `current < reference` guards against spurious equal-value
                // differences from sensor noise.
                if drop >= self.config.drop_threshold_c
                    && current < reference
                    && !self.state.alert_cooldown
                {
                    sink.emit(&MonitorEvent::TemperatureDrop { reference, current });
                    Self::deliver(
                        uplink,
                        sink,
                        &self.config.alert_endpoint,
                        &json!({
                            "alert": self.config.alert_message,
                            "temperature": current,
                        }),
                    );
                    self.state.reference_c = Some(current);
                    self.state.alert_cooldown = true;
                } else if self.config.reference_policy == ReferencePolicy::EveryReading {
                    self.state.reference_c = Some(current);
                }
            }
        }

        // Plain sample delivery happens whenever a reading exists,
        // independently of alert firing.
        sink.emit(&MonitorEvent::TemperatureSample(current));
        Self::deliver(
            uplink,
            sink,
            &self.config.temperature_endpoint,
            &json!({ "temperature": current }),
        );
    }

    // ── Queries ───────────────────────────────────────────────

    /// Contact state after the most recent cycle.
    pub fn contact(&self) -> ContactState {
        self.state.last_contact
    }

    /// Current drift baseline, if one has been established.
    pub fn reference_c(&self) -> Option<f64> {
        self.state.reference_c
    }

    /// Index the next journal entry will carry.
    pub fn next_index(&self) -> u64 {
        self.state.next_index
    }

    // ── Internal ──────────────────────────────────────────────

    fn deliver(
        uplink: &mut impl UplinkPort,
        sink: &mut impl EventSink,
        endpoint: &str,
        payload: &serde_json::Value,
    ) {
        if uplink.deliver(endpoint, payload) == DeliveryOutcome::Failed {
            warn!("delivery to {endpoint} failed after retries");
            sink.emit(&MonitorEvent::DeliveryFailed {
                endpoint: endpoint.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PersistenceError, SensorFault};
    use chrono::{NaiveDate, NaiveDateTime};

    struct FakeSensors {
        contact: ContactState,
        temperature: Result<f64, SensorFault>,
    }
    impl ContactPort for FakeSensors {
        fn read_contact(&mut self) -> ContactState {
            self.contact
        }
    }
    impl TemperaturePort for FakeSensors {
        fn read_temperature(&mut self) -> Result<f64, SensorFault> {
            self.temperature
        }
    }

    #[derive(Default)]
    struct MemJournal {
        rows: Vec<JournalEntry>,
    }
    impl JournalPort for MemJournal {
        fn ensure_initialized(&mut self) -> Result<(), PersistenceError> {
            Ok(())
        }
        fn recover_next_index(&mut self) -> u64 {
            self.rows.last().map_or(0, |e| e.index + 1)
        }
        fn append(&mut self, entry: &JournalEntry) -> Result<(), PersistenceError> {
            self.rows.push(entry.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingUplink {
        calls: Vec<(String, serde_json::Value)>,
    }
    impl UplinkPort for RecordingUplink {
        fn deliver(&mut self, endpoint: &str, payload: &serde_json::Value) -> DeliveryOutcome {
            self.calls.push((endpoint.to_string(), payload.clone()));
            DeliveryOutcome::Delivered
        }
    }

    struct FixedClock;
    impl ClockPort for FixedClock {
        fn now(&self) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<MonitorEvent>,
    }
    impl EventSink for RecordingSink {
        fn emit(&mut self, event: &MonitorEvent) {
            self.events.push(event.clone());
        }
    }

    fn monitor() -> Monitor {
        Monitor::new(MonitorConfig::default(), ContactState::Open, Some(23.6), 0)
    }

    #[test]
    fn failed_initial_read_leaves_reference_unset_until_first_reading() {
        let mut m = Monitor::new(MonitorConfig::default(), ContactState::Open, None, 0);
        assert_eq!(m.reference_c(), None);

        let mut sensors = FakeSensors {
            contact: ContactState::Open,
            temperature: Ok(19.25),
        };
        let (mut journal, mut uplink, mut sink) =
            (MemJournal::default(), RecordingUplink::default(), RecordingSink::default());
        m.poll_cycle(&mut sensors, &mut journal, &mut uplink, &FixedClock, &mut sink);

        // Seeded, and no alert was evaluated against the fresh baseline.
        assert_eq!(m.reference_c(), Some(19.25));
        assert!(!sink.events.iter().any(|e| matches!(e, MonitorEvent::TemperatureDrop { .. })));
    }

    #[test]
    fn steady_state_produces_no_journal_rows() {
        let mut m = monitor();
        let mut sensors = FakeSensors {
            contact: ContactState::Open,
            temperature: Ok(23.6),
        };
        let (mut journal, mut uplink, mut sink) =
            (MemJournal::default(), RecordingUplink::default(), RecordingSink::default());
        for _ in 0..5 {
            m.poll_cycle(&mut sensors, &mut journal, &mut uplink, &FixedClock, &mut sink);
        }
        assert!(journal.rows.is_empty());
        assert_eq!(m.next_index(), 0);
    }

    #[test]
    fn announce_reports_boot_state() {
        let mut m = monitor();
        let mut uplink = RecordingUplink::default();
        let mut sink = RecordingSink::default();
        m.announce(&mut uplink, &mut sink);

        assert_eq!(sink.events, vec![MonitorEvent::Started(ContactState::Open)]);
        assert_eq!(uplink.calls.len(), 1);
        assert_eq!(uplink.calls[0].0, "/reed_sensor");
        assert_eq!(uplink.calls[0].1, json!({ "reed_state": true }));
    }

    #[test]
    fn equal_reading_never_alerts() {
        // reference - current == 0: the strict `current < reference` guard
        // holds even with a zero threshold.
        let mut config = MonitorConfig::default();
        config.drop_threshold_c = 0.0;
        let mut m = Monitor::new(config, ContactState::Open, Some(20.0), 0);

        let mut sensors = FakeSensors {
            contact: ContactState::Open,
            temperature: Ok(20.0),
        };
        let (mut journal, mut uplink, mut sink) =
            (MemJournal::default(), RecordingUplink::default(), RecordingSink::default());
        m.poll_cycle(&mut sensors, &mut journal, &mut uplink, &FixedClock, &mut sink);

        assert!(!sink.events.iter().any(|e| matches!(e, MonitorEvent::TemperatureDrop { .. })));
    }
}
