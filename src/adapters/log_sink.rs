//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured monitor events to the
//! `log` facade (stdout/journald in production). A future MQTT or
//! on-device display adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::MonitorEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`MonitorEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Started(contact) => {
                info!("START | contact={contact}");
            }
            MonitorEvent::ContactChanged { state, temperature } => match temperature {
                Some(t) => info!("CONTACT | now {state} | T={t:.1}\u{00b0}C"),
                None => info!("CONTACT | now {state} | T=unavailable"),
            },
            MonitorEvent::TemperatureSample(t) => {
                info!("TEMP | {t:.1}\u{00b0}C");
            }
            MonitorEvent::TemperatureDrop { reference, current } => {
                warn!(
                    "ALERT | temperature drop {:.1}\u{00b0}C (reference {reference:.1} -> current {current:.1})",
                    reference - current
                );
            }
            MonitorEvent::DeliveryFailed { endpoint } => {
                warn!("UPLINK | delivery to {endpoint} failed");
            }
        }
    }
}
