//! Sensor subsystem: source adapters and the aggregating [`SensorHub`].
//!
//! The hub owns both sources and satisfies the [`ContactPort`] and
//! [`TemperaturePort`] traits at once, so the monitor takes a single
//! mutable borrow per cycle.
//!
//! One-wire probe discovery happens once at startup: the bus directory is
//! scanned for thermometer-family devices and only the first hit is used.
//! Zero discovered probes is a permanent "no temperature" condition for
//! the run: every journal row carries the `N/A` sentinel and the drift
//! detector never fires.

pub mod contact;
pub mod probe;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::events::ContactState;
use crate::app::ports::{ContactPort, TemperaturePort};
use crate::error::SensorFault;

use contact::ReedSwitch;
use probe::OneWireThermometer;

/// Directory-name prefix of DS18B20-class thermometers (one-wire family
/// code 0x28).
const THERMOMETER_FAMILY_PREFIX: &str = "28-";

/// Scan the one-wire bus directory and return the first discovered
/// thermometer, if any. Scan order is made deterministic by sorting the
/// device names.
pub fn discover_probe(bus_dir: &Path) -> Option<OneWireThermometer> {
    let entries = match fs::read_dir(bus_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("one-wire bus {} unreadable: {e}", bus_dir.display());
            return None;
        }
    };

    let mut devices: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(THERMOMETER_FAMILY_PREFIX))
        })
        .collect();
    devices.sort();

    match devices.first() {
        Some(device) => {
            info!("one-wire probe: {}", device.display());
            if devices.len() > 1 {
                info!("ignoring {} additional probe(s) on the bus", devices.len() - 1);
            }
            Some(OneWireThermometer::from_device_dir(device))
        }
        None => {
            warn!("no one-wire thermometer discovered; running without temperature");
            None
        }
    }
}

/// Temperature source for the run: a discovered probe, or a permanent
/// fault when the bus scan came up empty.
pub enum ThermometerSource {
    Probe(OneWireThermometer),
    Absent,
}

impl ThermometerSource {
    pub fn discover(bus_dir: &Path) -> Self {
        match discover_probe(bus_dir) {
            Some(probe) => Self::Probe(probe),
            None => Self::Absent,
        }
    }
}

impl TemperaturePort for ThermometerSource {
    fn read_temperature(&mut self) -> Result<f64, SensorFault> {
        match self {
            Self::Probe(probe) => probe.read_temperature(),
            Self::Absent => Err(SensorFault::NoProbe),
        }
    }
}

/// Aggregates both sources behind the sensor ports.
pub struct SensorHub {
    contact: ReedSwitch,
    thermometer: ThermometerSource,
}

impl SensorHub {
    pub fn new(contact: ReedSwitch, thermometer: ThermometerSource) -> Self {
        Self {
            contact,
            thermometer,
        }
    }
}

impl ContactPort for SensorHub {
    fn read_contact(&mut self) -> ContactState {
        self.contact.read_contact()
    }
}

impl TemperaturePort for SensorHub {
    fn read_temperature(&mut self) -> Result<f64, SensorFault> {
        self.thermometer.read_temperature()
    }
}
