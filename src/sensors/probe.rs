//! One-wire thermometer source.
//!
//! Reads the kernel w1-therm `temperature` attribute, which reports
//! millidegrees Celsius as a signed decimal string. The kernel driver
//! performs the bus conversion (including its ~1 s delay and CRC check),
//! so a read here blocks for at most one conversion and either yields a
//! trustworthy value or an error, never garbage.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::ports::TemperaturePort;
use crate::error::SensorFault;

/// Sysfs-backed one-wire thermometer.
pub struct OneWireThermometer {
    temperature_path: PathBuf,
}

impl OneWireThermometer {
    /// Use the `temperature` attribute of a discovered device directory.
    pub fn from_device_dir(device_dir: &Path) -> Self {
        Self {
            temperature_path: device_dir.join("temperature"),
        }
    }
}

impl TemperaturePort for OneWireThermometer {
    fn read_temperature(&mut self) -> Result<f64, SensorFault> {
        let raw = fs::read_to_string(&self.temperature_path).map_err(|_| SensorFault::BusRead)?;
        parse_millidegrees(raw.trim())
    }
}

/// Parse a w1-therm millidegree string into Celsius.
fn parse_millidegrees(raw: &str) -> Result<f64, SensorFault> {
    let millidegrees: i32 = raw.parse().map_err(|_| SensorFault::Malformed)?;
    Ok(f64::from(millidegrees) / 1000.0)
}
