//! System configuration parameters
//!
//! All tunable parameters for the SillGuard monitor. Values are fixed at
//! deploy time: an optional JSON file is read once at startup and anything
//! it omits falls back to the defaults below. There is no runtime
//! reconfiguration surface.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

/// Governs when the drift baseline is replaced by the current reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Reset the reference only when an alert fires or the contact
    /// transitions. A slow, steady decline keeps accumulating drift
    /// against the original baseline until it crosses the threshold.
    OnEvent,
    /// Reset the reference on every successful reading. Only a drop
    /// steeper than the threshold within one poll interval can alert.
    EveryReading,
}

/// Core monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Detection ---
    /// Poll cycle interval (seconds)
    pub poll_interval_secs: u64,
    /// Minimum temperature drop (Celsius) that raises an alert
    pub drop_threshold_c: f64,
    /// When the drift baseline is replaced
    pub reference_policy: ReferencePolicy,

    // --- Delivery ---
    /// Attempts per delivery before giving up
    pub delivery_attempts: u32,
    /// Pause between delivery attempts (seconds)
    pub delivery_backoff_secs: u64,
    /// Per-request HTTP timeout (seconds)
    pub http_timeout_secs: u64,
    /// Collector path for contact-state reports
    pub contact_endpoint: String,
    /// Collector path for plain temperature samples
    pub temperature_endpoint: String,
    /// Collector path for drift alerts
    pub alert_endpoint: String,
    /// Message string carried in the alert payload
    pub alert_message: String,

    // --- Hardware ---
    /// BCM GPIO number of the reed-switch input
    pub contact_gpio: u32,
    /// One-wire bus device directory
    pub onewire_dir: PathBuf,

    // --- Files ---
    /// Append-only observation journal
    pub journal_path: PathBuf,
    /// Network profiles, one `ssid,password,base_url` per line
    pub credentials_path: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Detection
            poll_interval_secs: 4,
            drop_threshold_c: 2.0,
            reference_policy: ReferencePolicy::OnEvent,

            // Delivery
            delivery_attempts: 3,
            delivery_backoff_secs: 5,
            http_timeout_secs: 30,
            contact_endpoint: "/reed_sensor".into(),
            temperature_endpoint: "/temp_sensor".into(),
            alert_endpoint: "/temp_alert".into(),
            alert_message: "temperature drop detected".into(),

            // Hardware
            contact_gpio: 17,
            onewire_dir: PathBuf::from("/sys/bus/w1/devices"),

            // Files
            journal_path: PathBuf::from("log.csv"),
            credentials_path: PathBuf::from("wifi.txt"),
        }
    }
}

impl MonitorConfig {
    /// Read configuration from `path`, falling back to defaults when the
    /// file is absent or unparseable. A bad config file must not keep the
    /// device from monitoring, so parse failures warn and continue.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!("config {} unparseable ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = MonitorConfig::default();
        assert!(c.poll_interval_secs > 0);
        assert!(c.drop_threshold_c > 0.0);
        assert!(c.delivery_attempts > 0);
        assert!(c.contact_endpoint.starts_with('/'));
        assert!(c.temperature_endpoint.starts_with('/'));
        assert!(c.alert_endpoint.starts_with('/'));
    }

    #[test]
    fn serde_roundtrip() {
        let c = MonitorConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.poll_interval_secs, c2.poll_interval_secs);
        assert!((c.drop_threshold_c - c2.drop_threshold_c).abs() < 0.001);
        assert_eq!(c.reference_policy, c2.reference_policy);
        assert_eq!(c.contact_endpoint, c2.contact_endpoint);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let json = r#"{"drop_threshold_c": 3.5, "reference_policy": "every_reading"}"#;
        let c: MonitorConfig = serde_json::from_str(json).unwrap();
        assert!((c.drop_threshold_c - 3.5).abs() < 0.001);
        assert_eq!(c.reference_policy, ReferencePolicy::EveryReading);
        assert_eq!(c.poll_interval_secs, 4);
        assert_eq!(c.alert_endpoint, "/temp_alert");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let c = MonitorConfig::load_or_default(Path::new("/nonexistent/sillguard.json"));
        assert_eq!(c.delivery_attempts, 3);
    }
}
