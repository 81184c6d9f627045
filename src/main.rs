//! SillGuard: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative poll loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  SensorHub          CsvJournal        HttpUplink         │
//! │  (Contact+Temp)     (JournalPort)     (UplinkPort)       │
//! │  WallClock          LogEventSink      Provisioner        │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │           Monitor (pure logic)                 │      │
//! │  │  contact detector · drift detector · journal   │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Startup order matters: provisioning is resolved before anything else
//! because the monitor must not poll into a void; no delivery path is the
//! one fatal condition. Everything after that degrades gracefully.

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use sillguard::adapters::clock::WallClock;
use sillguard::adapters::journal::CsvJournal;
use sillguard::adapters::log_sink::LogEventSink;
use sillguard::adapters::provisioning::{self, HttpReachability, Provisioner};
use sillguard::adapters::uplink::HttpUplink;
use sillguard::app::ports::{ContactPort, JournalPort, TemperaturePort};
use sillguard::app::service::Monitor;
use sillguard::config::MonitorConfig;
use sillguard::retry::Backoff;
use sillguard::sensors::contact::ReedSwitch;
use sillguard::sensors::{SensorHub, ThermometerSource};

/// Deploy-time configuration file. Absent file means defaults.
const CONFIG_PATH: &str = "/etc/sillguard/config.json";

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("sillguard v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = MonitorConfig::load_or_default(Path::new(CONFIG_PATH));
    let http_timeout = Duration::from_secs(config.http_timeout_secs);

    // ── 3. Provisioning (fatal if no delivery path) ───────────
    let profiles = provisioning::load_profiles(&config.credentials_path)
        .context("network provisioning")?;
    let mut provisioner = Provisioner::new(profiles, HttpReachability::new(http_timeout));
    let base_url = provisioner.connect().context("network provisioning")?;

    // ── 4. Journal recovery ───────────────────────────────────
    let mut journal = CsvJournal::new(config.journal_path.clone());
    journal
        .ensure_initialized()
        .context("journal initialisation")?;
    let next_index = journal.recover_next_index();
    info!("journal resumes at index {next_index}");

    // ── 5. Sensors ────────────────────────────────────────────
    let mut hub = SensorHub::new(
        ReedSwitch::new(config.contact_gpio),
        ThermometerSource::discover(&config.onewire_dir),
    );
    let initial_contact = hub.read_contact();
    let initial_temperature = match hub.read_temperature() {
        Ok(t) => Some(t),
        Err(fault) => {
            warn!("initial temperature read failed ({fault}); reference seeds on first reading");
            None
        }
    };

    // ── 6. Uplink + monitor ───────────────────────────────────
    let mut uplink = HttpUplink::new(
        base_url,
        http_timeout,
        Backoff::new(
            config.delivery_attempts,
            Duration::from_secs(config.delivery_backoff_secs),
        ),
    );
    let mut sink = LogEventSink::new();
    let clock = WallClock;
    let poll_interval = Duration::from_secs(config.poll_interval_secs.max(1));

    let mut monitor = Monitor::new(config, initial_contact, initial_temperature, next_index);
    monitor.announce(&mut uplink, &mut sink);

    // ── 7. Poll loop ──────────────────────────────────────────
    info!("monitoring (cycle every {poll_interval:?})");
    loop {
        monitor.poll_cycle(&mut hub, &mut journal, &mut uplink, &clock, &mut sink);
        thread::sleep(poll_interval);
    }
}
