//! Reed-switch contact source.
//!
//! Reads a digital input through the sysfs GPIO interface. Pin export and
//! pull-up configuration are done at deploy time (device-tree overlay or
//! boot script); raw GPIO setup is outside this crate.
//!
//! A digital input always has a level, so [`ContactPort`] cannot fail: if
//! the value file becomes unreadable the adapter holds the last observed
//! state, which reads as "no transition" to the monitor.

use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::app::events::ContactState;
use crate::app::ports::ContactPort;

/// Sysfs-backed reed-switch input.
pub struct ReedSwitch {
    value_path: PathBuf,
    last: ContactState,
}

impl ReedSwitch {
    /// Open the exported GPIO with the given BCM number.
    pub fn new(gpio: u32) -> Self {
        Self::from_path(PathBuf::from(format!("/sys/class/gpio/gpio{gpio}/value")))
    }

    /// Back the switch with an arbitrary value file (tests, alternate
    /// GPIO drivers). The pre-read state defaults to `Open`.
    pub fn from_path(value_path: PathBuf) -> Self {
        Self {
            value_path,
            last: ContactState::Open,
        }
    }
}

impl ContactPort for ReedSwitch {
    fn read_contact(&mut self) -> ContactState {
        match fs::read_to_string(&self.value_path) {
            Ok(raw) => {
                self.last = ContactState::from_level(raw.trim() != "0");
            }
            Err(e) => {
                debug!("contact input unreadable ({e}), holding {}", self.last);
            }
        }
        self.last
    }
}
