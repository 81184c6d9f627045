//! Wall-clock adapter.
//!
//! Journal rows carry local calendar date/time; the host keeps the clock
//! NTP-synced. Tests use a fixed clock instead.

use chrono::{Local, NaiveDateTime};

use crate::app::ports::ClockPort;

/// System wall clock in the local timezone.
pub struct WallClock;

impl ClockPort for WallClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
