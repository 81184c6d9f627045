//! Error types for the SillGuard monitor.
//!
//! Each subsystem carries its own error enum and handles it close to where
//! it is detected: sensor, network, and persistence faults never unwind
//! past the poll-cycle boundary, and only provisioning failures are
//! surfaced to `main` for orderly termination.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// A transient or permanent probe failure. Never fatal: the monitor treats
/// a fault as "no new information" for that cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// No thermometer was discovered on the one-wire bus.
    NoProbe,
    /// The bus read failed or timed out mid-conversion.
    BusRead,
    /// The probe returned data that did not parse as a reading.
    Malformed,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProbe => write!(f, "no probe discovered"),
            Self::BusRead => write!(f, "bus read failed"),
            Self::Malformed => write!(f, "malformed reading"),
        }
    }
}

impl std::error::Error for SensorFault {}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

/// A single failed delivery attempt. Retryable up to the configured budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// The collector answered with a non-200 status.
    Status(u16),
    /// Connection, timeout, or other transport-level failure.
    Transport(String),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "collector returned status {code}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for NetError {}

// ---------------------------------------------------------------------------
// Persistence errors
// ---------------------------------------------------------------------------

/// Journal store failures. Reported to the caller, never retried internally;
/// the in-memory sequence counter continues regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The backing file could not be created or its header written.
    Create(String),
    /// A row could not be appended.
    Append(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(msg) => write!(f, "journal create failed: {msg}"),
            Self::Append(msg) => write!(f, "journal append failed: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

// ---------------------------------------------------------------------------
// Provisioning errors
// ---------------------------------------------------------------------------

/// Startup-time network provisioning failures. The monitor cannot run
/// without a delivery path, so these terminate the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    /// The credentials file held no usable profiles.
    NoProfiles,
    /// Every configured profile was tried and none yielded a delivery path.
    AllProfilesFailed,
    /// The credentials file could not be read.
    Credentials(String),
}

impl fmt::Display for ProvisioningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProfiles => write!(f, "no usable network profiles configured"),
            Self::AllProfilesFailed => write!(f, "all network profiles failed"),
            Self::Credentials(msg) => write!(f, "credentials file unreadable: {msg}"),
        }
    }
}

impl std::error::Error for ProvisioningError {}
