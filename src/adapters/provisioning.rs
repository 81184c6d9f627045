//! Network provisioning: ordered profiles, first success wins.
//!
//! The credentials file holds one profile per line:
//!
//! ```text
//! HomeNet,hunter2-but-longer,http://192.168.0.58:1880
//! PhoneHotspot,fallback-pass,http://10.8.0.4:1880
//! ```
//!
//! Wi-Fi association itself belongs to the host OS (wpa_supplicant is
//! configured with the same SSIDs at deploy time); what the monitor needs
//! from provisioning is a *delivery path*. [`Provisioner::connect`] walks
//! the profiles in order and resolves to the first base URL whose collector
//! answers HTTP at all: any status counts, only a transport failure moves
//! on to the next profile. Without a delivery path the monitor must not
//! start, so an all-profiles failure is fatal to the run.

use std::path::Path;
use std::time::Duration;

use log::{info, warn};

use crate::error::ProvisioningError;

/// One candidate network/collector pairing, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub ssid: String,
    pub password: String,
    pub base_url: String,
}

impl NetworkProfile {
    /// Parse a `ssid,password,base_url` line. The password may be empty
    /// (open network); the base URL must be absolute http(s).
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(3, ',');
        let ssid = fields.next()?.trim();
        let password = fields.next()?.trim();
        let base_url = fields.next()?.trim();
        if ssid.is_empty() {
            return None;
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return None;
        }
        Some(Self {
            ssid: ssid.to_string(),
            password: password.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Read profiles from the credentials file, skipping blank, commented, and
/// malformed lines with a warning.
pub fn load_profiles(path: &Path) -> Result<Vec<NetworkProfile>, ProvisioningError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ProvisioningError::Credentials(e.to_string()))?;

    let mut profiles = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match NetworkProfile::parse(line) {
            Some(profile) => profiles.push(profile),
            None => warn!("{}:{}: malformed profile line, skipped", path.display(), number + 1),
        }
    }

    if profiles.is_empty() {
        return Err(ProvisioningError::NoProfiles);
    }
    Ok(profiles)
}

// ───────────────────────────────────────────────────────────────
// Association seam
// ───────────────────────────────────────────────────────────────

/// Confirms that a profile currently provides a delivery path. Split out
/// so the first-success-wins walk is testable without a network.
pub trait AssociatePort {
    fn associate(&mut self, profile: &NetworkProfile) -> Result<(), ProvisioningError>;
}

/// Probes the profile's collector with a plain GET. Any HTTP answer,
/// including an error status, proves the path is up; only a transport
/// failure rejects the profile.
pub struct HttpReachability {
    agent: ureq::Agent,
}

impl HttpReachability {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl AssociatePort for HttpReachability {
    fn associate(&mut self, profile: &NetworkProfile) -> Result<(), ProvisioningError> {
        match self.agent.get(&profile.base_url).call() {
            Ok(_) | Err(ureq::Error::Status(..)) => Ok(()),
            Err(ureq::Error::Transport(t)) => {
                warn!("'{}' unreachable: {t}", profile.ssid);
                Err(ProvisioningError::AllProfilesFailed)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Provisioner
// ───────────────────────────────────────────────────────────────

/// Walks the ordered profile list and resolves a single base URL.
pub struct Provisioner<A: AssociatePort> {
    profiles: Vec<NetworkProfile>,
    port: A,
}

impl<A: AssociatePort> Provisioner<A> {
    pub fn new(profiles: Vec<NetworkProfile>, port: A) -> Self {
        Self { profiles, port }
    }

    /// First-success-wins: returns the base URL of the first profile that
    /// associates. The monitor only ever sees this single resolved URL.
    pub fn connect(&mut self) -> Result<String, ProvisioningError> {
        if self.profiles.is_empty() {
            return Err(ProvisioningError::NoProfiles);
        }
        for profile in &self.profiles {
            info!("provisioning: trying '{}'", profile.ssid);
            match self.port.associate(profile) {
                Ok(()) => {
                    info!("provisioning: '{}' up, collector {}", profile.ssid, profile.base_url);
                    return Ok(profile.base_url.clone());
                }
                Err(e) => warn!("provisioning: '{}' failed: {e}", profile.ssid),
            }
        }
        Err(ProvisioningError::AllProfilesFailed)
    }
}
