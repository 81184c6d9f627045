//! HTTP uplink to the collector.
//!
//! Blocking `ureq` client. The poll loop has nothing else to do while a
//! delivery is in flight, so blocking sends keep the whole loop free of
//! executors.
//!
//! Delivery is at-least-once: every attempt POSTs the full payload, an
//! HTTP 200 is the only terminal success, and any other status or a
//! transport error is retried after a fixed backoff until the budget runs
//! out. No idempotency key is attached; a retried-but-actually-delivered
//! send duplicating an event at the collector is an accepted trade-off.

use std::time::Duration;

use log::{debug, warn};

use crate::app::ports::{DeliveryOutcome, UplinkPort};
use crate::error::NetError;
use crate::retry::{self, Backoff};

/// Collector uplink bound to a resolved base URL.
pub struct HttpUplink {
    agent: ureq::Agent,
    base_url: String,
    policy: Backoff,
}

impl HttpUplink {
    /// `base_url` comes from provisioning; endpoint paths are joined onto
    /// it verbatim.
    pub fn new(base_url: impl Into<String>, timeout: Duration, policy: Backoff) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("sillguard/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.into(),
            policy,
        }
    }

    fn post_once(&self, url: &str, body: &str) -> Result<(), NetError> {
        let response = self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(body);
        match response {
            // 200 is the collector's only acknowledgement; other 2xx
            // codes are not part of the contract and are retried.
            Ok(resp) if resp.status() == 200 => Ok(()),
            Ok(resp) => Err(NetError::Status(resp.status())),
            Err(ureq::Error::Status(code, _)) => Err(NetError::Status(code)),
            Err(ureq::Error::Transport(t)) => Err(NetError::Transport(t.to_string())),
        }
    }
}

impl UplinkPort for HttpUplink {
    fn deliver(&mut self, endpoint: &str, payload: &serde_json::Value) -> DeliveryOutcome {
        let url = format!("{}{}", self.base_url, endpoint);
        let body = payload.to_string();

        let result = retry::run(self.policy, std::thread::sleep, |attempt| {
            debug!("POST {url} (attempt {attempt}/{})", self.policy.attempts);
            self.post_once(&url, &body).inspect_err(|e| {
                warn!("POST {url} attempt {attempt}/{} failed: {e}", self.policy.attempts);
            })
        });

        match result {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(_) => DeliveryOutcome::Failed,
        }
    }
}
