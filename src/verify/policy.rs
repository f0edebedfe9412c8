//! Retry and escalation settings shared by every tier.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::{Config, FULL_FETCH_TIMEOUT_INCREMENT};

/// Read-only settings derived from [`Config`] once per run.
#[derive(Debug, Clone)]
pub struct VerifyPolicy {
    /// Per-request timeout of the direct check
    pub timeout: Duration,
    /// Retries of the direct check after the first attempt
    pub max_retries: u32,
    /// Statuses that count as working
    pub valid_status_codes: HashSet<u16>,
    /// Issue a GET when HEAD answers 400 or 403
    pub use_get_fallback: bool,
    /// Enable the certificate-relaxed tier
    pub tls_fallback: bool,
    /// Enable the headless-browser tier
    pub render_fallback: bool,
    /// Fixed pause between direct-check retries
    pub retry_delay: Duration,
    /// Pause before the impersonating client is used
    pub fallback_delay: Duration,
    /// Time a rendered page is given to settle
    pub render_settle: Duration,
}

impl VerifyPolicy {
    /// Whether `status` counts as working.
    pub fn is_valid(&self, status: u16) -> bool {
        self.valid_status_codes.contains(&status)
    }

    /// Timeout of the GET fallback: base timeout plus a fixed increment.
    pub fn full_fetch_timeout(&self) -> Duration {
        self.timeout + FULL_FETCH_TIMEOUT_INCREMENT
    }

    /// True while the direct check may issue another attempt after `attempt`.
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl From<&Config> for VerifyPolicy {
    fn from(config: &Config) -> Self {
        VerifyPolicy {
            timeout: config.timeout(),
            max_retries: config.max_retries,
            valid_status_codes: config.valid_status_codes.iter().copied().collect(),
            use_get_fallback: config.use_get_fallback,
            tls_fallback: config.tls_fallback,
            render_fallback: config.render_fallback,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            fallback_delay: Duration::from_millis(config.fallback_delay_ms),
            render_settle: Duration::from_millis(config.render_settle_ms),
        }
    }
}
