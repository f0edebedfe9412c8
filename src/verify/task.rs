//! Verification task state and outcomes.

use std::fmt;

use crate::error_handling::FailureCategory;

/// One verification strategy in the fixed escalation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// HEAD against the shared pooled client
    Direct,
    /// GET fallback after a 400/403 from the direct check
    FullFetch,
    /// One-off client with certificate verification disabled
    TlsRelaxed,
    /// Browser-impersonating client
    Impersonation,
    /// Headless browser with a page heuristic
    Render,
}

impl Tier {
    /// Position of the strategy that handles this tier.
    ///
    /// The full-fetch fallback shares the direct check's attempt budget, so
    /// both map to the same strategy.
    pub fn index(self) -> usize {
        match self {
            Tier::Direct | Tier::FullFetch => 0,
            Tier::TlsRelaxed => 1,
            Tier::Impersonation => 2,
            Tier::Render => 3,
        }
    }

    /// Short name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Direct => "direct",
            Tier::FullFetch => "full-fetch",
            Tier::TlsRelaxed => "tls-relaxed",
            Tier::Impersonation => "impersonation",
            Tier::Render => "render",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL in flight.
#[derive(Debug, Clone)]
pub struct UrlTask {
    /// Trimmed input line
    pub raw: String,
    /// Canonical URL the requests go to
    pub url: String,
    /// Zero-based attempt counter of the direct tier
    pub attempt: u32,
    /// Tier currently executing
    pub tier: Tier,
    /// Last HTTP status observed, if any
    pub last_status: Option<u16>,
}

impl UrlTask {
    /// Starts a task for `raw`, already normalized to `url`.
    pub fn new(raw: impl Into<String>, url: impl Into<String>) -> Self {
        UrlTask {
            raw: raw.into(),
            url: url.into(),
            attempt: 0,
            tier: Tier::Direct,
            last_status: None,
        }
    }

    /// Direct-tier attempts issued so far, counting the current one.
    pub fn attempts_made(&self) -> u32 {
        self.attempt + 1
    }
}

/// What one tier decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierResult {
    /// Terminal success at the given tier
    Verified(Tier),
    /// Terminal failure at the given tier
    Failed(Tier, FailureCategory),
    /// Hand the task to a later tier
    Escalate(Tier),
}

/// Terminal result of one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// URL as written to the result log (the trimmed input line)
    pub url: String,
    /// `None` on success
    pub failure: Option<FailureCategory>,
    /// Tier that produced the outcome; `None` for rejected input
    pub tier: Option<Tier>,
    /// Direct-tier attempts issued
    pub attempts: u32,
    /// Last HTTP status observed
    pub status: Option<u16>,
}

impl VerificationOutcome {
    /// Whether the URL was verified.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Outcome for input that never reached the network.
    pub fn rejected(raw: &str) -> Self {
        VerificationOutcome {
            url: raw.to_string(),
            failure: Some(FailureCategory::Other),
            tier: None,
            attempts: 0,
            status: None,
        }
    }

    /// Outcome for a verification that panicked before reaching a verdict.
    pub fn aborted(raw: &str) -> Self {
        VerificationOutcome {
            url: raw.trim().to_string(),
            failure: Some(FailureCategory::Client),
            tier: None,
            attempts: 0,
            status: None,
        }
    }

    pub(crate) fn from_task(task: &UrlTask, tier: Tier, failure: Option<FailureCategory>) -> Self {
        VerificationOutcome {
            url: task.raw.clone(),
            failure,
            tier: Some(tier),
            attempts: task.attempts_made(),
            status: task.last_status,
        }
    }
}
