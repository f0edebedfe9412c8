//! Direct check with full-fetch fallback.
//!
//! HEAD against the shared pooled client. A 400/403 answer is followed by a
//! GET with a longer timeout (when enabled) inside the same attempt. Transport
//! errors retry on a fixed delay until the attempt budget runs out, then
//! either fail the URL or escalate:
//!
//! | condition on the last attempt | result                      |
//! |-------------------------------|-----------------------------|
//! | TLS error                     | escalate to the relaxed tier|
//! | connection error              | `connection` failure        |
//! | timeout                       | `timeout` failure           |
//! | other client error            | escalate to impersonation   |
//!
//! Statuses outside the valid set are terminal without a retry, except a 400
//! from the GET fallback, which restarts the attempt loop.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Method;

use super::policy::VerifyPolicy;
use super::profile::ClientProfile;
use super::strategy::TierStrategy;
use super::task::{Tier, TierResult, UrlTask};
use super::transport::HttpTransport;
use crate::config::{HTTP_STATUS_BAD_REQUEST, HTTP_STATUS_FORBIDDEN};
use crate::error_handling::{FailureCategory, TransportError};

/// Answer to one HEAD (+ optional GET) probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// A valid status, from HEAD (`Direct`) or GET (`FullFetch`)
    Verified { tier: Tier, status: u16 },
    /// A status outside the valid set
    Rejected { tier: Tier, status: u16 },
    /// The GET fallback timed out
    FullFetchTimeout,
}

/// Issues HEAD, then GET on 400/403 when the GET fallback is enabled.
///
/// Transport errors from either request propagate, except a GET timeout,
/// which is reported as [`Probe::FullFetchTimeout`].
pub(crate) async fn probe(
    transport: &dyn HttpTransport,
    url: &str,
    profile: &ClientProfile,
    policy: &VerifyPolicy,
) -> Result<Probe, TransportError> {
    let status = transport.request(Method::HEAD, url, profile).await?;
    if policy.is_valid(status) {
        return Ok(Probe::Verified {
            tier: Tier::Direct,
            status,
        });
    }

    if policy.use_get_fallback
        && (status == HTTP_STATUS_BAD_REQUEST || status == HTTP_STATUS_FORBIDDEN)
    {
        let get_profile = profile.with_timeout(policy.full_fetch_timeout());
        return match transport.request(Method::GET, url, &get_profile).await {
            Ok(status) if policy.is_valid(status) => Ok(Probe::Verified {
                tier: Tier::FullFetch,
                status,
            }),
            Ok(status) => Ok(Probe::Rejected {
                tier: Tier::FullFetch,
                status,
            }),
            Err(TransportError::Timeout(_)) => Ok(Probe::FullFetchTimeout),
            Err(e) => Err(e),
        };
    }

    Ok(Probe::Rejected {
        tier: Tier::Direct,
        status,
    })
}

/// Tier 1 and 1b.
pub struct DirectCheck {
    transport: Arc<dyn HttpTransport>,
    policy: Arc<VerifyPolicy>,
}

impl DirectCheck {
    /// Creates tiers 1 and 1b over the shared transport.
    pub fn new(transport: Arc<dyn HttpTransport>, policy: Arc<VerifyPolicy>) -> Self {
        DirectCheck { transport, policy }
    }

    /// Decides what one probe result means for the task.
    ///
    /// Returns `Ok(result)` for a terminal decision or escalation, and
    /// `Err(reason)` when the attempt should be retried.
    fn decide(
        &self,
        task: &mut UrlTask,
        probed: Result<Probe, TransportError>,
    ) -> Result<TierResult, &'static str> {
        let can_retry = self.policy.can_retry(task.attempt);
        match probed {
            Ok(Probe::Verified { tier, status }) => {
                task.last_status = Some(status);
                if tier == Tier::FullFetch {
                    info!("{} - {} OK (GET fallback)", task.url, status);
                } else {
                    info!("{} - {} OK", task.url, status);
                }
                Ok(TierResult::Verified(tier))
            }
            Ok(Probe::Rejected {
                tier: Tier::FullFetch,
                status,
            }) => {
                task.last_status = Some(status);
                if status == HTTP_STATUS_BAD_REQUEST && can_retry {
                    return Err("400 Error (GET)");
                }
                warn!("{} - {} Failed (GET fallback)", task.url, status);
                Ok(TierResult::Failed(Tier::FullFetch, FailureCategory::Status))
            }
            Ok(Probe::Rejected { tier, status }) => {
                task.last_status = Some(status);
                warn!("{} - {} Failed", task.url, status);
                Ok(TierResult::Failed(tier, FailureCategory::Status))
            }
            Ok(Probe::FullFetchTimeout) => {
                if can_retry {
                    return Err("Timeout Error (GET)");
                }
                warn!("{} - Failed: Timeout Error (GET)", task.url);
                Ok(TierResult::Failed(Tier::FullFetch, FailureCategory::Timeout))
            }
            Err(TransportError::Tls(message)) => {
                if can_retry {
                    return Err("SSL Error");
                }
                if self.policy.tls_fallback {
                    Ok(TierResult::Escalate(Tier::TlsRelaxed))
                } else {
                    warn!("{} - Failed: SSL Error ({})", task.url, message);
                    Ok(TierResult::Failed(Tier::Direct, FailureCategory::Ssl))
                }
            }
            Err(TransportError::Connect(message)) => {
                if can_retry {
                    return Err("Connection Error");
                }
                warn!("{} - Failed: Connection Error ({})", task.url, message);
                Ok(TierResult::Failed(Tier::Direct, FailureCategory::Connection))
            }
            Err(TransportError::Timeout(_)) => {
                if can_retry {
                    return Err("Timeout Error");
                }
                warn!("{} - Failed: Timeout Error", task.url);
                Ok(TierResult::Failed(Tier::Direct, FailureCategory::Timeout))
            }
            Err(TransportError::Client(_)) => {
                if can_retry {
                    return Err("Client Error");
                }
                Ok(TierResult::Escalate(Tier::Impersonation))
            }
        }
    }
}

#[async_trait]
impl TierStrategy for DirectCheck {
    fn tier(&self) -> Tier {
        Tier::Direct
    }

    async fn attempt(&self, task: &mut UrlTask) -> TierResult {
        loop {
            // A fresh profile per attempt rotates the user agent
            let profile = ClientProfile::navigation(self.policy.timeout);
            let probed = probe(self.transport.as_ref(), &task.url, &profile, &self.policy).await;
            match self.decide(task, probed) {
                Ok(result) => return result,
                Err(reason) => {
                    warn!(
                        "Retrying {} (Attempt {}/{}) - {}",
                        task.url,
                        task.attempt + 1,
                        self.policy.max_retries,
                        reason
                    );
                    tokio::time::sleep(self.policy.retry_delay).await;
                    task.attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::verify::fakes::ScriptedTransport;
    use std::time::Duration;

    fn policy(max_retries: u32, use_get_fallback: bool) -> Arc<VerifyPolicy> {
        let config = Config {
            max_retries,
            use_get_fallback,
            timeout_seconds: 2,
            retry_delay_ms: 0,
            ..Default::default()
        };
        Arc::new(VerifyPolicy::from(&config))
    }

    async fn run(
        script: Vec<Result<u16, TransportError>>,
        max_retries: u32,
        use_get_fallback: bool,
    ) -> (TierResult, UrlTask, Arc<ScriptedTransport>) {
        let transport = ScriptedTransport::new(script);
        let check = DirectCheck::new(transport.clone(), policy(max_retries, use_get_fallback));
        let mut task = UrlTask::new("example.com", "https://example.com/");
        let result = check.attempt(&mut task).await;
        (result, task, transport)
    }

    fn connect() -> Result<u16, TransportError> {
        Err(TransportError::Connect("refused".into()))
    }

    #[tokio::test]
    async fn test_valid_status_first_attempt() {
        let (result, task, transport) = run(vec![Ok(200)], 2, false).await;
        assert_eq!(result, TierResult::Verified(Tier::Direct));
        assert_eq!(task.attempt, 0);
        assert_eq!(task.last_status, Some(200));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.calls()[0].method, Method::HEAD);
    }

    #[tokio::test]
    async fn test_invalid_status_is_terminal_without_retry() {
        let (result, task, transport) = run(vec![Ok(500)], 3, true).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::Direct, FailureCategory::Status)
        );
        assert_eq!(task.attempt, 0);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_403_without_get_fallback_is_status_failure() {
        let (result, _, transport) = run(vec![Ok(403)], 2, false).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::Direct, FailureCategory::Status)
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_403_then_get_200_verifies_at_full_fetch() {
        let (result, task, transport) = run(vec![Ok(403), Ok(200)], 2, true).await;
        assert_eq!(result, TierResult::Verified(Tier::FullFetch));
        assert_eq!(task.attempt, 0);

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, Method::GET);
        assert_eq!(calls[1].timeout, Duration::from_secs(6));
        // Same attempt, same identity
        assert_eq!(calls[0].user_agent, calls[1].user_agent);
    }

    #[tokio::test]
    async fn test_get_400_restarts_loop_while_budget_remains() {
        let script = vec![Ok(400), Ok(400), Ok(403), Ok(200)];
        let (result, task, transport) = run(script, 2, true).await;
        assert_eq!(result, TierResult::Verified(Tier::FullFetch));
        assert_eq!(task.attempt, 1);
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_get_400_on_last_attempt_is_status_failure() {
        let (result, task, _) = run(vec![Ok(400), Ok(400)], 0, true).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::FullFetch, FailureCategory::Status)
        );
        assert_eq!(task.last_status, Some(400));
    }

    #[tokio::test]
    async fn test_get_403_is_not_retried() {
        let (result, task, transport) = run(vec![Ok(403), Ok(403)], 2, true).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::FullFetch, FailureCategory::Status)
        );
        assert_eq!(task.attempt, 0);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_get_timeout_exhausts_to_timeout_failure() {
        let timeout = Err(TransportError::Timeout("slow".into()));
        let script = vec![Ok(403), timeout.clone(), Ok(403), timeout];
        let (result, task, _) = run(script, 1, true).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::FullFetch, FailureCategory::Timeout)
        );
        assert_eq!(task.attempt, 1);
    }

    #[tokio::test]
    async fn test_connection_errors_exhaust_retries() {
        let (result, task, transport) = run(vec![connect()], 2, false).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::Direct, FailureCategory::Connection)
        );
        assert_eq!(task.attempts_made(), 3);
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_connection_error_then_success() {
        let (result, task, _) = run(vec![connect(), Ok(301)], 2, false).await;
        assert_eq!(result, TierResult::Verified(Tier::Direct));
        assert_eq!(task.attempt, 1);
    }

    #[tokio::test]
    async fn test_timeout_exhausts_to_timeout_failure() {
        let (result, _, transport) =
            run(vec![Err(TransportError::Timeout("t".into()))], 1, false).await;
        assert_eq!(
            result,
            TierResult::Failed(Tier::Direct, FailureCategory::Timeout)
        );
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_tls_exhaustion_escalates_to_relaxed_tier() {
        let (result, _, transport) =
            run(vec![Err(TransportError::Tls("bad cert".into()))], 2, false).await;
        assert_eq!(result, TierResult::Escalate(Tier::TlsRelaxed));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_tls_exhaustion_without_fallback_is_ssl_failure() {
        let transport = ScriptedTransport::always(Err(TransportError::Tls("bad cert".into())));
        let config = Config {
            max_retries: 0,
            retry_delay_ms: 0,
            tls_fallback: false,
            ..Default::default()
        };
        let check = DirectCheck::new(transport, Arc::new(VerifyPolicy::from(&config)));
        let mut task = UrlTask::new("example.com", "https://example.com/");
        assert_eq!(
            check.attempt(&mut task).await,
            TierResult::Failed(Tier::Direct, FailureCategory::Ssl)
        );
    }

    #[tokio::test]
    async fn test_client_error_exhaustion_escalates_to_impersonation() {
        let (result, _, transport) =
            run(vec![Err(TransportError::Client("weird".into()))], 2, false).await;
        assert_eq!(result, TierResult::Escalate(Tier::Impersonation));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_get_connection_error_uses_outer_retry() {
        let script = vec![Ok(403), connect(), Ok(200)];
        let (result, task, _) = run(script, 1, true).await;
        assert_eq!(result, TierResult::Verified(Tier::Direct));
        assert_eq!(task.attempt, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_wait_the_fixed_delay() {
        let transport = ScriptedTransport::always(connect());
        let config = Config {
            max_retries: 2,
            retry_delay_ms: 2000,
            ..Default::default()
        };
        let check = DirectCheck::new(transport, Arc::new(VerifyPolicy::from(&config)));
        let mut task = UrlTask::new("example.com", "https://example.com/");

        let start = tokio::time::Instant::now();
        check.attempt(&mut task).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "waited {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "waited {elapsed:?}");
    }
}
