//! Browser-impersonation fallback.
//!
//! Reached when generic client errors exhaust the direct check. A GET through
//! a client that looks like a desktop browser (navigation headers, cookie
//! jar, compressed bodies). A 403 gets one more try under an alternate
//! identity, and that try is terminal: a bad status is `status`, an error is
//! `client`. Any other miss on the first request hands the URL to the renderer.
//!
//! Sessions run under the shared fallback limiter so a burst of escalations
//! cannot take over the main concurrency budget.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Method;
use tokio::sync::Semaphore;

use super::policy::VerifyPolicy;
use super::profile::ClientProfile;
use super::strategy::TierStrategy;
use super::task::{Tier, TierResult, UrlTask};
use super::transport::HttpTransport;
use crate::config::HTTP_STATUS_FORBIDDEN;
use crate::error_handling::FailureCategory;

/// Tier 3.
pub struct ImpersonationCheck {
    transport: Arc<dyn HttpTransport>,
    policy: Arc<VerifyPolicy>,
    limiter: Arc<Semaphore>,
}

impl ImpersonationCheck {
    /// Creates the tier over a browser-mimicking transport and the shared
    /// fallback limiter.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        policy: Arc<VerifyPolicy>,
        limiter: Arc<Semaphore>,
    ) -> Self {
        ImpersonationCheck {
            transport,
            policy,
            limiter,
        }
    }

    async fn fetch(&self, task: &mut UrlTask, profile: &ClientProfile) -> Option<u16> {
        match self.transport.request(Method::GET, &task.url, profile).await {
            Ok(status) => {
                task.last_status = Some(status);
                Some(status)
            }
            Err(e) => {
                warn!("{} - Failed: Impersonation Fallback Error ({})", task.url, e);
                None
            }
        }
    }
}

#[async_trait]
impl TierStrategy for ImpersonationCheck {
    fn tier(&self) -> Tier {
        Tier::Impersonation
    }

    async fn attempt(&self, task: &mut UrlTask) -> TierResult {
        warn!("Attempting {} with impersonation fallback", task.url);
        tokio::time::sleep(self.policy.fallback_delay).await;

        let Ok(_permit) = self.limiter.acquire().await else {
            return TierResult::Escalate(Tier::Render);
        };

        let timeout = self.policy.full_fetch_timeout();
        match self.fetch(task, &ClientProfile::navigation(timeout)).await {
            Some(status) if self.policy.is_valid(status) => {
                info!("{} - {} OK (Impersonation fallback)", task.url, status);
                return TierResult::Verified(Tier::Impersonation);
            }
            Some(HTTP_STATUS_FORBIDDEN) => {
                warn!("Retrying {} with alternate impersonation headers", task.url);
            }
            Some(status) => {
                warn!("{} - {} Failed (Impersonation fallback)", task.url, status);
                return TierResult::Escalate(Tier::Render);
            }
            None => return TierResult::Escalate(Tier::Render),
        }

        match self.fetch(task, &ClientProfile::alternate(timeout)).await {
            Some(status) if self.policy.is_valid(status) => {
                info!(
                    "{} - {} OK (Impersonation alternate fallback)",
                    task.url, status
                );
                TierResult::Verified(Tier::Impersonation)
            }
            Some(status) => {
                warn!(
                    "{} - {} Failed (Impersonation alternate fallback)",
                    task.url, status
                );
                TierResult::Failed(Tier::Impersonation, FailureCategory::Status)
            }
            None => TierResult::Failed(Tier::Impersonation, FailureCategory::Client),
        }
    }
}
