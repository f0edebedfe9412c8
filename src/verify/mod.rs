//! Per-URL verification.
//!
//! A [`Verifier`] owns the ordered list of tier strategies and drives one URL
//! from normalization to a single terminal [`VerificationOutcome`]:
//!
//! 1. direct HEAD, with a GET fallback on 400/403 ([`DirectCheck`])
//! 2. certificate-relaxed retry after TLS failures ([`TlsRelaxedCheck`])
//! 3. browser impersonation after generic client errors ([`ImpersonationCheck`])
//! 4. headless render with a page heuristic ([`RenderCheck`])
//!
//! Escalation only moves forward. Success at any tier ends the run.

mod direct;
mod impersonate;
mod policy;
mod profile;
mod relaxed;
mod render;
mod strategy;
mod task;
mod transport;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use log::warn;

pub use direct::DirectCheck;
pub use impersonate::ImpersonationCheck;
pub use policy::VerifyPolicy;
pub use profile::{random_user_agent, ClientProfile, ALTERNATE_USER_AGENT, USER_AGENTS};
pub use relaxed::TlsRelaxedCheck;
pub use render::{page_looks_alive, ChromeRenderer, PageRenderer, RenderCheck, RenderedPage};
pub use strategy::TierStrategy;
pub use task::{Tier, TierResult, UrlTask, VerificationOutcome};
pub use transport::{HttpTransport, OneOffClientFactory, ReqwestTransport, TransportFactory};

use crate::app::normalize_url;
use crate::config::Config;
use crate::error_handling::{FailureCategory, InitializationError};
use crate::initialization::{init_client, init_impersonation_client, init_semaphore};

/// Runs URLs through the escalation ladder.
pub struct Verifier {
    tiers: Vec<Box<dyn TierStrategy>>,
}

impl Verifier {
    /// Assembles the four tiers from their collaborators.
    ///
    /// # Arguments
    ///
    /// * `policy` - Retry and escalation settings
    /// * `transport` - Shared pooled transport for the direct check
    /// * `factory` - Builds the private certificate-relaxed transport
    /// * `impersonation` - Browser-mimicking transport
    /// * `renderer` - Headless browser
    /// * `fallback_limit` - Maximum simultaneous impersonation/render sessions
    pub fn new(
        policy: VerifyPolicy,
        transport: Arc<dyn HttpTransport>,
        factory: Arc<dyn TransportFactory>,
        impersonation: Arc<dyn HttpTransport>,
        renderer: Arc<dyn PageRenderer>,
        fallback_limit: usize,
    ) -> Self {
        let policy = Arc::new(policy);
        let limiter = init_semaphore(fallback_limit);
        let tiers: Vec<Box<dyn TierStrategy>> = vec![
            Box::new(DirectCheck::new(transport, Arc::clone(&policy))),
            Box::new(TlsRelaxedCheck::new(factory, Arc::clone(&policy))),
            Box::new(ImpersonationCheck::new(
                impersonation,
                Arc::clone(&policy),
                Arc::clone(&limiter),
            )),
            Box::new(RenderCheck::new(renderer, policy, limiter)),
        ];
        Verifier { tiers }
    }

    /// Builds the production verifier: pooled `reqwest` client, one-off
    /// relaxed clients, the impersonating client and a Chrome renderer.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be
    /// built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let policy = VerifyPolicy::from(config);
        let transport = ReqwestTransport::new(init_client(config)?);
        let impersonation =
            ReqwestTransport::new(init_impersonation_client(policy.full_fetch_timeout())?);
        Ok(Verifier::new(
            policy,
            Arc::new(transport),
            Arc::new(OneOffClientFactory),
            Arc::new(impersonation),
            Arc::new(ChromeRenderer::default()),
            config.fallback_concurrency,
        ))
    }

    /// Verifies one raw input line.
    ///
    /// Input that does not normalize is an `other` failure and never reaches
    /// the network.
    pub async fn verify(&self, raw: &str) -> VerificationOutcome {
        let raw = raw.trim();
        let Some(url) = normalize_url(raw) else {
            warn!("{} - Failed: not a valid URL", raw);
            return VerificationOutcome::rejected(raw);
        };

        let mut task = UrlTask::new(raw, url);
        let mut index = 0;
        loop {
            let Some(strategy) = self.tiers.get(index) else {
                return VerificationOutcome::from_task(
                    &task,
                    task.tier,
                    Some(FailureCategory::Client),
                );
            };
            task.tier = strategy.tier();

            match strategy.attempt(&mut task).await {
                TierResult::Verified(tier) => {
                    return VerificationOutcome::from_task(&task, tier, None);
                }
                TierResult::Failed(tier, category) => {
                    return VerificationOutcome::from_task(&task, tier, Some(category));
                }
                TierResult::Escalate(next) if next.index() > index => {
                    index = next.index();
                }
                TierResult::Escalate(next) => {
                    warn!(
                        "{} - Failed: {} cannot escalate back to {}",
                        task.url, task.tier, next
                    );
                    return VerificationOutcome::from_task(
                        &task,
                        task.tier,
                        Some(FailureCategory::Client),
                    );
                }
            }
        }
    }
}
