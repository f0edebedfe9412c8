//! Certificate-relaxed fallback.
//!
//! Reached only after TLS errors exhaust the direct check. One probe through a
//! private client with verification disabled; every outcome is terminal.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use super::direct::{probe, Probe};
use super::policy::VerifyPolicy;
use super::profile::ClientProfile;
use super::strategy::TierStrategy;
use super::task::{Tier, TierResult, UrlTask};
use super::transport::TransportFactory;
use crate::error_handling::FailureCategory;

/// Tier 2.
pub struct TlsRelaxedCheck {
    factory: Arc<dyn TransportFactory>,
    policy: Arc<VerifyPolicy>,
}

impl TlsRelaxedCheck {
    /// Creates tier 2; each attempt builds its own client from `factory`.
    pub fn new(factory: Arc<dyn TransportFactory>, policy: Arc<VerifyPolicy>) -> Self {
        TlsRelaxedCheck { factory, policy }
    }
}

#[async_trait]
impl TierStrategy for TlsRelaxedCheck {
    fn tier(&self) -> Tier {
        Tier::TlsRelaxed
    }

    async fn attempt(&self, task: &mut UrlTask) -> TierResult {
        warn!("Attempting {} with SSL verification disabled", task.url);
        let profile = ClientProfile::navigation(self.policy.timeout).without_tls_verification();

        let transport = match self.factory.build(&profile) {
            Ok(transport) => transport,
            Err(e) => {
                warn!("{} - Failed: SSL Fallback Error ({})", task.url, e);
                return TierResult::Failed(Tier::TlsRelaxed, FailureCategory::Ssl);
            }
        };

        match probe(transport.as_ref(), &task.url, &profile, &self.policy).await {
            Ok(Probe::Verified { status, .. }) => {
                task.last_status = Some(status);
                info!("{} - {} OK (SSL fallback)", task.url, status);
                TierResult::Verified(Tier::TlsRelaxed)
            }
            Ok(Probe::Rejected { status, .. }) => {
                task.last_status = Some(status);
                warn!("{} - {} Failed (SSL fallback)", task.url, status);
                TierResult::Failed(Tier::TlsRelaxed, FailureCategory::Status)
            }
            Ok(Probe::FullFetchTimeout) => {
                warn!("{} - Failed: SSL Fallback Error (GET timed out)", task.url);
                TierResult::Failed(Tier::TlsRelaxed, FailureCategory::Ssl)
            }
            Err(e) => {
                warn!("{} - Failed: SSL Fallback Error ({})", task.url, e);
                TierResult::Failed(Tier::TlsRelaxed, FailureCategory::Ssl)
            }
        }
    }
}
