//! The capability every tier implements.

use async_trait::async_trait;

use super::task::{Tier, TierResult, UrlTask};

/// One verification strategy in the escalation order.
///
/// Strategies never return errors: every transport or browser failure is
/// turned into a retry, an escalation, or a terminal classification inside
/// `attempt`.
#[async_trait]
pub trait TierStrategy: Send + Sync {
    /// Tier this strategy implements.
    fn tier(&self) -> Tier;

    /// Runs the tier for `task`, updating its attempt counter and last status.
    async fn attempt(&self, task: &mut UrlTask) -> TierResult;
}
