//! Headless-browser fallback.
//!
//! The last tier. A fresh browser with a throwaway profile loads the page,
//! waits for it to settle and a content heuristic decides. The browser is torn
//! down on every path: closed politely when it answers, killed when it does
//! not, and never waited on past a fixed deadline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use tokio::sync::Semaphore;

use super::policy::VerifyPolicy;
use super::profile::random_user_agent;
use super::strategy::TierStrategy;
use super::task::{Tier, TierResult, UrlTask};
use crate::config::{RENDER_SESSION_TIMEOUT, RENDER_TEARDOWN_TIMEOUT};
use crate::error_handling::{FailureCategory, RenderError};

/// Markers whose presence in the rendered document counts as alive.
const CONTENT_MARKERS: &[&str] = &["200", "301", "302"];

/// Title fragments of sites that serve a working app shell to browsers only.
const TITLE_MARKERS: &[&str] = &["X", "Twitter"];

/// What the browser saw after settling.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    /// Serialized document
    pub content: String,
    /// Document title, if any
    pub title: Option<String>,
}

/// Loads a page in a real browser.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url`, waits `settle`, returns the page.
    ///
    /// # Errors
    ///
    /// Returns a `RenderError` if the browser cannot start, navigation fails
    /// or the session outlives its deadline.
    async fn render(
        &self,
        url: &str,
        user_agent: &str,
        settle: Duration,
    ) -> Result<RenderedPage, RenderError>;
}

/// Decides whether a rendered page belongs to a live site.
///
/// True when the document mentions one of the success statuses, or when it
/// has a `<title>` element whose text matches a known app-shell title.
pub fn page_looks_alive(page: &RenderedPage) -> bool {
    if CONTENT_MARKERS.iter().any(|m| page.content.contains(m)) {
        return true;
    }
    if !page.content.contains("<title>") {
        return false;
    }
    page.title
        .as_deref()
        .is_some_and(|title| TITLE_MARKERS.iter().any(|m| title.contains(m)))
}

/// `chromiumoxide` renderer launching one isolated browser per call.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    session_timeout: Duration,
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        ChromeRenderer {
            session_timeout: RENDER_SESSION_TIMEOUT,
        }
    }
}

impl ChromeRenderer {
    /// Creates a renderer whose sessions are cut off after `session_timeout`.
    pub fn new(session_timeout: Duration) -> Self {
        ChromeRenderer { session_timeout }
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(
        &self,
        url: &str,
        user_agent: &str,
        settle: Duration,
    ) -> Result<RenderedPage, RenderError> {
        let profile_dir = tempfile::tempdir().map_err(|e| RenderError::Launch(e.to_string()))?;

        let config = BrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(profile_dir.path())
            .request_timeout(self.session_timeout)
            .arg(format!("--user-agent={user_agent}"))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(RenderError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move { drive_handler(&mut handler).await });

        let session = async {
            let page = browser
                .new_page(url)
                .await
                .map_err(|e| RenderError::Session(e.to_string()))?;
            tokio::time::sleep(settle).await;
            let content = page
                .content()
                .await
                .map_err(|e| RenderError::Session(e.to_string()))?;
            let title = page
                .get_title()
                .await
                .map_err(|e| RenderError::Session(e.to_string()))?;
            Ok::<_, RenderError>(RenderedPage { content, title })
        };

        let result = match tokio::time::timeout(self.session_timeout, session).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout),
        };

        tear_down(&mut browser, RENDER_TEARDOWN_TIMEOUT).await;
        handler_task.abort();

        result
    }
}

/// Pumps CDP events until the connection drops. A single protocol error is
/// logged and skipped.
async fn drive_handler<S, T, E>(events: &mut S)
where
    S: Stream<Item = Result<T, E>> + Unpin,
    E: std::fmt::Display,
{
    while let Some(event) = events.next().await {
        if let Err(e) = event {
            debug!("Browser handler error: {}", e);
        }
    }
}

/// Process control needed to end a browser session.
#[async_trait]
trait BrowserProcess: Send {
    async fn close_gracefully(&mut self) -> Result<(), String>;
    async fn wait_for_exit(&mut self) -> Result<(), String>;
    async fn force_kill(&mut self) -> Result<(), String>;
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn close_gracefully(&mut self) -> Result<(), String> {
        self.close().await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn wait_for_exit(&mut self) -> Result<(), String> {
        self.wait().await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn force_kill(&mut self) -> Result<(), String> {
        match self.kill().await {
            Some(result) => result.map_err(|e| e.to_string()),
            None => Ok(()),
        }
    }
}

/// Closes the browser and waits for it to exit within `limit`; kills it if
/// the close fails or the deadline passes.
async fn tear_down<B: BrowserProcess>(browser: &mut B, limit: Duration) {
    let graceful = async {
        browser.close_gracefully().await?;
        browser.wait_for_exit().await
    };
    match tokio::time::timeout(limit, graceful).await {
        Ok(Ok(())) => return,
        Ok(Err(e)) => debug!("Browser close failed, killing it: {}", e),
        Err(_) => warn!("Browser did not exit within {:?}, killing it", limit),
    }
    if let Err(e) = browser.force_kill().await {
        warn!("Failed to kill browser: {}", e);
    }
}

/// Tier 4.
pub struct RenderCheck {
    renderer: Arc<dyn PageRenderer>,
    policy: Arc<VerifyPolicy>,
    limiter: Arc<Semaphore>,
}

impl RenderCheck {
    /// Creates the tier over `renderer`, sharing the fallback limiter with
    /// the impersonation tier.
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        policy: Arc<VerifyPolicy>,
        limiter: Arc<Semaphore>,
    ) -> Self {
        RenderCheck {
            renderer,
            policy,
            limiter,
        }
    }
}

#[async_trait]
impl TierStrategy for RenderCheck {
    fn tier(&self) -> Tier {
        Tier::Render
    }

    async fn attempt(&self, task: &mut UrlTask) -> TierResult {
        if !self.policy.render_fallback {
            warn!("{} - Failed: all HTTP fallbacks exhausted", task.url);
            return TierResult::Failed(Tier::Render, FailureCategory::Client);
        }

        warn!("Attempting {} with browser render fallback", task.url);
        let Ok(_permit) = self.limiter.acquire().await else {
            return TierResult::Failed(Tier::Render, FailureCategory::Client);
        };

        let user_agent = random_user_agent();
        match self
            .renderer
            .render(&task.url, user_agent, self.policy.render_settle)
            .await
        {
            Ok(page) if page_looks_alive(&page) => {
                info!("{} - OK (Render fallback)", task.url);
                TierResult::Verified(Tier::Render)
            }
            Ok(_) => {
                warn!("{} - Failed (Render fallback)", task.url);
                TierResult::Failed(Tier::Render, FailureCategory::Client)
            }
            Err(e) => {
                warn!("{} - Failed: Render Fallback Error ({})", task.url, e);
                TierResult::Failed(Tier::Render, FailureCategory::Client)
            }
        }
    }
}
