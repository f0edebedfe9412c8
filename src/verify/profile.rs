//! Per-attempt request profiles.
//!
//! A `ClientProfile` bundles the timeout, header set and TLS verification mode
//! for one request. Profiles are immutable; escalating tiers build new ones.

use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, DNT, REFERER,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

/// Desktop browser user agents rotated across attempts.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:91.0) Gecko/20100101 Firefox/91.0",
];

/// User agent of the alternate profile tried after a 403 from the
/// impersonating client.
pub const ALTERNATE_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Firefox/91.0";

const NAVIGATION_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const NAVIGATION_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
const DEFAULT_REFERER: &str = "https://www.google.com/";
const ALTERNATE_REFERER: &str = "https://www.bing.com/";

/// Picks one of [`USER_AGENTS`] at random.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Immutable request configuration for one attempt.
#[derive(Debug, Clone)]
pub struct ClientProfile {
    timeout: Duration,
    headers: HeaderMap,
    verify_tls: bool,
}

impl ClientProfile {
    /// Browser navigation profile with a randomly rotated user agent.
    pub fn navigation(timeout: Duration) -> Self {
        Self::with_identity(timeout, random_user_agent(), DEFAULT_REFERER)
    }

    /// Alternate navigation profile (fixed Firefox user agent, Bing referer).
    pub fn alternate(timeout: Duration) -> Self {
        Self::with_identity(timeout, ALTERNATE_USER_AGENT, ALTERNATE_REFERER)
    }

    fn with_identity(timeout: Duration, user_agent: &'static str, referer: &'static str) -> Self {
        // Accept-Encoding is left to the client so it can decode what it advertises
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
        headers.insert(ACCEPT, HeaderValue::from_static(NAVIGATION_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(NAVIGATION_ACCEPT_LANGUAGE),
        );
        headers.insert(REFERER, HeaderValue::from_static(referer));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("none"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("navigate"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("document"),
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        ClientProfile {
            timeout,
            headers,
            verify_tls: true,
        }
    }

    /// Same profile with a different timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        ClientProfile {
            timeout,
            ..self.clone()
        }
    }

    /// Same profile with certificate verification disabled.
    pub fn without_tls_verification(self) -> Self {
        ClientProfile {
            verify_tls: false,
            ..self
        }
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether certificates are verified.
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// The user agent this profile sends.
    pub fn user_agent(&self) -> &str {
        self.headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_profile_headers() {
        let profile = ClientProfile::navigation(Duration::from_secs(5));
        assert!(USER_AGENTS.contains(&profile.user_agent()));
        assert_eq!(
            profile.headers().get(REFERER).and_then(|v| v.to_str().ok()),
            Some("https://www.google.com/")
        );
        assert_eq!(
            profile
                .headers()
                .get("sec-fetch-mode")
                .and_then(|v| v.to_str().ok()),
            Some("navigate")
        );
        assert!(profile.verify_tls());
        assert_eq!(profile.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_alternate_profile_identity() {
        let profile = ClientProfile::alternate(Duration::from_secs(5));
        assert_eq!(profile.user_agent(), ALTERNATE_USER_AGENT);
        assert_eq!(
            profile.headers().get(REFERER).and_then(|v| v.to_str().ok()),
            Some("https://www.bing.com/")
        );
    }

    #[test]
    fn test_derived_profiles_do_not_mutate_original() {
        let base = ClientProfile::navigation(Duration::from_secs(5));
        let longer = base.with_timeout(Duration::from_secs(9));
        let relaxed = base.clone().without_tls_verification();

        assert_eq!(base.timeout(), Duration::from_secs(5));
        assert!(base.verify_tls());
        assert_eq!(longer.timeout(), Duration::from_secs(9));
        assert_eq!(longer.user_agent(), base.user_agent());
        assert!(!relaxed.verify_tls());
    }

    #[test]
    fn test_rotation_covers_every_agent() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(random_user_agent());
        }
        assert_eq!(seen.len(), USER_AGENTS.len());
    }
}
