//! HTTP client initialization.
//!
//! This module builds the `reqwest` clients used by the verification tiers:
//! the shared pooled client, the one-off client with certificate checks
//! disabled, and the cookie-keeping client used for browser impersonation.

use std::time::Duration;

use log::warn;
use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECTS};

/// Initializes the shared HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - Timeout from config (per-request timeouts from the profile override it)
/// - Redirect following enabled (up to `MAX_REDIRECTS` hops)
/// - Rustls TLS backend, with verification disabled only when
///   `disable_ssl_verification` is set
///
/// Headers are not set here; every request carries its own `ClientProfile`.
///
/// # Arguments
///
/// * `config` - Run configuration
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    if config.disable_ssl_verification {
        warn!("SSL verification is disabled globally. Use with caution.");
    }
    ClientBuilder::new()
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(config.disable_ssl_verification)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
}

/// Initializes a short-lived client for one escalation.
///
/// Connection pooling is disabled: the client is built, used for one URL, and
/// dropped.
///
/// # Arguments
///
/// * `timeout` - Request timeout
/// * `verify_tls` - Whether certificates are verified
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_one_off_client(
    timeout: Duration,
    verify_tls: bool,
) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(!verify_tls)
        .pool_max_idle_per_host(0)
        .build()
}

/// Initializes the browser-impersonating client.
///
/// Keeps a cookie jar across requests (challenge pages commonly set a
/// clearance cookie), prefers HTTP/2 through ALPN, and decodes the
/// compressed bodies a browser would accept.
///
/// # Arguments
///
/// * `timeout` - Request timeout
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_impersonation_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_defaults() {
        assert!(init_client(&Config::default()).is_ok());
    }

    #[test]
    fn test_init_client_without_verification() {
        let config = Config {
            disable_ssl_verification: true,
            ..Default::default()
        };
        assert!(init_client(&config).is_ok());
    }

    #[test]
    fn test_init_one_off_and_impersonation_clients() {
        assert!(init_one_off_client(Duration::from_secs(5), false).is_ok());
        assert!(init_one_off_client(Duration::from_secs(5), true).is_ok());
        assert!(init_impersonation_client(Duration::from_secs(5)).is_ok());
    }
}
