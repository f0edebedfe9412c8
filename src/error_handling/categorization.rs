//! Network error classification.
//!
//! Maps `reqwest::Error` values onto the [`TransportError`] variants the
//! verification tiers branch on.

use std::error::Error as StdError;

use super::types::TransportError;

/// Message fragments that identify a TLS failure when no typed error is
/// available in the source chain.
const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// Classifies a `reqwest::Error`.
///
/// TLS failures are detected first, by walking the source chain for a
/// `rustls::Error` or a message mentioning certificates/handshakes. This has
/// to come before `is_connect()`, since reqwest reports a failed handshake
/// as a connect error.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to classify
///
/// # Returns
///
/// The matching `TransportError`, carrying the full error chain as text.
pub fn classify_reqwest_error(error: &reqwest::Error) -> TransportError {
    let message = error_chain_message(error);

    if is_tls_error(error) {
        TransportError::Tls(message)
    } else if error.is_timeout() {
        TransportError::Timeout(message)
    } else if error.is_connect() {
        TransportError::Connect(message)
    } else {
        TransportError::Client(message)
    }
}

fn is_tls_error(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = error.source();
    while let Some(err) = source {
        if err.downcast_ref::<rustls::Error>().is_some() {
            return true;
        }
        if looks_like_tls(&err.to_string()) {
            return true;
        }
        source = err.source();
    }
    false
}

/// Returns true if an error message names a TLS or certificate problem.
pub(crate) fn looks_like_tls(message: &str) -> bool {
    let lower = message.to_lowercase();
    TLS_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Joins an error and its sources into one line.
fn error_chain_message(error: &reqwest::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(err) = source {
        let text = err.to_string();
        if !parts.iter().any(|p| p == &text) {
            parts.push(text);
        }
        source = err.source();
    }
    parts.join(": ")
}
