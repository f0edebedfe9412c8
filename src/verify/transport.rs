//! HTTP transports used by the verification tiers.
//!
//! Tiers only see the [`HttpTransport`] capability: send a request with a
//! profile, get a status back or a classified error. The production
//! implementation wraps `reqwest`; tests substitute scripted fakes.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::profile::ClientProfile;
use crate::error_handling::{classify_reqwest_error, TransportError};
use crate::initialization::init_one_off_client;

/// Sends one request and reports the final status after redirects.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns a classified `TransportError` when no response was received.
    async fn request(
        &self,
        method: Method,
        url: &str,
        profile: &ClientProfile,
    ) -> Result<u16, TransportError>;
}

/// Builds a private transport for a single escalation.
pub trait TransportFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns a `TransportError` if the underlying client cannot be built.
    fn build(&self, profile: &ClientProfile) -> Result<Arc<dyn HttpTransport>, TransportError>;
}

/// `reqwest`-backed transport.
///
/// Redirects are followed by the client; the returned status is that of the
/// last hop. Response bodies are never read.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an initialized client.
    pub fn new(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        profile: &ClientProfile,
    ) -> Result<u16, TransportError> {
        let response = self
            .client
            .request(method, url)
            .headers(profile.headers().clone())
            .timeout(profile.timeout())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;
        Ok(response.status().as_u16())
    }
}

/// Factory producing unpooled `reqwest` clients that honour the profile's
/// TLS verification mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneOffClientFactory;

impl TransportFactory for OneOffClientFactory {
    fn build(&self, profile: &ClientProfile) -> Result<Arc<dyn HttpTransport>, TransportError> {
        let client = init_one_off_client(profile.timeout(), profile.verify_tls())
            .map_err(|e| classify_reqwest_error(&e))?;
        Ok(Arc::new(ReqwestTransport::new(client)))
    }
}
