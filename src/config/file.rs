//! YAML configuration file loading.
//!
//! The file mirrors the keys operators already use for large runs
//! (`chunk_size`, `timeout`, `status_codes`, ...). Every key is optional;
//! missing keys keep the value already present in the target `Config`.

use std::path::Path;

use serde::Deserialize;

use super::types::Config;
use crate::error_handling::ConfigError;

/// Raw contents of a YAML configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// URLs per batch
    pub chunk_size: Option<usize>,
    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
    /// Retries after the first direct attempt
    pub max_retries: Option<u32>,
    /// Maximum URLs in flight
    pub concurrency: Option<usize>,
    /// Statuses that count as working
    pub status_codes: Option<Vec<u16>>,
    /// Retry a 400/403 HEAD as a GET
    pub use_get_fallback: Option<bool>,
    /// Skip certificate checks on the shared client
    pub disable_ssl_verification: Option<bool>,
    /// Enable the TLS-relaxed tier
    pub tls_fallback: Option<bool>,
    /// Enable the headless-browser tier
    pub render_fallback: Option<bool>,
    /// Delay between direct attempts
    pub retry_delay_ms: Option<u64>,
    /// Delay before the impersonation tier
    pub fallback_delay_ms: Option<u64>,
    /// Time a rendered page is given to settle
    pub render_settle_ms: Option<u64>,
    /// Maximum simultaneous fallback sessions
    pub fallback_concurrency: Option<usize>,
    /// Skip repeated URLs
    pub deduplicate: Option<bool>,
}

impl ConfigFile {
    /// Reads and parses a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if it is not valid YAML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parses YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlays the values present in the file onto `config`.
    pub fn apply_to(self, config: &mut Config) {
        if let Some(v) = self.chunk_size {
            config.batch_size = v;
        }
        if let Some(v) = self.timeout {
            config.timeout_seconds = v;
        }
        if let Some(v) = self.max_retries {
            config.max_retries = v;
        }
        if let Some(v) = self.concurrency {
            config.concurrency = v;
        }
        if let Some(v) = self.status_codes {
            config.valid_status_codes = v;
        }
        if let Some(v) = self.use_get_fallback {
            config.use_get_fallback = v;
        }
        if let Some(v) = self.disable_ssl_verification {
            config.disable_ssl_verification = v;
        }
        if let Some(v) = self.tls_fallback {
            config.tls_fallback = v;
        }
        if let Some(v) = self.render_fallback {
            config.render_fallback = v;
        }
        if let Some(v) = self.retry_delay_ms {
            config.retry_delay_ms = v;
        }
        if let Some(v) = self.fallback_delay_ms {
            config.fallback_delay_ms = v;
        }
        if let Some(v) = self.render_settle_ms {
            config.render_settle_ms = v;
        }
        if let Some(v) = self.fallback_concurrency {
            config.fallback_concurrency = v;
        }
        if let Some(v) = self.deduplicate {
            config.deduplicate = v;
        }
    }
}
