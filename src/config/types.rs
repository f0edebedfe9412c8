//! Configuration types.
//!
//! This module defines the enums and the library `Config` struct consumed by
//! the verification engine.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_FALLBACK_CONCURRENCY, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_SECS, DEFAULT_VALID_STATUS_CODES, FALLBACK_DELAY_MS, RENDER_SETTLE_MS,
    RETRY_DELAY_MS,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// This is the configuration consumed by [`crate::run_scan`]. It can be built
/// programmatically, loaded from YAML via [`crate::config::ConfigFile`], or
/// assembled by the binary from command-line flags.
///
/// # Examples
///
/// ```no_run
/// use ultralink::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: PathBuf::from("urls.txt"),
///     concurrency: 50,
///     max_retries: 1,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read URLs from (`-` reads stdin)
    pub input: PathBuf,

    /// Base directory; each run writes into a timestamped folder below it
    pub output_dir: PathBuf,

    /// Number of input lines pulled per batch
    pub batch_size: usize,

    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,

    /// Retries of the direct check after the first attempt
    pub max_retries: u32,

    /// Maximum simultaneous verifications
    pub concurrency: usize,

    /// Status codes that count as a working URL
    pub valid_status_codes: Vec<u16>,

    /// Issue a GET when HEAD answers 400 or 403
    pub use_get_fallback: bool,

    /// Disable certificate verification on the primary client
    pub disable_ssl_verification: bool,

    /// Retry once with certificate verification off after TLS failures exhaust retries
    pub tls_fallback: bool,

    /// Launch a headless browser as the last resort
    pub render_fallback: bool,

    /// Fixed delay between retries, in milliseconds
    pub retry_delay_ms: u64,

    /// Delay before the browser-impersonating client is used, in milliseconds
    pub fallback_delay_ms: u64,

    /// Time a rendered page is given to settle, in milliseconds
    pub render_settle_ms: u64,

    /// Maximum simultaneous impersonation/render sessions
    pub fallback_concurrency: usize,

    /// Skip URLs whose normalized form was already seen in this run
    pub deduplicate: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("urls.txt"),
            output_dir: PathBuf::from("results"),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            concurrency: DEFAULT_CONCURRENCY,
            valid_status_codes: DEFAULT_VALID_STATUS_CODES.to_vec(),
            use_get_fallback: false,
            disable_ssl_verification: false,
            tls_fallback: true,
            render_fallback: true,
            retry_delay_ms: RETRY_DELAY_MS,
            fallback_delay_ms: FALLBACK_DELAY_MS,
            render_settle_ms: RENDER_SETTLE_MS,
            fallback_concurrency: DEFAULT_FALLBACK_CONCURRENCY,
            deduplicate: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be at least 1".into(),
            ));
        }
        if self.valid_status_codes.is_empty() {
            return Err(ConfigError::Invalid(
                "valid_status_codes must list at least one status".into(),
            ));
        }
        if self.fallback_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "fallback_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Per-attempt timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
