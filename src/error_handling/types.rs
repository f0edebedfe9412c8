//! Error type definitions.
//!
//! This module defines the failure taxonomy recorded for URLs and the error
//! types used by initialization, configuration, transports and the sink.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected schema.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from the result sink. Any of these aborts the run.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Opening or creating a log file failed.
    #[error("Failed to open result log {path}: {source}")]
    Open {
        /// Log file that could not be opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Appending to a log file failed (disk full, permission revoked, ...).
    #[error("Failed to append to result log {path}: {source}")]
    Write {
        /// Log file being appended to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A network error, classified the way the retry policy needs it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// TLS handshake or certificate failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The transport could not connect (refused, reset, DNS failure).
    #[error("Connection error: {0}")]
    Connect(String),

    /// No response within the allotted time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Any other client/library error.
    #[error("Client error: {0}")]
    Client(String),
}

/// Errors from a headless-browser session.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The browser could not be configured or launched.
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// Navigation or page inspection failed.
    #[error("Browser session failed: {0}")]
    Session(String),

    /// The session exceeded its time budget.
    #[error("Browser session timed out")]
    Timeout,
}

/// Category assigned to a URL that did not verify.
///
/// Categories are mutually exclusive; exactly one is recorded per failed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureCategory {
    /// The transport could not connect.
    Connection,
    /// TLS failure that survived the relaxed-verification fallback.
    Ssl,
    /// The server answered with a status outside the valid set.
    Status,
    /// No response within the allotted time, after retries.
    Timeout,
    /// Client-level error, including a failed headless-render heuristic.
    Client,
    /// Malformed or unusable input URL.
    Other,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureCategory {
    /// Short machine name used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Connection => "connection",
            FailureCategory::Ssl => "ssl",
            FailureCategory::Status => "status",
            FailureCategory::Timeout => "timeout",
            FailureCategory::Client => "client",
            FailureCategory::Other => "other",
        }
    }

    /// Human-readable label for the end-of-run summary.
    pub fn label(&self) -> &'static str {
        match self {
            FailureCategory::Connection => "Connection failures",
            FailureCategory::Ssl => "SSL failures",
            FailureCategory::Status => "Status failures",
            FailureCategory::Timeout => "Timeout failures",
            FailureCategory::Client => "Client failures",
            FailureCategory::Other => "Other failures",
        }
    }
}
