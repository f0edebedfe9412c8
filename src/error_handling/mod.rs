//! Error handling and outcome statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, configuration, the sink,
//!   transports and the headless renderer
//! - The failure taxonomy recorded for URLs that do not verify
//! - Classification of `reqwest` errors into transport errors
//! - Thread-safe outcome counters
//!
//! Failure categories are mutually exclusive:
//! - **connection**: the transport could not connect
//! - **ssl**: TLS failure that survived the relaxed-verification fallback
//! - **status**: a status outside the valid set
//! - **timeout**: no response within the allotted time, after retries
//! - **client**: any other client error, including a failed render heuristic
//! - **other**: malformed or unusable input

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::classify_reqwest_error;
pub use stats::{CounterSnapshot, FailureCounters};
pub use types::{
    ConfigError, FailureCategory, InitializationError, RenderError, SinkError, TransportError,
};
