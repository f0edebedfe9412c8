//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, retry delays, limits)
//! - The library `Config` struct and logging option types
//! - YAML configuration file loading

mod constants;
mod file;
mod types;

// Re-export all constants
pub use constants::*;
pub use file::ConfigFile;
pub use types::{Config, LogFormat, LogLevel};
