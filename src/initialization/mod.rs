//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP clients (shared pooled, one-off, browser impersonating)
//! - Logger
//! - Concurrency limiters
//! - TLS crypto provider
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_client, init_impersonation_client, init_one_off_client};
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. The scheduler uses
/// one to bound in-flight verifications; the fallback tiers share a second,
/// smaller one.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. This must be called before
/// any TLS connections are established.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
