//! Configuration constants.
//!
//! This module defines the constants used throughout the verifier, including
//! default timeouts, retry delays and input limits.

use std::time::Duration;

// constants (used as defaults)
/// Maximum concurrent verifications (semaphore limit)
pub const DEFAULT_CONCURRENCY: usize = 100;
/// Number of input lines pulled per batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Per-attempt timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Retries after the first direct check (attempts = max_retries + 1)
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Status codes treated as "working" when no list is configured
pub const DEFAULT_VALID_STATUS_CODES: &[u16] = &[200, 301, 302];

/// Progress log interval in seconds
pub const LOGGING_INTERVAL: u64 = 5;

// Retry strategy
/// Fixed delay between retries of the direct check.
///
/// The backoff is intentionally flat: every retry waits the same amount.
pub const RETRY_DELAY_MS: u64 = 2000;
/// Extra time granted to the full-fetch (GET) fallback on top of the base timeout
pub const FULL_FETCH_TIMEOUT_INCREMENT: Duration = Duration::from_secs(4);
/// Maximum redirect hops followed by every HTTP client
pub const MAX_REDIRECTS: usize = 10;

// Fallback tiers
/// Pause before handing a URL to the browser-impersonating client
pub const FALLBACK_DELAY_MS: u64 = 3000;
/// Time the headless browser is given to settle after navigation
pub const RENDER_SETTLE_MS: u64 = 3000;
/// Maximum simultaneous impersonation/render sessions
pub const DEFAULT_FALLBACK_CONCURRENCY: usize = 4;
/// Upper bound on a single headless-browser session (launch + navigate + settle)
pub const RENDER_SESSION_TIMEOUT: Duration = Duration::from_secs(60);
/// Time allowed for a browser to close and exit before it is killed
pub const RENDER_TEARDOWN_TIMEOUT: Duration = Duration::from_secs(10);

// HTTP status codes (for clarity and consistency)
/// Status that sends a HEAD on to a full GET
pub const HTTP_STATUS_BAD_REQUEST: u16 = 400;
/// Status that triggers the GET fallback and the alternate identity
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;

// URL validation
/// Maximum URL length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

// Output artifacts
/// File name of the log of verified URLs
pub const WORKING_FILE_NAME: &str = "working.txt";
/// File name of the log of URLs that could not be verified
pub const NOT_WORKING_FILE_NAME: &str = "notworking.txt";
/// Prefix of the per-run folder created under the output directory
pub const RUN_DIR_PREFIX: &str = "output_";
