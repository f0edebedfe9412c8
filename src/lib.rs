//! ultralink library: bulk URL liveness verification
//!
//! This library checks very large URL lists for reachability. Each URL goes
//! through a ladder of increasingly expensive checks (HEAD, GET, a
//! certificate-relaxed retry, a browser-impersonating client and finally a
//! headless browser) and lands in exactly one of two append-only logs.
//!
//! # Example
//!
//! ```no_run
//! use ultralink::{Config, run_scan};
//! use tokio;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: std::path::PathBuf::from("urls.txt"),
//!     concurrency: 50,
//!     max_retries: 1,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!("Verified {} URLs: {} working, {} not working",
//!          report.total_urls, report.successful, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod input;
mod run;
pub mod sink;
pub mod verify;

// Re-export public API
pub use config::{Config, ConfigFile, LogFormat, LogLevel};
pub use error_handling::FailureCategory;
pub use run::{run_scan, ScanReport, Scheduler, SchedulerSummary};
pub use verify::{VerificationOutcome, Verifier};
