//! Main application modules.
//!
//! This module provides URL normalization, progress logging, shutdown
//! handling, output folder creation and the end-of-run summary.

pub mod logging;
pub mod output_dir;
pub mod shutdown;
pub mod statistics;
pub mod url;

// Re-export public API
pub use logging::log_progress;
pub use output_dir::create_run_dir;
pub use shutdown::shutdown_gracefully;
pub use statistics::{failure_statistics_lines, print_summary};
pub use url::normalize_url;
