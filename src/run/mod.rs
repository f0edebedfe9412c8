//! Scan orchestration.
//!
//! [`run_scan`] wires the input reader, the verifier and the result sink
//! together and drives them through the [`Scheduler`].

mod finalize;
mod scheduler;
mod task;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;
use tokio_util::sync::CancellationToken;

use crate::app::{create_run_dir, log_progress};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::error_handling::FailureCategory;
use crate::input::BatchReader;
use crate::sink::ResultSink;
use crate::verify::Verifier;

use finalize::{finalize_scan, ScanLoopResult};
pub use scheduler::{Scheduler, SchedulerSummary};

/// Results of a verification run.
///
/// Contains summary statistics and the folder holding the result logs.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// URLs with a recorded outcome
    pub total_urls: usize,
    /// URLs written to the working log
    pub successful: usize,
    /// URLs written to the not-working log
    pub failed: usize,
    /// Failed URLs per category
    pub failures: HashMap<FailureCategory, usize>,
    /// Lines skipped by de-duplication (in neither log)
    pub skipped_duplicates: usize,
    /// Run folder containing `working.txt` and `notworking.txt`
    pub output_dir: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

impl ScanReport {
    /// Failed URLs of one category (zero when none).
    pub fn failure_count(&self, category: FailureCategory) -> usize {
        self.failures.get(&category).copied().unwrap_or(0)
    }
}

/// Runs a verification scan with the provided configuration.
///
/// This is the main entry point for the library. It reads URLs in batches,
/// verifies them concurrently and appends each one to `working.txt` or
/// `notworking.txt` in a fresh timestamped folder under `config.output_dir`.
///
/// # Arguments
///
/// * `config` - Input path, output base, concurrency and verification settings
///
/// # Returns
///
/// Returns a `ScanReport` with the final counts.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration is invalid
/// - The input cannot be opened or read
/// - The output folder or result logs cannot be created
/// - An HTTP client cannot be initialized
/// - A result could not be written (the run stops after the current batch)
///
/// # Example
///
/// ```no_run
/// use ultralink::{Config, run_scan};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     input: PathBuf::from("urls.txt"),
///     ..Default::default()
/// };
/// let report = run_scan(config).await?;
/// println!("Verified {} URLs", report.total_urls);
/// # Ok(())
/// # }
/// ```
pub async fn run_scan(config: Config) -> Result<ScanReport> {
    config.validate().context("Invalid configuration")?;

    let mut source = BatchReader::open(&config.input, config.batch_size).await?;

    let output_dir = create_run_dir(&config.output_dir)?;
    info!("Writing results to {}", output_dir.display());

    let sink = Arc::new(
        ResultSink::create(&output_dir)
            .await
            .context("Failed to open result logs")?,
    );
    let verifier = Arc::new(
        Verifier::from_config(&config).context("Failed to initialize HTTP clients")?,
    );

    let start_time = Instant::now();
    let cancel = CancellationToken::new();
    let logging_task = spawn_progress_logger(start_time, Arc::clone(&sink), cancel.child_token());

    let mut scheduler = Scheduler::new(
        verifier,
        Arc::clone(&sink),
        config.concurrency,
        config.deduplicate,
        cancel.clone(),
    );
    let scheduled = scheduler.run(&mut source).await;

    finalize_scan(
        &sink,
        output_dir,
        ScanLoopResult {
            cancel,
            logging_task: Some(logging_task),
            start_time,
        },
        scheduled,
    )
    .await
}

fn spawn_progress_logger(
    start_time: Instant,
    sink: Arc<ResultSink>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // The first tick fires immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, sink.counters());
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}
