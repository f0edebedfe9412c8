//! Scan finalization.
//!
//! Stops the progress logger, logs the final progress line and turns the
//! sink's counters into a [`ScanReport`].

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, shutdown_gracefully};
use crate::sink::ResultSink;

use super::scheduler::SchedulerSummary;
use super::ScanReport;

/// Background state that must be torn down whatever the scan result.
pub(crate) struct ScanLoopResult {
    pub cancel: CancellationToken,
    pub logging_task: Option<JoinHandle<()>>,
    pub start_time: Instant,
}

/// Finalize a scan run and produce the final report.
///
/// The progress logger is always stopped, even when the scheduler failed.
///
/// # Errors
///
/// Returns the scheduler's error after shutdown.
pub(crate) async fn finalize_scan(
    sink: &ResultSink,
    output_dir: PathBuf,
    loop_result: ScanLoopResult,
    scheduled: Result<SchedulerSummary>,
) -> Result<ScanReport> {
    let ScanLoopResult {
        cancel,
        logging_task,
        start_time,
    } = loop_result;

    shutdown_gracefully(cancel, logging_task).await;
    log_progress(start_time, sink.counters());

    let summary = scheduled?;
    let snapshot = sink.counters().snapshot();
    let failed = snapshot.total_failed();

    Ok(ScanReport {
        total_urls: snapshot.total_seen,
        successful: snapshot.succeeded,
        failed,
        failures: snapshot.failures,
        skipped_duplicates: summary.skipped_duplicates,
        output_dir,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
