//! Progress logging utilities.

use log::info;

use crate::error_handling::FailureCounters;

/// Logs progress information about URL verification.
///
/// # Arguments
///
/// * `start_time` - The start time of the run
/// * `counters` - Outcome counters shared with the result sink
pub fn log_progress(start_time: std::time::Instant, counters: &FailureCounters) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let seen = counters.total_seen();
    let rate = if elapsed_secs > 0.0 {
        seen as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Verified {} URLs ({} working, {} not working) in {:.2} seconds (~{:.2} URLs/sec)",
        seen,
        counters.succeeded(),
        counters.total_failed(),
        elapsed_secs,
        rate
    );
}
