//! Batch-at-a-time scheduler.
//!
//! Pulls one batch from the source, spawns one task per line under the
//! concurrency semaphore, and waits for the whole batch before pulling the
//! next. A permit is taken before each spawn, so at most `limit` URLs are
//! ever in flight and the spawn loop itself is what waits.
//!
//! Cancellation is checked between batches only; tasks already spawned
//! always run to completion.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, error, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::task::{process_url_task, UrlTaskParams};
use crate::app::normalize_url;
use crate::error_handling::SinkError;
use crate::initialization::init_semaphore;
use crate::input::BatchReader;
use crate::sink::ResultSink;
use crate::verify::{VerificationOutcome, Verifier};

/// What the scheduler did besides recording outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    /// Batches pulled from the source
    pub batches: usize,
    /// URLs spawned for verification
    pub dispatched: usize,
    /// Lines skipped because their normalized URL was already seen
    pub skipped_duplicates: usize,
}

/// Drives a [`BatchReader`] through the [`Verifier`] into the [`ResultSink`].
pub struct Scheduler {
    verifier: Arc<Verifier>,
    sink: Arc<ResultSink>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    seen: Option<HashSet<String>>,
}

impl Scheduler {
    /// # Arguments
    ///
    /// * `limit` - Maximum simultaneous verifications
    /// * `deduplicate` - Skip lines whose normalized URL was already dispatched
    /// * `cancel` - Stops the run before the next batch; also fired by the
    ///   scheduler itself on a sink error
    pub fn new(
        verifier: Arc<Verifier>,
        sink: Arc<ResultSink>,
        limit: usize,
        deduplicate: bool,
        cancel: CancellationToken,
    ) -> Self {
        Scheduler {
            verifier,
            sink,
            semaphore: init_semaphore(limit),
            cancel,
            seen: deduplicate.then(HashSet::new),
        }
    }

    /// Runs until the source is exhausted or the run is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or an outcome could not
    /// be written. The batch in flight finishes first in both cases.
    pub async fn run(&mut self, source: &mut BatchReader) -> Result<SchedulerSummary> {
        let mut summary = SchedulerSummary::default();

        while !self.cancel.is_cancelled() {
            let Some(batch) = source
                .next_batch()
                .await
                .context("Failed to read URL batch from input")?
            else {
                break;
            };
            summary.batches += 1;
            debug!("Batch {}: {} URLs", summary.batches, batch.len());

            if let Some(e) = self.run_batch(batch, &mut summary).await {
                self.cancel.cancel();
                return Err(e).context("Failed to record verification outcome");
            }
        }

        if self.cancel.is_cancelled() {
            warn!("Run cancelled after {} batches", summary.batches);
        }
        Ok(summary)
    }

    /// Spawns one task per line and waits for all of them.
    ///
    /// Returns the first sink error observed, if any.
    async fn run_batch(
        &mut self,
        batch: Vec<String>,
        summary: &mut SchedulerSummary,
    ) -> Option<SinkError> {
        let mut tasks = JoinSet::new();
        let mut fatal = None;

        for raw in batch {
            if self.is_duplicate(&raw) {
                debug!("Skipping duplicate URL {}", raw);
                summary.skipped_duplicates += 1;
                continue;
            }

            let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
                warn!("Semaphore closed, recording {} as a client failure", raw);
                if let Err(e) = self.sink.record(&VerificationOutcome::aborted(&raw)).await {
                    error!("{}", e);
                    fatal.get_or_insert(e);
                }
                continue;
            };

            summary.dispatched += 1;
            tasks.spawn(process_url_task(UrlTaskParams {
                raw,
                verifier: Arc::clone(&self.verifier),
                sink: Arc::clone(&self.sink),
                permit,
            }));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("{}", e);
                    self.cancel.cancel();
                    fatal.get_or_insert(e);
                }
                Err(join_error) => {
                    warn!("URL task did not complete: {:?}", join_error);
                }
            }
        }
        fatal
    }

    fn is_duplicate(&mut self, raw: &str) -> bool {
        let Some(seen) = self.seen.as_mut() else {
            return false;
        };
        match normalize_url(raw) {
            Some(url) => !seen.insert(url),
            None => false,
        }
    }
}
