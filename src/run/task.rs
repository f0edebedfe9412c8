//! Per-URL task processing.
//!
//! One spawned task per input line: verify, then record the outcome. A panic
//! inside verification is caught here and recorded as a `client` failure for
//! the same line.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::warn;
use tokio::sync::OwnedSemaphorePermit;

use crate::error_handling::SinkError;
use crate::sink::ResultSink;
use crate::verify::{VerificationOutcome, Verifier};

/// Everything a spawned URL task owns.
pub(crate) struct UrlTaskParams {
    pub raw: String,
    pub verifier: Arc<Verifier>,
    pub sink: Arc<ResultSink>,
    /// Held until the outcome is recorded
    pub permit: OwnedSemaphorePermit,
}

/// Verifies one URL and records the outcome.
///
/// # Errors
///
/// Returns the sink error if the outcome could not be written. The caller
/// treats this as fatal for the run.
pub(crate) async fn process_url_task(params: UrlTaskParams) -> Result<(), SinkError> {
    let UrlTaskParams {
        raw,
        verifier,
        sink,
        permit: _permit,
    } = params;

    let outcome = match AssertUnwindSafe(verifier.verify(&raw)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("Verification of {} panicked; recording as client failure", raw);
            VerificationOutcome::aborted(&raw)
        }
    };

    sink.record(&outcome).await
}
