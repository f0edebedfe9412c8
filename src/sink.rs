//! Durable result sink.
//!
//! Two append-only logs, one URL per line, plus the outcome counters. A single
//! async mutex covers both files and the counters, so a record is one
//! indivisible step: line written, flushed, counted.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::{NOT_WORKING_FILE_NAME, WORKING_FILE_NAME};
use crate::error_handling::{FailureCategory, FailureCounters, SinkError};
use crate::verify::VerificationOutcome;

struct LogFile {
    path: PathBuf,
    file: File,
}

impl LogFile {
    async fn open(path: PathBuf) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(LogFile { path, file })
    }

    async fn append_line(&mut self, url: &str) -> Result<(), SinkError> {
        let mut line = String::with_capacity(url.len() + 1);
        line.push_str(url);
        line.push('\n');
        let result = match self.file.write_all(line.as_bytes()).await {
            Ok(()) => self.file.flush().await,
            Err(e) => Err(e),
        };
        result.map_err(|source| SinkError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

struct Logs {
    working: LogFile,
    not_working: LogFile,
}

/// Concurrency-safe destination for verification outcomes.
pub struct ResultSink {
    logs: Mutex<Logs>,
    counters: FailureCounters,
    dir: PathBuf,
}

impl ResultSink {
    /// Opens (or creates) `working.txt` and `notworking.txt` in `dir`.
    ///
    /// Existing files are appended to, never truncated.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Open` if either file cannot be opened.
    pub async fn create(dir: &Path) -> Result<Self, SinkError> {
        let working = LogFile::open(dir.join(WORKING_FILE_NAME)).await?;
        let not_working = LogFile::open(dir.join(NOT_WORKING_FILE_NAME)).await?;
        debug!("Result logs opened in {}", dir.display());
        Ok(ResultSink {
            logs: Mutex::new(Logs {
                working,
                not_working,
            }),
            counters: FailureCounters::new(),
            dir: dir.to_path_buf(),
        })
    }

    /// Appends `url` to the working log and counts a success.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Write` if the append fails; the counters are left
    /// untouched in that case.
    pub async fn record_success(&self, url: &str) -> Result<(), SinkError> {
        let mut logs = self.logs.lock().await;
        logs.working.append_line(url).await?;
        self.counters.increment_success();
        Ok(())
    }

    /// Appends `url` to the not-working log and counts a failure of `category`.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Write` if the append fails; the counters are left
    /// untouched in that case.
    pub async fn record_failure(
        &self,
        url: &str,
        category: FailureCategory,
    ) -> Result<(), SinkError> {
        let mut logs = self.logs.lock().await;
        logs.not_working.append_line(url).await?;
        self.counters.increment_failure(category);
        Ok(())
    }

    /// Records a terminal outcome in the matching log.
    pub async fn record(&self, outcome: &VerificationOutcome) -> Result<(), SinkError> {
        match outcome.failure {
            None => self.record_success(&outcome.url).await,
            Some(category) => self.record_failure(&outcome.url, category).await,
        }
    }

    /// Live outcome counters.
    pub fn counters(&self) -> &FailureCounters {
        &self.counters
    }

    /// Folder holding both logs.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the working log.
    pub fn working_path(&self) -> PathBuf {
        self.dir.join(WORKING_FILE_NAME)
    }

    /// Path of the not-working log.
    pub fn not_working_path(&self) -> PathBuf {
        self.dir.join(NOT_WORKING_FILE_NAME)
    }
}
