// Shared test helpers for input files, configs and result logs.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use ultralink::{Config, LogFormat, LogLevel};

/// Writes one URL per line to a temporary file.
#[allow(dead_code)] // Used by other test files
pub fn write_urls_to_file(urls: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for url in urls {
        writeln!(file, "{}", url).expect("Failed to write URL");
    }
    file.flush().expect("Failed to flush file");
    file
}

/// Config with every delay removed and the browser tier off, so tests never
/// launch Chrome or sleep.
#[allow(dead_code)]
pub fn create_test_config(input: PathBuf, output_dir: PathBuf) -> Config {
    Config {
        input,
        output_dir,
        timeout_seconds: 2,
        max_retries: 1,
        retry_delay_ms: 0,
        fallback_delay_ms: 0,
        render_settle_ms: 0,
        render_fallback: false,
        log_level: LogLevel::Error, // Reduce noise in tests
        log_format: LogFormat::Plain,
        ..Default::default()
    }
}

/// Reads a result log into its lines; a missing file reads as empty.
#[allow(dead_code)]
pub fn read_log(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
