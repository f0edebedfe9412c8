//! End-of-run summary.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::FailureCategory;
use crate::run::ScanReport;

/// Logs the run summary: totals, then one line per failure category.
pub fn print_summary(report: &ScanReport) {
    info!(
        "Summary: Total URLs: {}, Successful: {}, Failed: {}",
        report.total_urls, report.successful, report.failed
    );
    print_failure_statistics(report);
    if report.skipped_duplicates > 0 {
        info!(
            "Skipped {} duplicate URL{}",
            report.skipped_duplicates,
            if report.skipped_duplicates == 1 { "" } else { "s" }
        );
    }
    info!(
        "✅ Verified {} URL{} in {:.1}s - results in {}",
        report.total_urls,
        if report.total_urls == 1 { "" } else { "s" },
        report.elapsed_seconds,
        report.output_dir.display()
    );
}

/// Logs per-category failure counts, including zero counts so operators can
/// diff summaries between runs.
pub fn print_failure_statistics(report: &ScanReport) {
    for line in failure_statistics_lines(report) {
        info!("   {}", line);
    }
}

/// One `label: count` line per failure category, in a fixed order.
pub fn failure_statistics_lines(report: &ScanReport) -> Vec<String> {
    FailureCategory::iter()
        .map(|category| format!("{}: {}", category.label(), report.failure_count(category)))
        .collect()
}
