//! Integration tests for run_scan
//!
//! These tests drive the whole pipeline against a mock server: input file,
//! timestamped output folder, both result logs and the returned report.

mod helpers;

use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;
use ultralink::initialization::init_crypto_provider;
use ultralink::{run_scan, Config, FailureCategory};

use helpers::{create_test_config, read_log, write_urls_to_file};

#[tokio::test]
async fn test_run_scan_writes_both_logs() {
    init_crypto_provider();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/ok"))
            .times(1)
            .respond_with(status_code(200)),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/moved"))
            .times(1)
            .respond_with(status_code(302).insert_header("Location", "/ok2")),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/ok2"))
            .times(1)
            .respond_with(status_code(200)),
    );
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/gone"))
            .times(1)
            .respond_with(status_code(404)),
    );

    let ok = server.url("/ok").to_string();
    let moved = server.url("/moved").to_string();
    let gone = server.url("/gone").to_string();
    let input = write_urls_to_file(&[
        ok.clone(),
        String::new(),
        format!("  {moved}  "),
        gone.clone(),
        "ftp://files.example/archive".to_string(),
    ]);
    let output = TempDir::new().expect("tempdir");

    let report = run_scan(create_test_config(
        input.path().to_path_buf(),
        output.path().to_path_buf(),
    ))
    .await
    .expect("scan");

    assert_eq!(report.total_urls, 4);
    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.failure_count(FailureCategory::Status), 1);
    assert_eq!(report.failure_count(FailureCategory::Other), 1);
    assert_eq!(report.skipped_duplicates, 0);

    assert!(report.output_dir.starts_with(output.path()));
    let folder = report
        .output_dir
        .file_name()
        .and_then(|n| n.to_str())
        .expect("folder name");
    assert!(folder.starts_with("output_"), "{folder}");

    let mut working = read_log(&report.output_dir.join("working.txt"));
    working.sort();
    let mut expected = vec![ok, moved];
    expected.sort();
    assert_eq!(working, expected);

    let mut not_working = read_log(&report.output_dir.join("notworking.txt"));
    not_working.sort();
    let mut expected = vec![gone, "ftp://files.example/archive".to_string()];
    expected.sort();
    assert_eq!(not_working, expected);
}

#[tokio::test]
async fn test_run_scan_deduplicates_when_enabled() {
    init_crypto_provider();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("HEAD", "/same"))
            .times(1)
            .respond_with(status_code(200)),
    );

    let url = server.url("/same").to_string();
    let input = write_urls_to_file(&[url.clone(), format!("{url}#frag"), url.clone()]);
    let output = TempDir::new().expect("tempdir");
    let config = Config {
        deduplicate: true,
        ..create_test_config(input.path().to_path_buf(), output.path().to_path_buf())
    };

    let report = run_scan(config).await.expect("scan");
    assert_eq!(report.total_urls, 1);
    assert_eq!(report.skipped_duplicates, 2);
    assert_eq!(read_log(&report.output_dir.join("working.txt")), vec![url]);
}

#[tokio::test]
async fn test_run_scan_small_batches_cover_every_line() {
    init_crypto_provider();
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method("HEAD"))
            .times(23)
            .respond_with(status_code(200)),
    );

    let urls: Vec<String> = (0..23)
        .map(|i| server.url(&format!("/page/{i}")).to_string())
        .collect();
    let input = write_urls_to_file(&urls);
    let output = TempDir::new().expect("tempdir");
    let config = Config {
        batch_size: 5,
        concurrency: 3,
        ..create_test_config(input.path().to_path_buf(), output.path().to_path_buf())
    };

    let report = run_scan(config).await.expect("scan");
    assert_eq!(report.successful, 23);
    assert_eq!(read_log(&report.output_dir.join("working.txt")).len(), 23);
    assert!(read_log(&report.output_dir.join("notworking.txt")).is_empty());
}

#[tokio::test]
async fn test_run_scan_missing_input_fails_before_output() {
    let output = TempDir::new().expect("tempdir");
    let config = create_test_config(
        output.path().join("does-not-exist.txt"),
        output.path().join("results"),
    );

    let err = run_scan(config).await.expect_err("missing input");
    assert!(format!("{err:#}").contains("does-not-exist.txt"));
    assert!(!output.path().join("results").exists());
}

#[tokio::test]
async fn test_run_scan_empty_input() {
    let input = write_urls_to_file(&[]);
    let output = TempDir::new().expect("tempdir");

    let report = run_scan(create_test_config(
        input.path().to_path_buf(),
        output.path().to_path_buf(),
    ))
    .await
    .expect("scan");

    assert_eq!(report.total_urls, 0);
    assert!(report.output_dir.join("working.txt").exists());
    assert!(report.output_dir.join("notworking.txt").exists());
}
