//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ultralink` library that handles:
//! - Command-line argument parsing
//! - Optional YAML configuration file
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use ultralink::app::{failure_statistics_lines, print_summary};
use ultralink::initialization::{init_crypto_provider, init_logger_with};
use ultralink::{run_scan, Config, ConfigFile, LogFormat, LogLevel};

/// Command-line options.
///
/// Values given here override the configuration file, which overrides the
/// built-in defaults.
///
/// # Examples
///
/// ```bash
/// # Verify a list with the defaults
/// ultralink --input urls.txt
///
/// # Read from stdin, 500 concurrent checks, one retry
/// cat urls.txt | ultralink --input - --concurrency 500 --max-retries 1
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ultralink",
    about = "Verifies that the URLs in a large list are reachable."
)]
struct Opt {
    /// File with one URL per line (`-` reads stdin)
    #[arg(long, short, value_parser, default_value = "urls.txt")]
    input: PathBuf,

    /// Base directory for timestamped result folders
    #[arg(long, short, value_parser, default_value = "results")]
    output: PathBuf,

    /// YAML configuration file; ignored when missing
    #[arg(long, short, value_parser, default_value = "config.yaml")]
    config: PathBuf,

    /// Shorthand for `--log-level debug`
    #[arg(long)]
    debug: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,

    /// Maximum simultaneous verifications
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-attempt timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Retries of the direct check after the first attempt
    #[arg(long)]
    max_retries: Option<u32>,
}

impl Opt {
    fn level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            self.log_level.clone().into()
        }
    }

    /// Defaults, then the config file (if present), then flags.
    fn into_config(self) -> Result<Config> {
        let mut config = Config {
            input: self.input,
            output_dir: self.output,
            log_level: self.log_level,
            log_format: self.log_format,
            ..Default::default()
        };

        if self.config.exists() {
            ConfigFile::load(&self.config)
                .with_context(|| format!("Failed to load {}", self.config.display()))?
                .apply_to(&mut config);
            info!("Loaded configuration from {}", self.config.display());
        }

        if let Some(v) = self.concurrency {
            config.concurrency = v;
        }
        if let Some(v) = self.timeout {
            config.timeout_seconds = v;
        }
        if let Some(v) = self.max_retries {
            config.max_retries = v;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.level(), opt.log_format.clone()).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let config = match opt.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ultralink error: {:#}", e);
            process::exit(1);
        }
    };

    match run_scan(config).await {
        Ok(report) => {
            print_summary(&report);
            println!(
                "✅ Verified {} URL{} ({} working, {} not working) in {:.1}s",
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.successful,
                report.failed,
                report.elapsed_seconds
            );
            for line in failure_statistics_lines(&report) {
                println!("   {}", line);
            }
            println!("Results saved in {}", report.output_dir.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("ultralink error: {:#}", e);
            process::exit(1);
        }
    }
}
