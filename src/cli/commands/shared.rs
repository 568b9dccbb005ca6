//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::services::table_decoder::DecodeStats;
use crate::cli::args::DecodeArgs;
use crate::config::DecoderConfig;
use crate::Result;
use anyhow::{Context, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Totals reported by a command run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Input files decoded to completion
    pub files_decoded: usize,
    /// Input files that failed to read
    pub files_failed: usize,
    /// Aggregated counters across every decoded file
    pub stats: DecodeStats,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Whether any input failed
    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
    }
}

/// Set up structured logging on stderr
///
/// A subscriber installed earlier in the process is kept.
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recruit_decoder={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match result {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing logging subscriber: {}", e),
    }
}

/// Load configuration (file, then CLI overrides)
pub fn load_configuration(args: &DecodeArgs) -> Result<DecoderConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            DecoderConfig::from_file(path)?
        }
        None => DecoderConfig::default(),
    };

    apply_cli_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut DecoderConfig, args: &DecodeArgs) {
    if let Some(fallback) = args.date_fallback {
        config.date_fallback = fallback.into();
    }
    if let Some(header_rows) = args.header_rows {
        config.header_rows_override = Some(header_rows);
    }
    if let Some(workers) = args.workers {
        config.max_concurrent_files = workers;
    }
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Expand input arguments into existing files
///
/// Plain paths must exist; glob patterns must match at least one file.
/// Duplicates are dropped and the first-seen order is kept.
pub fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for input in inputs {
        if is_pattern(input) {
            let mut matched = 0;
            for entry in glob::glob(input).with_context(|| format!("Invalid glob pattern '{}'", input))? {
                let path = entry.with_context(|| format!("Failed to read a match of '{}'", input))?;
                if path.is_file() {
                    matched += 1;
                    if !files.contains(&path) {
                        files.push(path);
                    }
                }
            }
            if matched == 0 {
                bail!("No files match '{}'", input);
            }
        } else {
            let path = PathBuf::from(input);
            if !path.is_file() {
                bail!("Input file not found: {}", path.display());
            }
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }

    debug!("Expanded {} input argument(s) into {} file(s)", inputs.len(), files.len());
    Ok(files)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}
