//! Configuration management and validation.
//!
//! Provides the decoder configuration shared by every table session:
//! delimited-text dialect, termination policy, timestamp fallback policy,
//! and CLI concurrency limits.

use crate::constants::{BLANK_ROW_SENTINEL, DEFAULT_DELIMITER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// What a timestamp coder substitutes when the cell cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFallback {
    /// Substitute the session's decoding time
    #[default]
    Now,
    /// Leave the field absent
    Absent,
}

/// Global configuration for table decoding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Field delimiter byte of the delimited-text source
    pub delimiter: u8,

    /// Trim leading whitespace from every cell
    pub trim_leading_space: bool,

    /// Strip a UTF-8 byte order mark from the first cell of the source
    pub strip_bom: bool,

    /// Consecutive blank-designator rows that end a table
    pub blank_row_limit: usize,

    /// Override for the schema's header-row count
    pub header_rows_override: Option<usize>,

    /// Policy for unparseable timestamps
    pub date_fallback: DateFallback,

    /// Maximum files decoded concurrently by the CLI
    pub max_concurrent_files: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            trim_leading_space: true,
            strip_bom: true,
            blank_row_limit: BLANK_ROW_SENTINEL,
            header_rows_override: None,
            date_fallback: DateFallback::Now,
            max_concurrent_files: num_cpus::get().max(1),
        }
    }
}

impl DecoderConfig {
    /// Load a configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })?;

        debug!("Loaded decoder configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.blank_row_limit == 0 {
            return Err(Error::configuration(
                "blank_row_limit must be at least 1",
            ));
        }

        if self.max_concurrent_files == 0 {
            return Err(Error::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }

        if matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(Error::configuration(format!(
                "delimiter {:?} cannot be a quote or line terminator",
                self.delimiter as char
            )));
        }

        Ok(())
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the blank-row termination limit
    pub fn with_blank_row_limit(mut self, limit: usize) -> Self {
        self.blank_row_limit = limit;
        self
    }

    /// Override the header-row count of every schema
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows_override = Some(header_rows);
        self
    }

    /// Set the timestamp fallback policy
    pub fn with_date_fallback(mut self, fallback: DateFallback) -> Self {
        self.date_fallback = fallback;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Keep leading whitespace in cells
    pub fn without_trimming(mut self) -> Self {
        self.trim_leading_space = false;
        self
    }

    /// Header rows to skip for a schema declaring `schema_header_rows`
    pub fn header_rows(&self, schema_header_rows: usize) -> usize {
        self.header_rows_override.unwrap_or(schema_header_rows)
    }
}
