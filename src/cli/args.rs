//! Command-line argument definitions for the recruit decoder
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::TableFamily;
use crate::app::services::vocabulary::VocabularyId;
use crate::config::DateFallback;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the recruit decoder
///
/// Decodes fixed-layout spreadsheet exports (companies, job postings,
/// candidates, send targets) into typed JSON records.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "recruit-decoder",
    version,
    about = "Decode fixed-layout recruiting spreadsheet exports into typed records",
    long_about = "Decodes positional CSV exports of the recruiting platform's import templates \
                  into nested records. Repeat-groups (billing contacts, work histories, selection \
                  stages) are assembled per row, labels are resolved to vocabulary codes, and rows \
                  that cannot be decoded are reported by line number instead of aborting the import."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode one or more CSV exports of a table family
    Decode(DecodeArgs),
    /// Print the column layout of a table family
    Schema(SchemaArgs),
    /// List vocabularies or print one vocabulary table
    Vocab(VocabArgs),
}

/// Table family selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    Company,
    JobPosting,
    Candidate,
    SendTarget,
}

impl From<FamilyArg> for TableFamily {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::Company => TableFamily::Company,
            FamilyArg::JobPosting => TableFamily::JobPosting,
            FamilyArg::Candidate => TableFamily::Candidate,
            FamilyArg::SendTarget => TableFamily::SendTarget,
        }
    }
}

/// Timestamp fallback selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateFallbackArg {
    /// Substitute the decoding time
    Now,
    /// Leave the field empty
    Absent,
}

impl From<DateFallbackArg> for DateFallback {
    fn from(fallback: DateFallbackArg) -> Self {
        match fallback {
            DateFallbackArg::Now => DateFallback::Now,
            DateFallbackArg::Absent => DateFallback::Absent,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Human,
    /// One JSON document per input file
    Json,
    /// One JSON object per decoded record
    Jsonl,
}

/// Arguments for the decode command
#[derive(Debug, Clone, Parser)]
pub struct DecodeArgs {
    /// Table family of every input file
    #[arg(short = 'f', long = "family", value_enum, help = "Table family of the input files")]
    pub family: FamilyArg,

    /// Input CSV files; glob patterns are expanded
    #[arg(value_name = "INPUT", required = true, help = "Input CSV files or glob patterns")]
    pub inputs: Vec<String>,

    /// Output format
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for decoded records"
    )]
    pub format: OutputFormat,

    /// Output file; stdout when omitted
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write records to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    /// Decoder configuration file (JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to decoder configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Policy for unparseable timestamps, overrides the config file
    #[arg(long = "date-fallback", value_enum, help = "Policy for unparseable timestamps")]
    pub date_fallback: Option<DateFallbackArg>,

    /// Header rows to skip, overrides the family layout
    #[arg(long = "header-rows", value_name = "COUNT", help = "Override the header row count")]
    pub header_rows: Option<usize>,

    /// Number of files decoded concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of files decoded concurrently"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl DecodeArgs {
    /// Validate the decode command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(output) = &self.output {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the schema command
#[derive(Debug, Clone, Parser)]
pub struct SchemaArgs {
    /// Table family to describe
    #[arg(short = 'f', long = "family", value_enum, help = "Table family to describe")]
    pub family: FamilyArg,
}

/// Arguments for the vocab command
#[derive(Debug, Clone, Parser)]
pub struct VocabArgs {
    /// Vocabulary to print; all vocabularies are listed when omitted
    #[arg(value_name = "NAME", help = "Vocabulary name, e.g. prefecture or work_experience")]
    pub name: Option<String>,
}

impl VocabArgs {
    /// Resolve the requested vocabulary
    pub fn vocabulary(&self) -> Result<Option<VocabularyId>> {
        self.name.as_deref().map(str::parse::<VocabularyId>).transpose()
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}
