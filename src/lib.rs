//! Recruit Decoder Library
//!
//! A Rust library for decoding fixed-layout spreadsheet exports from a
//! recruiting-agency platform into typed, nested domain aggregates.
//!
//! This library provides tools for:
//! - Describing positional table layouts declaratively (column schemas with repeat-groups)
//! - Converting raw cells with total value coders (integers, codes, lists, timestamps)
//! - Assembling repeating sub-records (work histories, selection-flow stages, contacts)
//! - Running table sessions with header skipping and a blank-row termination sentinel
//! - Resolving spreadsheet labels to stable integer codes via shipped vocabularies
//! - Handing decoded batches to record sinks (JSON lines, previews, counters)

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod record_sink;
        pub mod table_decoder;
        pub mod vocabulary;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Aggregate, Candidate, Company, JobPosting, SendTargetJobPosting, TableFamily};
pub use app::services::table_decoder::{DecodedBatch, TableDecoder};
pub use config::DecoderConfig;

/// Result type alias for the decoder
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for table decoding operations
///
/// Only source I/O failures abort a decode; malformed cells and rows are
/// downgraded to absent values or rejection records and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The delimited-text reader could not produce the next row
    #[error("CSV reading error in '{source_name}': {message}")]
    CsvParsing {
        source_name: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// A column schema violates its structural invariants
    #[error("Schema definition error for {family}: {message}")]
    SchemaDefinition { family: String, message: String },

    /// Table family name not recognised
    #[error("Unknown table family: {name}")]
    UnknownTableFamily { name: String },

    /// Vocabulary name not recognised
    #[error("Unknown vocabulary: {name}")]
    UnknownVocabulary { name: String },

    /// A decoded record could not be bound to its typed aggregate
    #[error("Record binding error at line {line}: {message}")]
    RecordBinding {
        line: usize,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },

    /// Record sink failed to emit a batch
    #[error("Emit error: {message}")]
    Emit { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV reading error with context
    pub fn csv_parsing(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            source_name: source_name.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a schema definition error
    pub fn schema_definition(family: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaDefinition {
            family: family.into(),
            message: message.into(),
        }
    }

    /// Create an unknown table family error
    pub fn unknown_table_family(name: impl Into<String>) -> Self {
        Self::UnknownTableFamily { name: name.into() }
    }

    /// Create an unknown vocabulary error
    pub fn unknown_vocabulary(name: impl Into<String>) -> Self {
        Self::UnknownVocabulary { name: name.into() }
    }

    /// Create a record binding error
    pub fn record_binding(
        line: usize,
        message: impl Into<String>,
        source: Option<serde_json::Error>,
    ) -> Self {
        Self::RecordBinding {
            line,
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Create an emit error
    pub fn emit(message: impl Into<String>) -> Self {
        Self::Emit {
            message: message.into(),
        }
    }

    /// Whether the error came from the row source rather than from this crate
    pub fn is_source_failure(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::CsvParsing { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            source_name: "unknown".to_string(),
            message: "CSV reading failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Emit {
            message: format!("JSON serialization failed: {}", error),
        }
    }
}
