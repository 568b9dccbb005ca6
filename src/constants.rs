//! Application constants for the recruit decoder
//!
//! This module contains the default values, markers, and formats shared by
//! the coders, the table families, and the CLI.

// =============================================================================
// Session Termination
// =============================================================================

/// Consecutive rows with an empty designator column that end a table
pub const BLANK_ROW_SENTINEL: usize = 3;

/// Column whose emptiness drives the blank-row sentinel in every shipped layout
pub const DEFAULT_DESIGNATOR_COLUMN: usize = 0;

// =============================================================================
// Delimited Text
// =============================================================================

/// Default field delimiter of spreadsheet exports
pub const DEFAULT_DELIMITER: u8 = b',';

/// Delimiters accepted inside multi-value cells
pub const MULTI_VALUE_DELIMITERS: &[char] = &[',', '、', '，'];

/// UTF-8 byte order mark written by spreadsheet tools
pub const UTF8_BOM: char = '\u{feff}';

// =============================================================================
// Value Markers and Formats
// =============================================================================

/// Literal marking an optional repeat occurrence as present
pub const PRESENCE_MARKER: &str = "有";

/// Cell contents spreadsheets use for "none"; decoded as empty
pub const NONE_MARKERS: &[&str] = &["ー", "－"];

/// Fixed-length timestamp layout of exported audit columns
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Byte length of a timestamp written in [`TIMESTAMP_FORMAT`]
pub const TIMESTAMP_LENGTH: usize = 19;

/// Calendar date layout (birth dates and similar)
pub const DATE_FORMAT: &str = "%Y/%m/%d";

// =============================================================================
// Business Rounding
// =============================================================================

/// Job-change counts above this value are reported as "5 or more"
pub const JOB_CHANGE_CLAMP_ABOVE: i64 = 4;

/// Value stored for "5 or more" job changes
pub const JOB_CHANGE_CLAMP_TO: i64 = 5;

// =============================================================================
// Vocabulary Tables
// =============================================================================

/// Version of the shipped label/code tables; bump whenever a code changes
pub const VOCABULARY_VERSION: &str = "2024.2";

// =============================================================================
// CLI Defaults
// =============================================================================

/// Default number of aggregates shown by preview output
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;
