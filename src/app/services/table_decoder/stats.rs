//! Decoding statistics and batch results
//!
//! This module provides the types a table session hands back: the decoded
//! aggregates, the line numbers of rejected rows, and counters describing
//! how much of the input decoded cleanly.

use crate::app::models::TableFamily;
use crate::app::services::vocabulary::VocabularyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a session stopped reading rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum Termination {
    /// The source ran out of rows
    EndOfInput,
    /// A row with no cells at all
    EmptyRow { line: usize },
    /// Too many consecutive rows with a blank designator cell
    BlankSentinel { line: usize },
    /// The caller stopped pulling rows before the table ended
    Stopped,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::EndOfInput => write!(f, "end of input"),
            Termination::EmptyRow { line } => write!(f, "empty row at line {}", line),
            Termination::BlankSentinel { line } => {
                write!(f, "blank-row sentinel at line {}", line)
            }
            Termination::Stopped => write!(f, "stopped by caller"),
        }
    }
}

/// Counters for one decoded table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Rows pulled from the source, header rows included
    pub rows_read: usize,

    /// Leading rows discarded as headers
    pub header_rows_skipped: usize,

    /// Rows turned into aggregates
    pub aggregates_decoded: usize,

    /// Rows recorded as rejections
    pub rows_rejected: usize,

    /// Rows whose designator cell was blank
    pub blank_rows: usize,

    /// Cells supplied but not parseable as their field's type
    pub invalid_cells: usize,

    /// Timestamps replaced by the decoding time
    pub substituted_timestamps: usize,

    /// Group occurrences committed
    pub groups_committed: usize,

    /// Group occurrences discarded as empty
    pub groups_discarded: usize,

    /// Unrecognized labels per vocabulary, with occurrence counts
    pub unrecognized_labels: BTreeMap<String, BTreeMap<String, usize>>,

    /// Per-row rejection reasons for diagnostics
    pub errors: Vec<String>,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one unrecognized label
    pub fn record_unrecognized(&mut self, vocabulary: VocabularyId, label: &str) {
        *self
            .unrecognized_labels
            .entry(vocabulary.name().to_string())
            .or_default()
            .entry(label.to_string())
            .or_insert(0) += 1;
    }

    /// Unrecognized label occurrences across every vocabulary
    pub fn total_unrecognized(&self) -> usize {
        self.unrecognized_labels
            .values()
            .flat_map(|labels| labels.values())
            .sum()
    }

    /// Rows after the header
    pub fn data_rows(&self) -> usize {
        self.rows_read.saturating_sub(self.header_rows_skipped)
    }

    /// Decoded aggregates as a percentage of decoded plus rejected rows
    pub fn success_rate(&self) -> f64 {
        let attempted = self.aggregates_decoded + self.rows_rejected;
        if attempted == 0 {
            0.0
        } else {
            (self.aggregates_decoded as f64 / attempted as f64) * 100.0
        }
    }

    /// Check if decoding was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }

    /// Fold another table's counters into this one
    pub fn merge(&mut self, other: &DecodeStats) {
        self.rows_read += other.rows_read;
        self.header_rows_skipped += other.header_rows_skipped;
        self.aggregates_decoded += other.aggregates_decoded;
        self.rows_rejected += other.rows_rejected;
        self.blank_rows += other.blank_rows;
        self.invalid_cells += other.invalid_cells;
        self.substituted_timestamps += other.substituted_timestamps;
        self.groups_committed += other.groups_committed;
        self.groups_discarded += other.groups_discarded;

        for (vocabulary, labels) in &other.unrecognized_labels {
            let target = self.unrecognized_labels.entry(vocabulary.clone()).or_default();
            for (label, count) in labels {
                *target.entry(label.clone()).or_insert(0) += count;
            }
        }

        self.errors.extend(other.errors.iter().cloned());
    }
}

/// Everything one table session produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedBatch<A> {
    /// Family of the decoded table
    pub family: TableFamily,

    /// Aggregates in source row order
    pub aggregates: Vec<A>,

    /// 1-based line numbers of rejected rows, in source order
    pub rejections: Vec<usize>,

    pub stats: DecodeStats,

    pub termination: Termination,
}

impl<A> DecodedBatch<A> {
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Whether the session reached the end of the table on its own
    pub fn is_complete(&self) -> bool {
        !matches!(self.termination, Termination::Stopped)
    }
}
