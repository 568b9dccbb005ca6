//! Value coders for spreadsheet cells
//!
//! Every coder is total: any input string, including the empty string,
//! text with embedded delimiters, and non-numeric text fed to a numeric
//! coder, yields a [`Coded`] result. Absence of a valid value is reported
//! as [`CellValue::Absent`] plus an outcome describing why, never as an
//! error and never as a substituted default (the one documented exception
//! is the timestamp fallback, see [`DateFallback`]).

use super::record::CellValue;
use crate::app::services::vocabulary::{Vocabulary, VocabularyId, VocabularyRegistry};
use crate::config::DateFallback;
use crate::constants::{
    DATE_FORMAT, MULTI_VALUE_DELIMITERS, NONE_MARKERS, PRESENCE_MARKER, TIMESTAMP_FORMAT,
};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+$").expect("valid thousands pattern"));

/// How a cell string is turned into a typed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coder {
    /// Trimmed text, absent when empty
    Text,
    /// Integer or absent
    Int,
    /// Integer with values above `above` replaced by `to` ("5 or more")
    ClampedInt { above: i64, to: i64 },
    /// Label resolved through a vocabulary
    Code(VocabularyId),
    /// `true` iff the cell equals `marker`
    Flag { marker: String },
    /// Calendar date, absent on failure
    Date { format: String },
    /// Fixed-length timestamp with the session's fallback policy
    DateTime { format: String },
    /// Delimited list, each token decoded by the inner coder
    Multi(Box<Coder>),
}

impl Coder {
    pub fn code(vocabulary: VocabularyId) -> Self {
        Coder::Code(vocabulary)
    }

    pub fn multi(inner: Coder) -> Self {
        Coder::Multi(Box::new(inner))
    }

    pub fn multi_code(vocabulary: VocabularyId) -> Self {
        Coder::multi(Coder::Code(vocabulary))
    }

    pub fn clamped(above: i64, to: i64) -> Self {
        Coder::ClampedInt { above, to }
    }

    pub fn flag(marker: impl Into<String>) -> Self {
        Coder::Flag {
            marker: marker.into(),
        }
    }

    /// Flag matching the literal "present" marker
    pub fn presence() -> Self {
        Coder::flag(PRESENCE_MARKER)
    }

    pub fn date() -> Self {
        Coder::Date {
            format: DATE_FORMAT.to_string(),
        }
    }

    pub fn timestamp() -> Self {
        Coder::DateTime {
            format: TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Vocabulary consulted by this coder, if any
    pub fn vocabulary(&self) -> Option<VocabularyId> {
        match self {
            Coder::Code(id) => Some(*id),
            Coder::Multi(inner) => inner.vocabulary(),
            _ => None,
        }
    }

    /// Decode one cell; `None` means the row had no cell at this column
    pub fn decode(&self, cell: Option<&str>, ctx: &CodeContext<'_>) -> Coded {
        let cell = cell.unwrap_or("");

        match self {
            Coder::Text => match decode_text(cell) {
                Some(text) => Coded::valid(CellValue::Text(text)),
                None => Coded::empty(),
            },
            Coder::Int => numeric(cell, decode_int(cell).map(CellValue::Int)),
            Coder::ClampedInt { above, to } => numeric(
                cell,
                decode_int(cell).map(|value| CellValue::Int(clamp_above(value, *above, *to))),
            ),
            Coder::Code(id) => {
                if is_blank(cell) {
                    return Coded::empty();
                }
                match decode_code(cell, ctx.vocabularies.get(*id)) {
                    Some(code) => Coded::valid(CellValue::Code(code)),
                    None => Coded::unrecognized(cell.trim()),
                }
            }
            Coder::Flag { marker } => match decode_flag(cell, marker) {
                Some(flag) => Coded::valid(CellValue::Flag(flag)),
                None => Coded::empty(),
            },
            Coder::Date { format } => {
                if is_blank(cell) {
                    return Coded::empty();
                }
                match decode_date(cell, format) {
                    Some(date) => Coded::valid(CellValue::Date(date)),
                    None => Coded::invalid(),
                }
            }
            Coder::DateTime { format } => {
                if is_blank(cell) {
                    return Coded::empty();
                }
                match decode_datetime(cell, format) {
                    Some(timestamp) => Coded::valid(CellValue::DateTime(timestamp)),
                    None => match ctx.date_fallback {
                        DateFallback::Now => Coded {
                            value: CellValue::DateTime(ctx.decoded_at),
                            outcome: CodeOutcome::Substituted,
                            unrecognized: Vec::new(),
                        },
                        DateFallback::Absent => Coded::invalid(),
                    },
                }
            }
            Coder::Multi(inner) => decode_multi(cell, inner, ctx),
        }
    }
}

impl fmt::Display for Coder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coder::Text => write!(f, "text"),
            Coder::Int => write!(f, "int"),
            Coder::ClampedInt { above, to } => write!(f, "int(>{} => {})", above, to),
            Coder::Code(id) => write!(f, "code({})", id),
            Coder::Flag { marker } => write!(f, "flag({})", marker),
            Coder::Date { format } => write!(f, "date({})", format),
            Coder::DateTime { format } => write!(f, "timestamp({})", format),
            Coder::Multi(inner) => write!(f, "list<{}>", inner),
        }
    }
}

/// Everything a coder may consult besides the cell itself
#[derive(Debug, Clone, Copy)]
pub struct CodeContext<'a> {
    pub vocabularies: &'a VocabularyRegistry,
    /// Substituted for unparseable timestamps under [`DateFallback::Now`]
    pub decoded_at: NaiveDateTime,
    pub date_fallback: DateFallback,
}

impl<'a> CodeContext<'a> {
    pub fn new(vocabularies: &'a VocabularyRegistry, decoded_at: NaiveDateTime) -> Self {
        Self {
            vocabularies,
            decoded_at,
            date_fallback: DateFallback::default(),
        }
    }

    pub fn with_date_fallback(mut self, fallback: DateFallback) -> Self {
        self.date_fallback = fallback;
        self
    }
}

/// Validity of a coded value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeOutcome {
    /// A value was supplied and decoded
    Valid,
    /// Nothing supplied
    Empty,
    /// Supplied but not parseable as the expected type
    Invalid,
    /// Supplied label missing from the vocabulary
    Unrecognized,
    /// Unparseable timestamp replaced by the decoding time
    Substituted,
}

/// Result of running a coder over one cell
#[derive(Debug, Clone, PartialEq)]
pub struct Coded {
    pub value: CellValue,
    pub outcome: CodeOutcome,
    /// Labels that failed vocabulary lookup
    pub unrecognized: Vec<String>,
}

impl Coded {
    fn valid(value: CellValue) -> Self {
        Self {
            value,
            outcome: CodeOutcome::Valid,
            unrecognized: Vec::new(),
        }
    }

    fn empty() -> Self {
        Self {
            value: CellValue::Absent,
            outcome: CodeOutcome::Empty,
            unrecognized: Vec::new(),
        }
    }

    fn invalid() -> Self {
        Self {
            value: CellValue::Absent,
            outcome: CodeOutcome::Invalid,
            unrecognized: Vec::new(),
        }
    }

    fn unrecognized(label: &str) -> Self {
        Self {
            value: CellValue::Absent,
            outcome: CodeOutcome::Unrecognized,
            unrecognized: vec![label.to_string()],
        }
    }

    /// Whether the value reflects the cell without loss
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, CodeOutcome::Valid | CodeOutcome::Empty)
    }
}

fn numeric(cell: &str, value: Option<CellValue>) -> Coded {
    match value {
        Some(value) => Coded::valid(value),
        None if is_blank(cell) => Coded::empty(),
        None => Coded::invalid(),
    }
}

fn decode_multi(cell: &str, inner: &Coder, ctx: &CodeContext<'_>) -> Coded {
    let mut values = Vec::new();
    let mut unrecognized = Vec::new();
    let mut dropped_invalid = false;

    for token in split_multi(cell) {
        let coded = inner.decode(Some(token), ctx);
        match coded.outcome {
            CodeOutcome::Valid | CodeOutcome::Substituted => values.push(coded.value),
            CodeOutcome::Empty => {}
            CodeOutcome::Unrecognized => unrecognized.extend(coded.unrecognized),
            CodeOutcome::Invalid => dropped_invalid = true,
        }
    }

    let outcome = if !unrecognized.is_empty() {
        CodeOutcome::Unrecognized
    } else if dropped_invalid {
        CodeOutcome::Invalid
    } else if values.is_empty() {
        CodeOutcome::Empty
    } else {
        CodeOutcome::Valid
    };

    Coded {
        value: CellValue::List(values),
        outcome,
        unrecognized,
    }
}

/// Empty, whitespace only, or a lone dash placeholder (`ー`, `－`)
fn is_blank(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NONE_MARKERS.contains(&trimmed)
}

/// Fold full-width digits and signs to ASCII
fn fold_digits(cell: &str) -> String {
    cell.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '－' | 'ー' | '−' => '-',
            '＋' => '+',
            '，' => ',',
            _ => c,
        })
        .collect()
}

/// Trimmed text, `None` when empty
pub fn decode_text(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Integer or `None`
///
/// Accepts surrounding whitespace, full-width digits, and thousands
/// separators in the `1,234,567` form.
pub fn decode_int(cell: &str) -> Option<i64> {
    let folded = fold_digits(cell.trim());
    if folded.is_empty() {
        return None;
    }

    if THOUSANDS.is_match(&folded) {
        return folded.replace(',', "").parse().ok();
    }

    folded.parse().ok()
}

/// Replace values greater than `above` with `to`
pub fn clamp_above(value: i64, above: i64, to: i64) -> i64 {
    if value > above { to } else { value }
}

/// Vocabulary code for a label, `None` if unrecognized
pub fn decode_code(cell: &str, vocabulary: &Vocabulary) -> Option<i32> {
    vocabulary.code_of(cell)
}

/// Tokens of a multi-value cell: split, trimmed, empty tokens dropped
pub fn split_multi(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(MULTI_VALUE_DELIMITERS)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// `Some(true)` for the marker, `Some(false)` for other text, `None` when empty
pub fn decode_flag(cell: &str, marker: &str) -> Option<bool> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed == marker)
    }
}

/// Calendar date or `None`
pub fn decode_date(cell: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell.trim(), format).ok()
}

/// Byte length of a timestamp rendered with `format`
pub fn fixed_length(format: &str) -> usize {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|sample| sample.format(format).to_string().len())
        .unwrap_or(0)
}

/// Fixed-length timestamp or `None`
///
/// Only the first `fixed_length(format)` bytes are parsed, so trailing
/// fractions or zone suffixes written by some exporters are ignored.
/// Shorter cells fail.
pub fn decode_datetime(cell: &str, format: &str) -> Option<NaiveDateTime> {
    let trimmed = cell.trim();
    let length = fixed_length(format);
    let head = trimmed.get(..length)?;
    NaiveDateTime::parse_from_str(head, format).ok()
}
