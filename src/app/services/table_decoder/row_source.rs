//! Row sources for table sessions
//!
//! A table session pulls one [`Row`] at a time. Rows carry the physical
//! 1-based line number of the source so rejections can be reported against
//! what the user sees in their spreadsheet tool.

use crate::config::DecoderConfig;
use crate::constants::UTF8_BOM;
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One row of cells with its source line number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    line: usize,
    cells: Vec<String>,
}

impl Row {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// 1-based physical line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Cell at `column`, `None` when the row is shorter
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A row with no cells at all, as opposed to a row of empty cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the cell at `column` is missing or whitespace-only
    pub fn is_blank_at(&self, column: usize) -> bool {
        self.cell(column).is_none_or(|cell| cell.trim().is_empty())
    }
}

impl<S: Into<String>> From<(usize, Vec<S>)> for Row {
    fn from((line, cells): (usize, Vec<S>)) -> Self {
        Row::new(line, cells.into_iter().map(Into::into).collect())
    }
}

/// Pull-based supplier of rows
///
/// Returning `Ok(None)` ends the input. Errors are fatal to the session.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<Row>>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }
}

/// Delimited-text rows read with the `csv` crate
///
/// Records are read as bytes and converted lossily, so invalid UTF-8 turns
/// into replacement characters rather than a failed decode. Rows may have
/// any number of cells.
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    record: csv::ByteRecord,
    source_name: String,
    trim_leading_space: bool,
    strip_bom: bool,
    rows_read: usize,
}

impl CsvRowSource<File> {
    /// Open a file as a row source
    pub fn from_path(path: &Path, config: &DecoderConfig) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;
        debug!("Opened table source {}", path.display());
        Ok(Self::from_reader(file, path.display().to_string(), config))
    }
}

impl<R: Read> CsvRowSource<R> {
    /// Wrap any reader; `source_name` is used in error messages
    pub fn from_reader(reader: R, source_name: impl Into<String>, config: &DecoderConfig) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(config.delimiter)
            .from_reader(reader);

        Self {
            reader,
            record: csv::ByteRecord::new(),
            source_name: source_name.into(),
            trim_leading_space: config.trim_leading_space,
            strip_bom: config.strip_bom,
            rows_read: 0,
        }
    }

    /// Rows handed out so far
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn decode_cell(&self, raw: &[u8], first: bool) -> String {
        let mut cell = String::from_utf8_lossy(raw).into_owned();
        if first && self.strip_bom {
            if let Some(stripped) = cell.strip_prefix(UTF8_BOM) {
                cell = stripped.to_string();
            }
        }
        if self.trim_leading_space {
            let trimmed = cell.trim_start();
            if trimmed.len() != cell.len() {
                cell = trimmed.to_string();
            }
        }
        cell
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        let more = self.reader.read_byte_record(&mut self.record).map_err(|e| {
            Error::csv_parsing(
                &self.source_name,
                format!("failed after row {}", self.rows_read),
                Some(e),
            )
        })?;
        if !more {
            return Ok(None);
        }

        let first_row = self.rows_read == 0;
        self.rows_read += 1;

        let line = self
            .record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(self.rows_read);

        let cells = self
            .record
            .iter()
            .enumerate()
            .map(|(index, raw)| self.decode_cell(raw, first_row && index == 0))
            .collect();

        Ok(Some(Row::new(line, cells)))
    }
}

/// In-memory rows, numbered from line 1
#[derive(Debug, Clone, Default)]
pub struct VecRowSource {
    rows: Vec<Vec<String>>,
    next: usize,
}

impl VecRowSource {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows, next: 0 }
    }

    /// Build from string slices, convenient for fixtures
    pub fn from_cells(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Rows handed out so far
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl RowSource for VecRowSource {
    fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(cells) = self.rows.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        Ok(Some(Row::new(self.next, cells.clone())))
    }
}
