//! Test utilities and fixtures for table decoder testing
//!
//! This module provides row builders, failing sources and fixed clocks
//! shared by the table decoder test modules.

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;
use tempfile::NamedTempFile;

use super::coders::CodeContext;
use super::row_source::{Row, RowSource};
use crate::app::services::vocabulary::VocabularyRegistry;
use crate::{Error, Result};

// Test modules
mod assembler_tests;
mod schema_tests;
mod session_tests;

/// Fixed decoding time used for timestamp fallbacks
pub fn decoded_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Coder context over the shipped vocabularies
pub fn context() -> CodeContext<'static> {
    CodeContext::new(VocabularyRegistry::builtin(), decoded_at())
}

/// A row of `width` empty cells with the given cells filled in
pub fn wide_cells(width: usize, filled: &[(usize, &str)]) -> Vec<String> {
    let mut cells = vec![String::new(); width];
    for &(column, value) in filled {
        if column >= cells.len() {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.to_string();
    }
    cells
}

pub fn wide_row(line: usize, width: usize, filled: &[(usize, &str)]) -> Row {
    Row::new(line, wide_cells(width, filled))
}

/// Cells of a row given as string slices
pub fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Create a temporary CSV file with the given content
pub fn create_test_csv(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Yields `rows` and then fails like a broken reader
pub struct FailingRowSource {
    rows: Vec<Vec<String>>,
    next: usize,
}

impl FailingRowSource {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows, next: 0 }
    }
}

impl RowSource for FailingRowSource {
    fn next_row(&mut self) -> Result<Option<Row>> {
        match self.rows.get(self.next) {
            Some(cells) => {
                self.next += 1;
                Ok(Some(Row::new(self.next, cells.clone())))
            }
            None => Err(Error::io(
                "Simulated read failure",
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "connection reset"),
            )),
        }
    }
}
