//! Table session state machine
//!
//! A session walks a row source through three states:
//!
//! - `Header { remaining }`: leading rows are discarded unread
//! - `Scanning`: every row is either decoded, rejected, or counted as blank
//! - `Done`: no further rows are pulled
//!
//! Scanning ends at the end of input, at a row with no cells, or after
//! `blank_row_limit` consecutive rows whose designator cell is blank. Rows
//! after the terminating row are never read.
//!
//! Blank rows are buffered as a run. A run that reaches the limit, or one
//! interrupted by a data row, is recorded as rejections. A shorter run
//! that is still open when the input ends is dropped silently.

use super::coders::CodeContext;
use super::row_decoder::{RowDecoder, RowOutcome};
use super::row_source::{Row, RowSource};
use super::schema::ColumnSchema;
use super::stats::{DecodeStats, DecodedBatch, Termination};
use crate::app::models::Aggregate;
use crate::app::services::vocabulary::VocabularyRegistry;
use crate::config::DecoderConfig;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Position of a session in its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Header { remaining: usize },
    Scanning,
    Done(Termination),
}

/// Decodes one table from one row source
#[derive(Debug)]
pub struct TableSession<'s, A> {
    decoder: RowDecoder<'s>,
    blank_row_limit: usize,
    state: SessionState,
    blank_run: Vec<usize>,
    aggregates: Vec<A>,
    rejections: Vec<usize>,
    stats: DecodeStats,
}

impl<'s, A: Aggregate> TableSession<'s, A> {
    /// Start a session; `decoded_at` is the fallback for unparseable timestamps
    pub fn new(
        schema: &'s ColumnSchema,
        config: &DecoderConfig,
        vocabularies: &'s VocabularyRegistry,
        decoded_at: NaiveDateTime,
    ) -> Self {
        let context =
            CodeContext::new(vocabularies, decoded_at).with_date_fallback(config.date_fallback);
        let header_rows = config.header_rows(schema.header_rows());

        let state = if header_rows == 0 {
            SessionState::Scanning
        } else {
            SessionState::Header {
                remaining: header_rows,
            }
        };

        Self {
            decoder: RowDecoder::new(schema, context),
            blank_row_limit: config.blank_row_limit.max(1),
            state,
            blank_run: Vec::new(),
            aggregates: Vec::new(),
            rejections: Vec::new(),
            stats: DecodeStats::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, SessionState::Done(_))
    }

    /// Counters so far
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Pull and process exactly one row; a no-op once done
    pub fn step<S: RowSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        match self.state {
            SessionState::Done(_) => Ok(()),
            SessionState::Header { remaining } => {
                let Some(row) = source.next_row()? else {
                    self.finish_with(Termination::EndOfInput);
                    return Ok(());
                };
                self.stats.rows_read += 1;
                self.stats.header_rows_skipped += 1;
                debug!("Skipping header row at line {}", row.line());

                self.state = if remaining > 1 {
                    SessionState::Header {
                        remaining: remaining - 1,
                    }
                } else {
                    SessionState::Scanning
                };
                Ok(())
            }
            SessionState::Scanning => {
                let Some(row) = source.next_row()? else {
                    if !self.blank_run.is_empty() {
                        debug!(
                            "Dropping {} trailing blank row(s) at end of input",
                            self.blank_run.len()
                        );
                    }
                    self.finish_with(Termination::EndOfInput);
                    return Ok(());
                };
                self.stats.rows_read += 1;
                self.scan(row);
                Ok(())
            }
        }
    }

    /// Run until the table ends
    pub fn run<S: RowSource + ?Sized>(mut self, source: &mut S) -> Result<DecodedBatch<A>> {
        while !self.is_done() {
            self.step(source)?;
        }
        Ok(self.finish())
    }

    /// Run until the table ends or `token` is cancelled
    ///
    /// Cancellation is checked between rows and reported as
    /// [`Error::ProcessingInterrupted`]; rows decoded so far are dropped.
    pub fn run_until_cancelled<S: RowSource + ?Sized>(
        mut self,
        source: &mut S,
        token: &CancellationToken,
    ) -> Result<DecodedBatch<A>> {
        while !self.is_done() {
            if token.is_cancelled() {
                warn!("Decoding cancelled after {} row(s)", self.stats.rows_read);
                return Err(Error::processing_interrupted(format!(
                    "cancelled after {} row(s)",
                    self.stats.rows_read
                )));
            }
            self.step(source)?;
        }
        Ok(self.finish())
    }

    /// Hand back everything decoded so far
    ///
    /// A session finished before reaching `Done` reports
    /// [`Termination::Stopped`].
    pub fn finish(self) -> DecodedBatch<A> {
        let termination = match self.state {
            SessionState::Done(termination) => termination,
            _ => Termination::Stopped,
        };

        DecodedBatch {
            family: A::FAMILY,
            aggregates: self.aggregates,
            rejections: self.rejections,
            stats: self.stats,
            termination,
        }
    }

    fn scan(&mut self, row: Row) {
        let line = row.line();

        if row.is_empty() {
            self.finish_with(Termination::EmptyRow { line });
            return;
        }

        if row.is_blank_at(self.decoder.schema().designator()) {
            debug!("Line {}: blank designator cell", line);
            self.stats.blank_rows += 1;
            self.blank_run.push(line);

            if self.blank_run.len() >= self.blank_row_limit {
                self.reject_blank_run();
                self.finish_with(Termination::BlankSentinel { line });
            }
            return;
        }

        if !self.blank_run.is_empty() {
            warn!(
                "{} blank row(s) before line {} recorded as rejections",
                self.blank_run.len(),
                line
            );
            self.reject_blank_run();
        }

        let (outcome, report) = self.decoder.decode::<A>(&row);
        report.apply_to(&mut self.stats);

        match outcome {
            RowOutcome::Decoded(aggregate) => {
                self.aggregates.push(aggregate);
                self.stats.aggregates_decoded += 1;
            }
            RowOutcome::Rejected { reason } => {
                warn!("{}", reason);
                self.reject(line, reason);
            }
        }
    }

    fn reject_blank_run(&mut self) {
        for line in std::mem::take(&mut self.blank_run) {
            self.reject(line, format!("Line {}: blank designator cell", line));
        }
    }

    fn reject(&mut self, line: usize, message: String) {
        self.rejections.push(line);
        self.stats.rows_rejected += 1;
        self.stats.errors.push(message);
    }

    fn finish_with(&mut self, termination: Termination) {
        info!(
            "{} table done ({}): {} aggregate(s), {} rejection(s)",
            A::FAMILY,
            termination,
            self.aggregates.len(),
            self.rejections.len()
        );
        self.state = SessionState::Done(termination);
    }
}
