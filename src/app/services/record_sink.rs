//! Record sinks
//!
//! A sink receives a finished [`DecodedBatch`] once decoding is over;
//! nothing is emitted while a session is still running. The shipped sinks
//! cover the three ways callers consume a batch: re-serialized as JSON
//! lines, previewed before confirmation, or persisted with only counts
//! returned.

use crate::app::models::{Aggregate, TableFamily};
use crate::app::services::table_decoder::DecodedBatch;
use crate::constants::DEFAULT_PREVIEW_LIMIT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

/// What a sink did with a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReport {
    /// Aggregates written or accepted
    pub emitted: usize,
    /// Line numbers the caller should show as missed rows
    pub rejections: Vec<usize>,
}

/// Consumer of decoded batches
pub trait RecordSink<A: Aggregate> {
    fn emit(&mut self, batch: &DecodedBatch<A>) -> Result<SinkReport>;
}

/// Writes one JSON object per aggregate, newline separated
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Lines written across every batch
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<A: Aggregate, W: Write> RecordSink<A> for JsonLinesSink<W> {
    fn emit(&mut self, batch: &DecodedBatch<A>) -> Result<SinkReport> {
        for aggregate in &batch.aggregates {
            serde_json::to_writer(&mut self.writer, aggregate)?;
            self.writer
                .write_all(b"\n")
                .map_err(|e| Error::io("Failed to write JSON line", e))?;
        }
        self.writer
            .flush()
            .map_err(|e| Error::io("Failed to flush JSON lines", e))?;

        self.written += batch.aggregates.len();
        debug!("Wrote {} {} record(s) as JSON lines", batch.aggregates.len(), batch.family);

        Ok(SinkReport {
            emitted: batch.aggregates.len(),
            rejections: batch.rejections.clone(),
        })
    }
}

/// First few aggregates of a batch, for confirmation screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub family: TableFamily,
    pub total: usize,
    pub records: Vec<serde_json::Value>,
    pub rejections: Vec<usize>,
}

/// Keeps a bounded preview of each batch it sees
#[derive(Debug, Clone)]
pub struct PreviewSink {
    limit: usize,
    previews: Vec<Preview>,
}

impl PreviewSink {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            previews: Vec::new(),
        }
    }

    pub fn previews(&self) -> &[Preview] {
        &self.previews
    }

    pub fn into_previews(self) -> Vec<Preview> {
        self.previews
    }
}

impl Default for PreviewSink {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_LIMIT)
    }
}

impl<A: Aggregate> RecordSink<A> for PreviewSink {
    fn emit(&mut self, batch: &DecodedBatch<A>) -> Result<SinkReport> {
        let records = batch
            .aggregates
            .iter()
            .take(self.limit)
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let emitted = records.len();
        self.previews.push(Preview {
            family: batch.family,
            total: batch.aggregates.len(),
            records,
            rejections: batch.rejections.clone(),
        });

        Ok(SinkReport {
            emitted,
            rejections: batch.rejections.clone(),
        })
    }
}

/// Accepts everything and keeps only the counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingSink {
    pub batches: usize,
    pub aggregates: usize,
    pub rejections: usize,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Aggregate> RecordSink<A> for CountingSink {
    fn emit(&mut self, batch: &DecodedBatch<A>) -> Result<SinkReport> {
        self.batches += 1;
        self.aggregates += batch.aggregates.len();
        self.rejections += batch.rejections.len();

        Ok(SinkReport {
            emitted: batch.aggregates.len(),
            rejections: batch.rejections.clone(),
        })
    }
}
