//! Table decoder for fixed-layout spreadsheet exports
//!
//! This module turns positional spreadsheet rows into typed aggregates.
//! It is organized into focused submodules:
//!
//! - `coders`: total cell-to-value conversion
//! - `schema`: declarative column layouts with repeat-groups
//! - `assembler`: buffering and committing repeat-group occurrences
//! - `row_decoder`: one schema applied to one row
//! - `session`: header skipping, blank-row sentinel, end of input
//! - `families`: the shipped layouts of each table family
//!
//! [`TableDecoder`] ties these together for one aggregate type.

pub mod assembler;
pub mod coders;
pub mod families;
pub mod record;
pub mod row_decoder;
pub mod row_source;
pub mod schema;
pub mod session;
pub mod stats;

#[cfg(test)]
mod tests;

pub use coders::{CodeContext, CodeOutcome, Coded, Coder};
pub use record::{CellValue, DecodedRecord};
pub use row_decoder::{RowDecoder, RowOutcome, RowReport};
pub use row_source::{CsvRowSource, Row, RowSource, VecRowSource};
pub use schema::{ColumnSchema, GroupLayout, NonEmptyRule, SchemaBuilder, SubGroupLayout};
pub use session::{SessionState, TableSession};
pub use stats::{DecodeStats, DecodedBatch, Termination};

use crate::app::models::Aggregate;
use crate::app::services::vocabulary::VocabularyRegistry;
use crate::config::DecoderConfig;
use crate::Result;
use chrono::{Local, NaiveDateTime};
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Decoder for one aggregate type
///
/// Holds the validated schema and configuration; every `decode_*` call
/// runs an independent [`TableSession`].
#[derive(Debug, Clone)]
pub struct TableDecoder<A> {
    schema: ColumnSchema,
    config: DecoderConfig,
    vocabularies: &'static VocabularyRegistry,
    decoded_at: Option<NaiveDateTime>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A: Aggregate> TableDecoder<A> {
    /// Decoder using the family's shipped layout
    pub fn new(config: DecoderConfig) -> Result<Self> {
        Self::with_schema(A::schema()?, config)
    }

    /// Decoder using a caller-supplied layout
    pub fn with_schema(schema: ColumnSchema, config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            schema,
            config,
            vocabularies: VocabularyRegistry::builtin(),
            decoded_at: None,
            _aggregate: PhantomData,
        })
    }

    /// Pin the timestamp substituted for unparseable dates
    ///
    /// Without this each session uses the local time it started at.
    pub fn with_decoded_at(mut self, decoded_at: NaiveDateTime) -> Self {
        self.decoded_at = Some(decoded_at);
        self
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// A fresh session for stepping through a source manually
    pub fn session(&self) -> TableSession<'_, A> {
        let decoded_at = self
            .decoded_at
            .unwrap_or_else(|| Local::now().naive_local());
        TableSession::new(&self.schema, &self.config, self.vocabularies, decoded_at)
    }

    /// Decode every row of `source`
    pub fn decode<S: RowSource + ?Sized>(&self, source: &mut S) -> Result<DecodedBatch<A>> {
        self.session().run(source)
    }

    /// Decode every row of `source`, stopping early if `token` is cancelled
    pub fn decode_cancellable<S: RowSource + ?Sized>(
        &self,
        source: &mut S,
        token: &CancellationToken,
    ) -> Result<DecodedBatch<A>> {
        self.session().run_until_cancelled(source, token)
    }

    /// Decode delimited text from any reader
    pub fn decode_reader<R: Read>(&self, reader: R, source_name: &str) -> Result<DecodedBatch<A>> {
        let mut source = CsvRowSource::from_reader(reader, source_name, &self.config);
        self.decode(&mut source)
    }

    /// Decode a delimited-text file
    pub fn decode_path(&self, path: &Path) -> Result<DecodedBatch<A>> {
        info!("Decoding {} table: {}", A::FAMILY, path.display());
        let mut source = CsvRowSource::from_path(path, &self.config)?;
        self.decode(&mut source)
    }

    /// Decode in-memory rows, numbered from line 1
    pub fn decode_rows(&self, rows: Vec<Vec<String>>) -> Result<DecodedBatch<A>> {
        self.decode(&mut VecRowSource::new(rows))
    }
}
