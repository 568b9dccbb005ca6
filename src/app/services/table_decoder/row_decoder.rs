//! Single-row decoding
//!
//! Walks a schema's slots in column order, runs each cell through its
//! coder and routes the value onto the root record or into the group
//! assembler. The finished record is then bound to the family's typed
//! aggregate.

use super::assembler::{AssemblyStats, GroupAssembler};
use super::coders::{CodeContext, CodeOutcome};
use super::record::DecodedRecord;
use super::row_source::Row;
use super::schema::{Binding, ColumnSchema};
use super::stats::DecodeStats;
use crate::app::models::Aggregate;
use crate::app::services::vocabulary::VocabularyId;
use crate::Error;
use tracing::{trace, warn};

/// Cell-level findings for one decoded row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowReport {
    pub invalid_cells: usize,
    pub substituted_timestamps: usize,
    pub unrecognized: Vec<(VocabularyId, String)>,
    pub assembly: AssemblyStats,
}

impl RowReport {
    /// Add this row's findings to table counters
    pub fn apply_to(&self, stats: &mut DecodeStats) {
        stats.invalid_cells += self.invalid_cells;
        stats.substituted_timestamps += self.substituted_timestamps;
        stats.groups_committed += self.assembly.committed;
        stats.groups_discarded += self.assembly.discarded;
        for (vocabulary, label) in &self.unrecognized {
            stats.record_unrecognized(*vocabulary, label);
        }
    }
}

/// Result of binding one row to its aggregate
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<A> {
    Decoded(A),
    Rejected { reason: String },
}

/// Decodes rows of one schema
#[derive(Debug, Clone, Copy)]
pub struct RowDecoder<'s> {
    schema: &'s ColumnSchema,
    context: CodeContext<'s>,
}

impl<'s> RowDecoder<'s> {
    pub fn new(schema: &'s ColumnSchema, context: CodeContext<'s>) -> Self {
        Self { schema, context }
    }

    pub fn schema(&self) -> &'s ColumnSchema {
        self.schema
    }

    /// Decode a row into its untyped record
    ///
    /// Never fails: cells that do not decode become absent values and are
    /// counted in the report.
    pub fn decode_record(&self, row: &Row) -> (DecodedRecord, RowReport) {
        let mut record = DecodedRecord::new();
        let mut report = RowReport::default();
        let mut assembler = GroupAssembler::new(self.schema);

        for slot in self.schema.slots() {
            let coded = slot.coder.decode(row.cell(slot.column), &self.context);

            match coded.outcome {
                CodeOutcome::Invalid => {
                    trace!(
                        "Line {} column {}: invalid {} for '{}'",
                        row.line(),
                        slot.column,
                        slot.coder,
                        slot.field
                    );
                    report.invalid_cells += 1;
                }
                CodeOutcome::Substituted => report.substituted_timestamps += 1,
                CodeOutcome::Valid | CodeOutcome::Empty | CodeOutcome::Unrecognized => {}
            }

            if let Some(vocabulary) = slot.coder.vocabulary() {
                for label in &coded.unrecognized {
                    warn!(
                        "Line {} column {}: unrecognized {} label '{}'",
                        row.line(),
                        slot.column,
                        vocabulary,
                        label
                    );
                }
                report
                    .unrecognized
                    .extend(coded.unrecognized.into_iter().map(|label| (vocabulary, label)));
            }

            match slot.binding {
                Binding::Root => record.set(&slot.field, coded.value),
                Binding::RootAppend => record.append(&slot.field, coded.value),
                Binding::Group(group_slot) => assembler.accept(
                    &group_slot,
                    &slot.field,
                    coded.value,
                    coded.outcome,
                    &mut record,
                ),
            }
        }

        assembler.finish(&mut record);
        report.assembly = assembler.stats();
        (record, report)
    }

    /// Decode a row and bind it to the aggregate `A`
    pub fn decode<A: Aggregate>(&self, row: &Row) -> (RowOutcome<A>, RowReport) {
        let (record, report) = self.decode_record(row);

        let outcome = match A::from_record(&record) {
            Ok(aggregate) => RowOutcome::Decoded(aggregate),
            Err(e) => {
                let message = format!("cannot bind {} record: {}", A::FAMILY, e);
                RowOutcome::Rejected {
                    reason: Error::record_binding(row.line(), message, Some(e)).to_string(),
                }
            }
        };

        (outcome, report)
    }
}
