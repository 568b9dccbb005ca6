//! Repeating-group assembly
//!
//! While a row is scanned left to right, the [`GroupAssembler`] keeps one
//! buffer per repeat-group. A buffer is opened on the first slot of an
//! occurrence, filled by every slot of that occurrence, and evaluated
//! against the group's [`NonEmptyRule`](super::schema::NonEmptyRule) at the occurrence's closing slot.
//! Groups are tracked by index, so interleaved groups never share state.
//!
//! Micro-groups nested in an occurrence get their own buffer inside the
//! parent buffer and commit into a list field of the parent occurrence.

use super::coders::CodeOutcome;
use super::record::{CellValue, DecodedRecord};
use super::schema::{ColumnSchema, GroupLayout, GroupSlot, SubSlot};
use tracing::trace;

#[derive(Debug)]
struct OpenSub {
    sub: usize,
    occurrence: usize,
    record: DecodedRecord,
}

#[derive(Debug)]
struct OpenOccurrence {
    occurrence: usize,
    record: DecodedRecord,
    sub: Option<OpenSub>,
}

/// Counters for one row's group activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub committed: usize,
    pub discarded: usize,
}

/// Buffers in-progress occurrences of every repeat-group of one schema
#[derive(Debug)]
pub struct GroupAssembler<'s> {
    schema: &'s ColumnSchema,
    buffers: Vec<Option<OpenOccurrence>>,
    stats: AssemblyStats,
}

impl<'s> GroupAssembler<'s> {
    pub fn new(schema: &'s ColumnSchema) -> Self {
        Self {
            schema,
            buffers: (0..schema.groups().len()).map(|_| None).collect(),
            stats: AssemblyStats::default(),
        }
    }

    /// Fold one decoded slot value into its group buffer
    ///
    /// Commits the occurrence into `parent` when the slot closes it. A
    /// [`CodeOutcome::Substituted`] value is kept but never makes an
    /// occurrence non-empty.
    pub fn accept(
        &mut self,
        slot: &GroupSlot,
        field: &str,
        value: CellValue,
        outcome: CodeOutcome,
        parent: &mut DecodedRecord,
    ) {
        let schema = self.schema;
        let Some(group) = schema.group(slot.group) else {
            return;
        };

        let stale = self.buffers[slot.group]
            .as_ref()
            .is_some_and(|open| open.occurrence != slot.occurrence);
        if slot.opens || stale || self.buffers[slot.group].is_none() {
            self.flush(slot.group, parent);
            self.buffers[slot.group] = Some(open_occurrence(group, slot.occurrence));
        }

        let Some(open) = self.buffers[slot.group].as_mut() else {
            return;
        };

        match slot.sub {
            Some(sub_slot) => {
                let stats = accept_sub(group, open, &sub_slot, field, value, outcome);
                self.stats.committed += stats.committed;
                self.stats.discarded += stats.discarded;
            }
            None => set_field(&mut open.record, field, value, outcome),
        }

        if slot.closes {
            self.flush(slot.group, parent);
        }
    }

    /// Commit every still-open occurrence under its rule
    ///
    /// Needed when a row's final slots belong to a group whose closing
    /// slot was never reached.
    pub fn finish(&mut self, parent: &mut DecodedRecord) {
        for index in 0..self.buffers.len() {
            self.flush(index, parent);
        }
    }

    /// Commits and discards performed so far
    pub fn stats(&self) -> AssemblyStats {
        self.stats
    }

    fn flush(&mut self, index: usize, parent: &mut DecodedRecord) {
        let Some(mut open) = self.buffers[index].take() else {
            return;
        };
        let schema = self.schema;
        let Some(group) = schema.group(index) else {
            return;
        };

        if let Some(sub) = open.sub.take() {
            let stats = commit_sub(group, &mut open.record, sub);
            self.stats.committed += stats.committed;
            self.stats.discarded += stats.discarded;
        }

        let ignored: Vec<&str> = group
            .discriminator
            .as_ref()
            .map(|discriminator| vec![discriminator.field.as_str()])
            .unwrap_or_default();

        if group.rule.admits(&open.record, &ignored) {
            trace!(
                "Committing {} occurrence {} into '{}'",
                group.id,
                open.occurrence + 1,
                group.collection
            );
            parent.push(&group.collection, open.record);
            self.stats.committed += 1;
        } else {
            trace!("Discarding empty {} occurrence {}", group.id, open.occurrence + 1);
            self.stats.discarded += 1;
        }
    }
}

fn open_occurrence(group: &GroupLayout, occurrence: usize) -> OpenOccurrence {
    let mut record = DecodedRecord::new();
    if let Some((field, value)) = group.discriminator_value(occurrence) {
        record.set(field, CellValue::Int(value));
    }
    OpenOccurrence {
        occurrence,
        record,
        sub: None,
    }
}

fn accept_sub(
    group: &GroupLayout,
    open: &mut OpenOccurrence,
    slot: &SubSlot,
    field: &str,
    value: CellValue,
    outcome: CodeOutcome,
) -> AssemblyStats {
    let mut stats = AssemblyStats::default();

    let stale = open
        .sub
        .as_ref()
        .is_some_and(|sub| sub.sub != slot.sub || sub.occurrence != slot.occurrence);
    if slot.opens || stale || open.sub.is_none() {
        if let Some(previous) = open.sub.take() {
            stats = commit_sub(group, &mut open.record, previous);
        }
        open.sub = Some(OpenSub {
            sub: slot.sub,
            occurrence: slot.occurrence,
            record: DecodedRecord::new(),
        });
    }

    if let Some(sub) = open.sub.as_mut() {
        set_field(&mut sub.record, field, value, outcome);
    }

    if slot.closes {
        if let Some(finished) = open.sub.take() {
            let closed = commit_sub(group, &mut open.record, finished);
            stats.committed += closed.committed;
            stats.discarded += closed.discarded;
        }
    }

    stats
}

fn set_field(record: &mut DecodedRecord, field: &str, value: CellValue, outcome: CodeOutcome) {
    if outcome == CodeOutcome::Substituted {
        record.set_substituted(field, value);
    } else {
        record.set(field, value);
    }
}

fn commit_sub(group: &GroupLayout, parent: &mut DecodedRecord, sub: OpenSub) -> AssemblyStats {
    let Some(layout) = group.subgroups.get(sub.sub) else {
        return AssemblyStats::default();
    };

    if layout.rule.admits(&sub.record, &[]) {
        parent.push(&layout.collection, sub.record);
        AssemblyStats {
            committed: 1,
            discarded: 0,
        }
    } else {
        AssemblyStats {
            committed: 0,
            discarded: 1,
        }
    }
}
