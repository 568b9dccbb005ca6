//! Tests for repeat-group assembly

use super::{cells, context, decoded_at};
use crate::app::services::table_decoder::assembler::{AssemblyStats, GroupAssembler};
use crate::app::services::table_decoder::coders::{CodeOutcome, Coder};
use crate::app::services::table_decoder::record::{CellValue, DecodedRecord};
use crate::app::services::table_decoder::row_decoder::RowDecoder;
use crate::app::services::table_decoder::row_source::Row;
use crate::app::services::table_decoder::schema::{
    Binding, ColumnSchema, GroupLayout, NonEmptyRule, SubGroupLayout,
};
use crate::app::services::vocabulary::VocabularyId;
use crate::config::DateFallback;
use std::collections::HashMap;

/// Feed every group slot of `schema` with the value supplied for its column
fn assemble(schema: &ColumnSchema, values: &[(usize, CellValue)]) -> (DecodedRecord, AssemblyStats) {
    let values: HashMap<usize, CellValue> = values.iter().cloned().collect();
    let mut parent = DecodedRecord::new();
    let mut assembler = GroupAssembler::new(schema);

    for slot in schema.slots() {
        if let Binding::Group(group_slot) = slot.binding {
            let value = values.get(&slot.column).cloned().unwrap_or(CellValue::Absent);
            assembler.accept(&group_slot, &slot.field, value, CodeOutcome::Valid, &mut parent);
        }
    }
    assembler.finish(&mut parent);
    (parent, assembler.stats())
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn contacts_schema() -> ColumnSchema {
    ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .group(
            GroupLayout::new("contact", "contacts", 1, 2, 3)
                .field(0, "name", Coder::Text)
                .field(1, "extension", Coder::Int),
        )
        .build()
        .unwrap()
}

#[test]
fn test_empty_occurrences_are_discarded() {
    let schema = contacts_schema();
    let (record, stats) = assemble(&schema, &[(1, text("佐藤")), (5, text("鈴木"))]);

    let contacts = record.collection("contacts");
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].get("name"), Some(&text("佐藤")));
    assert_eq!(contacts[1].get("name"), Some(&text("鈴木")));
    assert_eq!(stats, AssemblyStats { committed: 2, discarded: 1 });
}

#[test]
fn test_explicit_zero_is_a_supplied_value() {
    let schema = contacts_schema();
    let (record, stats) = assemble(&schema, &[(4, CellValue::Int(0))]);

    let contacts = record.collection("contacts");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].get("extension"), Some(&CellValue::Int(0)));
    assert_eq!(stats.committed, 1);
}

#[test]
fn test_all_empty_row_commits_nothing() {
    let schema = contacts_schema();
    let (record, stats) = assemble(&schema, &[]);

    assert!(record.collection("contacts").is_empty());
    assert_eq!(stats, AssemblyStats { committed: 0, discarded: 3 });
}

#[test]
fn test_always_rule_commits_exactly_once() {
    let schema = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("document", "stages", 1, 2, 1)
                .field(0, "method", Coder::Text)
                .field(1, "notes", Coder::Text)
                .rule(NonEmptyRule::Always)
                .discriminator("selection_type", vec![1]),
        )
        .build()
        .unwrap();

    let (record, stats) = assemble(&schema, &[]);
    let stages = record.collection("stages");
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].get("selection_type"), Some(&CellValue::Int(1)));
    assert_eq!(stats.committed, 1);
}

#[test]
fn test_discriminator_alone_does_not_commit() {
    let schema = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("stage", "stages", 1, 1, 3)
                .field(0, "notes", Coder::Text)
                .discriminator("selection_type", vec![2, 3, 4]),
        )
        .build()
        .unwrap();

    let (record, _) = assemble(&schema, &[(2, text("役員面接"))]);
    let stages = record.collection("stages");
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].get("selection_type"), Some(&CellValue::Int(3)));
    assert_eq!(stages[0].get("notes"), Some(&text("役員面接")));
}

#[test]
fn test_presence_flag_gates_commit() {
    let schema = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("interview", "stages", 1, 2, 3)
                .field(0, "present", Coder::presence())
                .field(1, "notes", Coder::Text)
                .rule(NonEmptyRule::presence("present"))
                .discriminator("selection_type", vec![2, 3, 4]),
        )
        .build()
        .unwrap();

    let (record, stats) = assemble(
        &schema,
        &[
            (1, CellValue::Flag(false)),
            (2, text("notes without the marker")),
            (3, CellValue::Flag(true)),
            (6, text("no flag column")),
        ],
    );

    let stages = record.collection("stages");
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].get("selection_type"), Some(&CellValue::Int(3)));
    assert_eq!(stats, AssemblyStats { committed: 1, discarded: 2 });
}

#[test]
fn test_subgroups_commit_into_parent_occurrence() {
    let schema = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("history", "histories", 1, 5, 2)
                .field(0, "company", Coder::Text)
                .subgroup(
                    SubGroupLayout::new("roles", 1, 2, 2)
                        .field(0, "role", Coder::Text)
                        .field(1, "years", Coder::Int),
                ),
        )
        .build()
        .unwrap();

    let (record, stats) = assemble(
        &schema,
        &[
            (1, text("A社")),
            (2, text("営業")),
            (3, CellValue::Int(3)),
            (5, CellValue::Int(0)),
        ],
    );

    let histories = record.collection("histories");
    assert_eq!(histories.len(), 1);
    let roles = histories[0].collection("roles");
    assert_eq!(roles.len(), 2);
    assert_eq!(roles[0].get("role"), Some(&text("営業")));
    assert_eq!(roles[1].get("years"), Some(&CellValue::Int(0)));

    // Two committed roles, one committed history; two empty roles and one empty history discarded
    assert_eq!(stats, AssemblyStats { committed: 3, discarded: 3 });
}

#[test]
fn test_subgroup_content_keeps_parent_occurrence() {
    let schema = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("history", "histories", 1, 3, 1)
                .field(0, "company", Coder::Text)
                .subgroup(SubGroupLayout::new("roles", 1, 1, 2).field(0, "role", Coder::Text)),
        )
        .build()
        .unwrap();

    let (record, _) = assemble(&schema, &[(3, text("経理"))]);
    let histories = record.collection("histories");
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].get("company"), Some(&CellValue::Absent));
    assert_eq!(histories[0].collection("roles").len(), 1);
}

#[test]
fn test_groups_sharing_a_collection_keep_column_order() {
    let schema = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("document", "stages", 1, 1, 1)
                .field(0, "notes", Coder::Text)
                .rule(NonEmptyRule::Always)
                .discriminator("selection_type", vec![1]),
        )
        .group(
            GroupLayout::new("interview", "stages", 2, 1, 2)
                .field(0, "notes", Coder::Text)
                .discriminator("selection_type", vec![2, 3]),
        )
        .build()
        .unwrap();

    let (record, _) = assemble(&schema, &[(3, text("最終面接"))]);
    let types: Vec<_> = record
        .collection("stages")
        .iter()
        .map(|stage| stage.get("selection_type").cloned())
        .collect();
    assert_eq!(types, vec![Some(CellValue::Int(1)), Some(CellValue::Int(3))]);
}

#[test]
fn test_finish_commits_unclosed_occurrence() {
    let schema = contacts_schema();
    let group_slot = schema
        .slots()
        .iter()
        .find_map(|slot| match slot.binding {
            Binding::Group(group_slot) if slot.column == 1 => Some(group_slot),
            _ => None,
        })
        .unwrap();

    let mut parent = DecodedRecord::new();
    let mut assembler = GroupAssembler::new(&schema);
    assembler.accept(&group_slot, "name", text("高橋"), CodeOutcome::Valid, &mut parent);
    assert!(parent.collection("contacts").is_empty());

    assembler.finish(&mut parent);
    assert_eq!(parent.collection("contacts").len(), 1);
}

/// Contacts with a person and an audit timestamp, two occurrences
fn audited_contacts_schema() -> ColumnSchema {
    ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .group(
            GroupLayout::new("contact", "contacts", 1, 2, 2)
                .field(0, "person", Coder::Text)
                .field(1, "updated_at", Coder::timestamp()),
        )
        .build()
        .unwrap()
}

#[test]
fn test_blank_timestamp_does_not_commit_occurrence() {
    let schema = audited_contacts_schema();
    let decoder = RowDecoder::new(&schema, context());

    let (record, report) = decoder.decode_record(&Row::new(2, cells(&["A社", "", "", "", ""])));
    assert!(record.collection("contacts").is_empty());
    assert_eq!(report.assembly, AssemblyStats { committed: 0, discarded: 2 });
    assert_eq!(report.substituted_timestamps, 0);
}

#[test]
fn test_substituted_timestamp_does_not_commit_occurrence() {
    let schema = audited_contacts_schema();
    let decoder = RowDecoder::new(&schema, context());

    let (record, report) =
        decoder.decode_record(&Row::new(2, cells(&["A社", "", "不明", "佐藤", "不明"])));
    assert_eq!(report.substituted_timestamps, 2);
    assert_eq!(report.assembly, AssemblyStats { committed: 1, discarded: 1 });

    // The committed occurrence still carries the fallback time
    let contacts = record.collection("contacts");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].get("person"), Some(&text("佐藤")));
    assert_eq!(contacts[0].get("updated_at"), Some(&CellValue::DateTime(decoded_at())));
}

#[test]
fn test_blank_occurrence_is_discarded_for_every_coder_kind() {
    let schema = ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .group(
            GroupLayout::new("entry", "entries", 1, 8, 2)
                .field(0, "text", Coder::Text)
                .field(1, "count", Coder::Int)
                .field(2, "years", Coder::clamped(4, 5))
                .field(3, "prefecture", Coder::code(VocabularyId::Prefecture))
                .field(4, "present", Coder::presence())
                .field(5, "born_on", Coder::date())
                .field(6, "updated_at", Coder::timestamp())
                .field(7, "licenses", Coder::multi_code(VocabularyId::License)),
        )
        .build()
        .unwrap();

    let blank = cells(&["A社", "", " ", "", "\u{3000}", "", "", "", " , "]);
    for fallback in [DateFallback::Now, DateFallback::Absent] {
        let decoder = RowDecoder::new(&schema, context().with_date_fallback(fallback));

        let (record, report) = decoder.decode_record(&Row::new(2, blank.clone()));
        assert!(record.collection("entries").is_empty(), "{:?}", fallback);
        assert_eq!(report.assembly, AssemblyStats { committed: 0, discarded: 2 });
        assert_eq!(report.invalid_cells, 0);
        assert_eq!(report.substituted_timestamps, 0);
    }
}

#[test]
fn test_single_supplied_value_commits_for_every_coder_kind() {
    let schema = ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .group(
            GroupLayout::new("entry", "entries", 1, 8, 1)
                .field(0, "text", Coder::Text)
                .field(1, "count", Coder::Int)
                .field(2, "years", Coder::clamped(4, 5))
                .field(3, "prefecture", Coder::code(VocabularyId::Prefecture))
                .field(4, "present", Coder::presence())
                .field(5, "born_on", Coder::date())
                .field(6, "updated_at", Coder::timestamp())
                .field(7, "licenses", Coder::multi_code(VocabularyId::License)),
        )
        .build()
        .unwrap();
    let decoder = RowDecoder::new(&schema, context());

    let supplied = [
        (1, "メモ"),
        (2, "0"),
        (3, "7"),
        (4, "東京都"),
        (5, "有"),
        (6, "1990/04/01"),
        (7, "2024/05/20 14:05:09"),
        (8, "普通免許"),
    ];
    for (column, value) in supplied {
        let mut row = cells(&["A社", "", "", "", "", "", "", "", ""]);
        row[column] = value.to_string();

        let (record, report) = decoder.decode_record(&Row::new(2, row));
        assert_eq!(record.collection("entries").len(), 1, "column {}", column);
        assert_eq!(report.assembly.committed, 1);
    }
}
