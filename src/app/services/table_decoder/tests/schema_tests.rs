//! Tests for schema construction and validation

use crate::app::models::TableFamily;
use crate::app::services::table_decoder::coders::Coder;
use crate::app::services::table_decoder::families::schema_for;
use crate::app::services::table_decoder::schema::{
    Binding, ColumnSchema, GroupLayout, NonEmptyRule, SubGroupLayout,
};
use crate::app::services::vocabulary::VocabularyId;
use crate::Error;

fn assert_schema_error(result: crate::Result<ColumnSchema>, needle: &str) {
    match result {
        Err(Error::SchemaDefinition { message, .. }) => {
            assert!(message.contains(needle), "unexpected message: {}", message)
        }
        Err(other) => panic!("expected schema definition error, got {:?}", other),
        Ok(_) => panic!("expected schema definition error containing '{}'", needle),
    }
}

#[test]
fn test_builder_defaults() {
    let schema = ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .column(2, "age", Coder::Int)
        .build()
        .unwrap();

    assert_eq!(schema.family(), "demo");
    assert_eq!(schema.header_rows(), 1);
    assert_eq!(schema.designator(), 0);
    assert_eq!(schema.width(), 3);
    assert_eq!(schema.slots().len(), 2);
    assert!(schema.groups().is_empty());
}

#[test]
fn test_duplicate_root_column_rejected() {
    let result = ColumnSchema::builder("demo")
        .column(1, "name", Coder::Text)
        .column(1, "kana", Coder::Text)
        .build();
    assert_schema_error(result, "column 1 is claimed by both");
}

#[test]
fn test_duplicate_group_id_rejected() {
    let result = ColumnSchema::builder("demo")
        .group(GroupLayout::new("g", "a", 1, 1, 2).field(0, "x", Coder::Text))
        .group(GroupLayout::new("g", "b", 3, 1, 2).field(0, "y", Coder::Text))
        .build();
    assert_schema_error(result, "group id 'g' is declared more than once");
}

#[test]
fn test_root_column_overlapping_group_rejected() {
    let result = ColumnSchema::builder("demo")
        .column(5, "memo", Coder::Text)
        .group(GroupLayout::new("contact", "contacts", 4, 2, 2).field(0, "name", Coder::Text))
        .build();
    assert_schema_error(result, "column 5 is claimed by both");
}

#[test]
fn test_overlapping_groups_rejected() {
    let result = ColumnSchema::builder("demo")
        .group(GroupLayout::new("a", "a_list", 1, 2, 3).field(0, "x", Coder::Text))
        .group(GroupLayout::new("b", "b_list", 5, 2, 1).field(0, "y", Coder::Text))
        .build();
    assert_schema_error(result, "column 5");
}

#[test]
fn test_group_offset_beyond_width_rejected() {
    let result = ColumnSchema::builder("demo")
        .group(GroupLayout::new("contact", "contacts", 1, 2, 2).field(2, "phone", Coder::Text))
        .build();
    assert_schema_error(result, "exceeds width 2");
}

#[test]
fn test_group_without_fields_rejected() {
    let result = ColumnSchema::builder("demo")
        .group(GroupLayout::new("contact", "contacts", 1, 2, 2))
        .build();
    assert_schema_error(result, "has no fields");

    let result = ColumnSchema::builder("demo")
        .group(GroupLayout::new("contact", "contacts", 1, 0, 2).field(0, "name", Coder::Text))
        .build();
    assert_schema_error(result, "non-zero width");
}

#[test]
fn test_discriminator_length_must_match_occurrences() {
    let result = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("stage", "stages", 1, 1, 3)
                .field(0, "notes", Coder::Text)
                .discriminator("kind", vec![1, 2]),
        )
        .build();
    assert_schema_error(result, "2 values for 3 occurrences");
}

#[test]
fn test_presence_rule_requires_flag_field() {
    let missing = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("stage", "stages", 1, 2, 1)
                .field(0, "notes", Coder::Text)
                .rule(NonEmptyRule::presence("present")),
        )
        .build();
    assert_schema_error(missing, "missing presence field 'present'");

    let not_flag = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("stage", "stages", 1, 2, 1)
                .field(0, "present", Coder::Text)
                .field(1, "notes", Coder::Text)
                .rule(NonEmptyRule::presence("present")),
        )
        .build();
    assert_schema_error(not_flag, "must use a flag coder");
}

#[test]
fn test_nested_list_coder_rejected() {
    let result = ColumnSchema::builder("demo")
        .column(0, "tags", Coder::multi(Coder::multi(Coder::Text)))
        .build();
    assert_schema_error(result, "nests a list coder");
}

#[test]
fn test_subgroup_must_fit_parent() {
    let result = ColumnSchema::builder("demo")
        .group(
            GroupLayout::new("history", "histories", 1, 4, 1)
                .field(0, "company", Coder::Text)
                .subgroup(SubGroupLayout::new("roles", 1, 2, 3).field(0, "role", Coder::Text)),
        )
        .build();
    assert_schema_error(result, "exceeds width 4");
}

#[test]
fn test_range_expands_to_append_slots() {
    let schema = ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .range(1, 3, "prefectures", Coder::code(VocabularyId::Prefecture))
        .build()
        .unwrap();

    let appended: Vec<usize> = schema
        .slots()
        .iter()
        .filter(|slot| slot.binding == Binding::RootAppend)
        .map(|slot| slot.column)
        .collect();
    assert_eq!(appended, vec![1, 2, 3]);
    assert!(schema.slots()[1..].iter().all(|slot| slot.field == "prefectures"));
}

#[test]
fn test_group_slots_mark_occurrence_boundaries() {
    let schema = ColumnSchema::builder("demo")
        .column(0, "name", Coder::Text)
        .group(
            GroupLayout::new("history", "histories", 1, 5, 2)
                .field(0, "company", Coder::Text)
                .field(4, "years", Coder::Int)
                .subgroup(
                    SubGroupLayout::new("roles", 1, 1, 3).field(0, "role", Coder::Text),
                ),
        )
        .build()
        .unwrap();

    assert_eq!(schema.width(), 11);

    let group_slots: Vec<_> = schema
        .slots()
        .iter()
        .filter_map(|slot| match slot.binding {
            Binding::Group(group_slot) => Some((slot.column, group_slot)),
            _ => None,
        })
        .collect();
    assert_eq!(group_slots.len(), 10);

    // First occurrence spans columns 1..6
    let (column, first) = group_slots[0];
    assert_eq!(column, 1);
    assert!(first.opens && !first.closes);
    assert_eq!(first.occurrence, 0);

    let (column, role) = group_slots[1];
    assert_eq!(column, 2);
    let sub = role.sub.unwrap();
    assert!(sub.opens && sub.closes);
    assert_eq!(sub.occurrence, 0);

    let (column, last) = group_slots[4];
    assert_eq!(column, 5);
    assert!(last.closes && !last.opens);

    let (column, second) = group_slots[5];
    assert_eq!(column, 6);
    assert!(second.opens);
    assert_eq!(second.occurrence, 1);
}

#[test]
fn test_every_family_schema_is_valid_and_ordered() {
    for &family in TableFamily::ALL {
        let schema = schema_for(family).unwrap();
        assert_eq!(schema.family(), family.name());
        assert!(
            schema.slots().windows(2).all(|pair| pair[0].column < pair[1].column),
            "{} slots are not strictly increasing",
            family
        );
        assert!(schema.header_rows() >= 1);
    }
}

#[test]
fn test_every_group_occurrence_opens_and_closes_once() {
    for &family in TableFamily::ALL {
        let schema = schema_for(family).unwrap();
        for (index, group) in schema.groups().iter().enumerate() {
            for occurrence in 0..group.occurrences {
                let slots: Vec<_> = schema
                    .slots()
                    .iter()
                    .filter_map(|slot| match slot.binding {
                        Binding::Group(group_slot)
                            if group_slot.group == index && group_slot.occurrence == occurrence =>
                        {
                            Some(group_slot)
                        }
                        _ => None,
                    })
                    .collect();
                assert_eq!(slots.iter().filter(|slot| slot.opens).count(), 1);
                assert_eq!(slots.iter().filter(|slot| slot.closes).count(), 1);
                assert!(slots.first().unwrap().opens);
                assert!(slots.last().unwrap().closes);
            }
        }
    }
}

#[test]
fn test_describe_lists_columns_and_groups() {
    let schema = schema_for(TableFamily::JobPosting).unwrap();
    let description = schema.describe();

    assert!(description.starts_with("job-posting: 40 columns, 2 header row(s)"));
    assert!(description.contains("group selection_interview -> selection_flows"));
    assert!(description.contains("rule presence(present)"));
    assert!(description.contains("[selection_interview#1"));
}
