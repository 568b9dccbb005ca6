//! Decoded values and untyped records
//!
//! A [`DecodedRecord`] is the schema-driven intermediate form of one row:
//! scalar fields addressed by dotted paths plus named collections of nested
//! records. Table families bind it to their typed aggregate through
//! [`DecodedRecord::to_json`].

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A typed cell value, possibly absent
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Not supplied or not decodable
    Absent,
    Text(String),
    Int(i64),
    /// Enumerated code resolved from a vocabulary
    Code(i32),
    Flag(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<CellValue>),
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Whether this value counts as "not filled in" for group commit rules
    ///
    /// Absent values, empty text, `false` flags and empty lists are default.
    /// Any parsed number, including zero, is a supplied value.
    pub fn is_default(&self) -> bool {
        match self {
            CellValue::Absent => true,
            CellValue::Text(text) => text.is_empty(),
            CellValue::Flag(flag) => !flag,
            CellValue::List(items) => items.iter().all(CellValue::is_default),
            CellValue::Int(_) | CellValue::Code(_) | CellValue::Date(_) | CellValue::DateTime(_) => {
                false
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(value) => Some(*value),
            CellValue::Code(code) => Some(i64::from(*code)),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            CellValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// JSON rendering used for typed binding
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Absent => Value::Null,
            CellValue::Text(text) => Value::String(text.clone()),
            CellValue::Int(value) => Value::from(*value),
            CellValue::Code(code) => Value::from(*code),
            CellValue::Flag(flag) => Value::Bool(*flag),
            CellValue::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            CellValue::DateTime(timestamp) => {
                Value::String(timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            CellValue::List(items) => Value::Array(items.iter().map(CellValue::to_json).collect()),
        }
    }
}

/// Schema-driven record for one row or one group occurrence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    fields: BTreeMap<String, CellValue>,
    collections: BTreeMap<String, Vec<DecodedRecord>>,
    /// Fields holding a fallback rather than a supplied value
    substituted: BTreeSet<String>,
}

impl DecodedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar field, replacing any previous value
    pub fn set(&mut self, path: &str, value: CellValue) {
        self.substituted.remove(path);
        self.fields.insert(path.to_string(), value);
    }

    /// Set a field to a fallback value; it renders like any other value
    /// but never counts as content for group commit rules
    pub fn set_substituted(&mut self, path: &str, value: CellValue) {
        self.fields.insert(path.to_string(), value);
        self.substituted.insert(path.to_string());
    }

    pub fn is_substituted(&self, path: &str) -> bool {
        self.substituted.contains(path)
    }

    /// Append a value to a list field; absent values are skipped
    pub fn append(&mut self, path: &str, value: CellValue) {
        let slot = self
            .fields
            .entry(path.to_string())
            .or_insert_with(|| CellValue::List(Vec::new()));

        if !matches!(slot, CellValue::List(_)) {
            *slot = CellValue::List(Vec::new());
        }

        if let CellValue::List(items) = slot {
            match value {
                CellValue::Absent => {}
                CellValue::List(values) => items.extend(values),
                other => items.push(other),
            }
        }
    }

    /// Append a committed sub-record to a collection
    pub fn push(&mut self, collection: &str, record: DecodedRecord) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    pub fn get(&self, path: &str) -> Option<&CellValue> {
        self.fields.get(path)
    }

    /// Committed sub-records of a collection
    pub fn collection(&self, name: &str) -> &[DecodedRecord] {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether anything other than `ignored` fields carries a supplied value
    ///
    /// Substituted fallback values are treated as default.
    pub fn has_content(&self, ignored: &[&str]) -> bool {
        let has_field = self
            .fields
            .iter()
            .filter(|(path, _)| !ignored.contains(&path.as_str()))
            .filter(|(path, _)| !self.substituted.contains(path.as_str()))
            .any(|(_, value)| !value.is_default());

        has_field || self.collections.values().any(|records| !records.is_empty())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Render as nested JSON; dotted paths become nested objects
    ///
    /// Absent fields are left out so typed binding falls back to defaults.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();

        for (path, value) in self.fields.iter().filter(|(_, value)| !value.is_absent()) {
            insert_path(&mut root, path, value.to_json());
        }

        for (path, records) in &self.collections {
            let items = records.iter().map(DecodedRecord::to_json).collect();
            insert_path(&mut root, path, Value::Array(items));
        }

        Value::Object(root)
    }
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }

        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !next.is_object() {
            *next = Value::Object(Map::new());
        }
        current = match next {
            Value::Object(map) => map,
            _ => return,
        };
    }
}
