//! Declarative column schemas
//!
//! A [`ColumnSchema`] describes one fixed spreadsheet layout as data:
//! root columns written straight onto the aggregate, contiguous ranges
//! appended to a list field, and repeat-groups whose occurrences are
//! assembled into sub-records. The builder expands repeat-groups into
//! per-column [`Slot`]s and rejects layouts whose columns collide.

use super::coders::Coder;
use super::record::DecodedRecord;
use crate::{Error, Result};
use std::fmt::{self, Write as _};

/// Policy deciding whether an assembled occurrence is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonEmptyRule {
    /// Structurally mandatory: committed even when every field is empty
    Always,
    /// Committed when at least one field (discriminator excluded) is non-default
    AnyField,
    /// Committed only when `field` decoded to the literal presence marker
    PresenceFlag { field: String },
}

impl NonEmptyRule {
    pub fn presence(field: impl Into<String>) -> Self {
        NonEmptyRule::PresenceFlag {
            field: field.into(),
        }
    }

    /// Evaluate the rule against an assembled occurrence
    pub fn admits(&self, record: &DecodedRecord, ignored: &[&str]) -> bool {
        match self {
            NonEmptyRule::Always => true,
            NonEmptyRule::AnyField => record.has_content(ignored),
            NonEmptyRule::PresenceFlag { field } => {
                record.get(field).and_then(|value| value.as_flag()) == Some(true)
            }
        }
    }
}

impl fmt::Display for NonEmptyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonEmptyRule::Always => write!(f, "always"),
            NonEmptyRule::AnyField => write!(f, "any-field"),
            NonEmptyRule::PresenceFlag { field } => write!(f, "presence({})", field),
        }
    }
}

/// One field of a group occurrence, relative to the occurrence start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub offset: usize,
    pub field: String,
    pub coder: Coder,
}

impl FieldSpec {
    pub fn new(offset: usize, field: impl Into<String>, coder: Coder) -> Self {
        Self {
            offset,
            field: field.into(),
            coder,
        }
    }
}

/// Per-occurrence constant written into every occurrence of a group
///
/// Replaces code that differs between occurrences only by a type constant
/// (e.g. the selection type of each selection-flow stage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
    pub field: String,
    pub values: Vec<i64>,
}

/// Micro-group nested inside each occurrence of a parent group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGroupLayout {
    /// List field on the parent occurrence receiving committed entries
    pub collection: String,
    /// First column relative to the parent occurrence start
    pub offset: usize,
    pub width: usize,
    pub occurrences: usize,
    pub fields: Vec<FieldSpec>,
    pub rule: NonEmptyRule,
}

impl SubGroupLayout {
    pub fn new(collection: impl Into<String>, offset: usize, width: usize, occurrences: usize) -> Self {
        Self {
            collection: collection.into(),
            offset,
            width,
            occurrences,
            fields: Vec::new(),
            rule: NonEmptyRule::AnyField,
        }
    }

    pub fn field(mut self, offset: usize, field: impl Into<String>, coder: Coder) -> Self {
        self.fields.push(FieldSpec::new(offset, field, coder));
        self
    }

    pub fn rule(mut self, rule: NonEmptyRule) -> Self {
        self.rule = rule;
        self
    }

    /// Columns spanned inside the parent occurrence
    pub fn span(&self) -> usize {
        self.width * self.occurrences
    }
}

/// A repeat-group: `occurrences` contiguous blocks of `width` columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLayout {
    pub id: String,
    /// Collection on the aggregate receiving committed occurrences
    pub collection: String,
    pub start: usize,
    pub width: usize,
    pub occurrences: usize,
    pub fields: Vec<FieldSpec>,
    pub subgroups: Vec<SubGroupLayout>,
    pub rule: NonEmptyRule,
    pub discriminator: Option<Discriminator>,
}

impl GroupLayout {
    pub fn new(
        id: impl Into<String>,
        collection: impl Into<String>,
        start: usize,
        width: usize,
        occurrences: usize,
    ) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            start,
            width,
            occurrences,
            fields: Vec::new(),
            subgroups: Vec::new(),
            rule: NonEmptyRule::AnyField,
            discriminator: None,
        }
    }

    pub fn field(mut self, offset: usize, field: impl Into<String>, coder: Coder) -> Self {
        self.fields.push(FieldSpec::new(offset, field, coder));
        self
    }

    pub fn subgroup(mut self, subgroup: SubGroupLayout) -> Self {
        self.subgroups.push(subgroup);
        self
    }

    pub fn rule(mut self, rule: NonEmptyRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn discriminator(mut self, field: impl Into<String>, values: Vec<i64>) -> Self {
        self.discriminator = Some(Discriminator {
            field: field.into(),
            values,
        });
        self
    }

    /// One past the last column of the group
    pub fn end(&self) -> usize {
        self.start + self.width * self.occurrences
    }

    /// Discriminator value for an occurrence
    pub fn discriminator_value(&self, occurrence: usize) -> Option<(&str, i64)> {
        self.discriminator.as_ref().and_then(|discriminator| {
            discriminator
                .values
                .get(occurrence)
                .map(|value| (discriminator.field.as_str(), *value))
        })
    }
}

/// Slot position inside a micro-group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubSlot {
    pub sub: usize,
    pub occurrence: usize,
    pub opens: bool,
    pub closes: bool,
}

/// Slot position inside a repeat-group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSlot {
    /// Index into [`ColumnSchema::groups`]
    pub group: usize,
    pub occurrence: usize,
    /// First slot of the occurrence: a fresh buffer is opened
    pub opens: bool,
    /// Closing slot of the occurrence: the non-empty rule is evaluated
    pub closes: bool,
    pub sub: Option<SubSlot>,
}

/// Where a slot's value goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Written directly onto the aggregate
    Root,
    /// Appended to a list field on the aggregate ("up to N of this field")
    RootAppend,
    /// Handed to the group assembler
    Group(GroupSlot),
}

/// One column of the layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub column: usize,
    pub field: String,
    pub coder: Coder,
    pub binding: Binding,
}

/// Declarative description of one tabular layout
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    family: String,
    header_rows: usize,
    designator: usize,
    slots: Vec<Slot>,
    groups: Vec<GroupLayout>,
}

impl ColumnSchema {
    pub fn builder(family: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(family)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Leading rows discarded before decoding
    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    /// Column whose emptiness drives the blank-row sentinel
    pub fn designator(&self) -> usize {
        self.designator
    }

    /// Slots in strictly increasing column order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn groups(&self) -> &[GroupLayout] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&GroupLayout> {
        self.groups.get(index)
    }

    /// Number of columns a complete row carries
    pub fn width(&self) -> usize {
        self.slots
            .last()
            .map(|slot| slot.column + 1)
            .unwrap_or(0)
            .max(self.designator + 1)
    }

    /// Human-readable layout listing
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {} columns, {} header row(s), designator column {}",
            self.family,
            self.width(),
            self.header_rows,
            self.designator
        );

        for slot in &self.slots {
            let binding = match slot.binding {
                Binding::Root => String::new(),
                Binding::RootAppend => "  [append]".to_string(),
                Binding::Group(group_slot) => {
                    let group = &self.groups[group_slot.group];
                    let mut text = format!("  [{}#{}", group.id, group_slot.occurrence + 1);
                    if let Some(sub) = group_slot.sub {
                        let _ = write!(
                            text,
                            " {}#{}",
                            group.subgroups[sub.sub].collection,
                            sub.occurrence + 1
                        );
                    }
                    if group_slot.closes {
                        text.push_str(" closes");
                    }
                    text.push(']');
                    text
                }
            };
            let _ = writeln!(
                out,
                "{:>4}  {:<36} {}{}",
                slot.column, slot.field, slot.coder, binding
            );
        }

        for group in &self.groups {
            let _ = writeln!(
                out,
                "group {} -> {}: columns {}..{}, {} x {} columns, rule {}",
                group.id,
                group.collection,
                group.start,
                group.end(),
                group.occurrences,
                group.width,
                group.rule
            );
        }

        out
    }
}

/// Builder validating and expanding a [`ColumnSchema`]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    family: String,
    header_rows: usize,
    designator: usize,
    roots: Vec<Slot>,
    groups: Vec<GroupLayout>,
}

impl SchemaBuilder {
    fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            header_rows: 1,
            designator: crate::constants::DEFAULT_DESIGNATOR_COLUMN,
            roots: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    pub fn designator(mut self, column: usize) -> Self {
        self.designator = column;
        self
    }

    /// A column written directly onto the aggregate
    pub fn column(mut self, column: usize, field: impl Into<String>, coder: Coder) -> Self {
        self.roots.push(Slot {
            column,
            field: field.into(),
            coder,
            binding: Binding::Root,
        });
        self
    }

    /// `count` contiguous columns appended to one list field
    pub fn range(mut self, start: usize, count: usize, field: impl Into<String>, coder: Coder) -> Self {
        let field = field.into();
        for column in start..start + count {
            self.roots.push(Slot {
                column,
                field: field.clone(),
                coder: coder.clone(),
                binding: Binding::RootAppend,
            });
        }
        self
    }

    pub fn group(mut self, group: GroupLayout) -> Self {
        self.groups.push(group);
        self
    }

    /// Validate the layout and expand repeat-groups into slots
    pub fn build(self) -> Result<ColumnSchema> {
        let mut slots = self.roots;

        for slot in &slots {
            check_coder(&self.family, &slot.field, &slot.coder)?;
        }

        for (index, group) in self.groups.iter().enumerate() {
            if self.groups[..index].iter().any(|earlier| earlier.id == group.id) {
                return Err(Error::schema_definition(
                    &self.family,
                    format!("group id '{}' is declared more than once", group.id),
                ));
            }
            validate_group(&self.family, group)?;
            slots.extend(expand_group(index, group));
        }

        slots.sort_by_key(|slot| slot.column);
        for pair in slots.windows(2) {
            if pair[0].column == pair[1].column {
                return Err(Error::schema_definition(
                    &self.family,
                    format!(
                        "column {} is claimed by both '{}' and '{}'",
                        pair[0].column, pair[0].field, pair[1].field
                    ),
                ));
            }
        }

        Ok(ColumnSchema {
            family: self.family,
            header_rows: self.header_rows,
            designator: self.designator,
            slots,
            groups: self.groups,
        })
    }
}

fn check_coder(family: &str, field: &str, coder: &Coder) -> Result<()> {
    if let Coder::Multi(inner) = coder {
        if matches!(inner.as_ref(), Coder::Multi(_)) {
            return Err(Error::schema_definition(
                family,
                format!("field '{}' nests a list coder inside a list coder", field),
            ));
        }
    }
    Ok(())
}

fn check_presence_field(family: &str, owner: &str, rule: &NonEmptyRule, fields: &[FieldSpec]) -> Result<()> {
    if let NonEmptyRule::PresenceFlag { field } = rule {
        let flag = fields
            .iter()
            .find(|spec| &spec.field == field)
            .ok_or_else(|| {
                Error::schema_definition(
                    family,
                    format!("{} gates on missing presence field '{}'", owner, field),
                )
            })?;
        if !matches!(flag.coder, Coder::Flag { .. }) {
            return Err(Error::schema_definition(
                family,
                format!("{} presence field '{}' must use a flag coder", owner, field),
            ));
        }
    }
    Ok(())
}

fn validate_group(family: &str, group: &GroupLayout) -> Result<()> {
    let fail = |message: String| Err(Error::schema_definition(family, message));

    if group.width == 0 || group.occurrences == 0 {
        return fail(format!("group '{}' needs a non-zero width and occurrence count", group.id));
    }
    if group.fields.is_empty() && group.subgroups.is_empty() {
        return fail(format!("group '{}' has no fields", group.id));
    }

    let mut claimed = vec![false; group.width];
    let mut claim = |offset: usize, field: &str| -> Result<()> {
        match claimed.get_mut(offset) {
            Some(taken) if !*taken => {
                *taken = true;
                Ok(())
            }
            Some(_) => Err(Error::schema_definition(
                family,
                format!("group '{}' offset {} is claimed twice ('{}')", group.id, offset, field),
            )),
            None => Err(Error::schema_definition(
                family,
                format!(
                    "group '{}' field '{}' at offset {} exceeds width {}",
                    group.id, field, offset, group.width
                ),
            )),
        }
    };

    for spec in &group.fields {
        check_coder(family, &spec.field, &spec.coder)?;
        claim(spec.offset, &spec.field)?;
    }

    for sub in &group.subgroups {
        if sub.width == 0 || sub.occurrences == 0 || sub.fields.is_empty() {
            return fail(format!(
                "group '{}' subgroup '{}' needs fields, width and occurrences",
                group.id, sub.collection
            ));
        }
        for spec in &sub.fields {
            if spec.offset >= sub.width {
                return fail(format!(
                    "group '{}' subgroup '{}' field '{}' exceeds width {}",
                    group.id, sub.collection, spec.field, sub.width
                ));
            }
            check_coder(family, &spec.field, &spec.coder)?;
            for occurrence in 0..sub.occurrences {
                claim(sub.offset + occurrence * sub.width + spec.offset, &spec.field)?;
            }
        }
        check_presence_field(
            family,
            &format!("subgroup '{}'", sub.collection),
            &sub.rule,
            &sub.fields,
        )?;
    }

    check_presence_field(family, &format!("group '{}'", group.id), &group.rule, &group.fields)?;

    if let Some(discriminator) = &group.discriminator {
        if discriminator.values.len() != group.occurrences {
            return fail(format!(
                "group '{}' discriminator has {} values for {} occurrences",
                group.id,
                discriminator.values.len(),
                group.occurrences
            ));
        }
    }

    Ok(())
}

fn expand_group(index: usize, group: &GroupLayout) -> Vec<Slot> {
    let mut slots = Vec::new();

    for occurrence in 0..group.occurrences {
        let base = group.start + occurrence * group.width;
        let mut block: Vec<Slot> = Vec::new();

        for spec in &group.fields {
            block.push(Slot {
                column: base + spec.offset,
                field: spec.field.clone(),
                coder: spec.coder.clone(),
                binding: Binding::Group(GroupSlot {
                    group: index,
                    occurrence,
                    opens: false,
                    closes: false,
                    sub: None,
                }),
            });
        }

        for (sub_index, sub) in group.subgroups.iter().enumerate() {
            for sub_occurrence in 0..sub.occurrences {
                let sub_base = base + sub.offset + sub_occurrence * sub.width;
                let mut sub_block: Vec<Slot> = sub
                    .fields
                    .iter()
                    .map(|spec| Slot {
                        column: sub_base + spec.offset,
                        field: spec.field.clone(),
                        coder: spec.coder.clone(),
                        binding: Binding::Group(GroupSlot {
                            group: index,
                            occurrence,
                            opens: false,
                            closes: false,
                            sub: Some(SubSlot {
                                sub: sub_index,
                                occurrence: sub_occurrence,
                                opens: false,
                                closes: false,
                            }),
                        }),
                    })
                    .collect();

                sub_block.sort_by_key(|slot| slot.column);
                let last = sub_block.len() - 1;
                for (position, slot) in sub_block.iter_mut().enumerate() {
                    if let Binding::Group(GroupSlot { sub: Some(sub_slot), .. }) = &mut slot.binding {
                        sub_slot.opens = position == 0;
                        sub_slot.closes = position == last;
                    }
                }
                block.extend(sub_block);
            }
        }

        block.sort_by_key(|slot| slot.column);
        let last = block.len() - 1;
        for (position, slot) in block.iter_mut().enumerate() {
            if let Binding::Group(group_slot) = &mut slot.binding {
                group_slot.opens = position == 0;
                group_slot.closes = position == last;
            }
        }
        slots.extend(block);
    }

    slots
}
