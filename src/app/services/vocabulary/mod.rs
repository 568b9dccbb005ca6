//! Enumerated business vocabularies
//!
//! Spreadsheet exports carry labels ("東京都", "社会人経験", "ITエンジニア"),
//! the platform stores stable integer codes. Each [`Vocabulary`] is a static
//! bidirectional mapping between the two, shipped and versioned with the
//! decoder.
//!
//! Lookups are tolerant of the spelling noise spreadsheet tools introduce:
//! surrounding (full-width) whitespace, full-width ASCII letters and digits,
//! and ASCII case. Anything else is an unrecognized label and resolves to
//! `None`, never to a default code.

pub mod tables;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tables::VocabEntry;
use tracing::debug;

/// Identifier of a shipped vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyId {
    Prefecture,
    Industry,
    Occupation,
    License,
    EmploymentType,
    WorkExperience,
    Gender,
    Education,
    Language,
    LanguageLevel,
}

impl VocabularyId {
    /// Every shipped vocabulary, in display order
    pub const ALL: &'static [VocabularyId] = &[
        VocabularyId::Prefecture,
        VocabularyId::Industry,
        VocabularyId::Occupation,
        VocabularyId::License,
        VocabularyId::EmploymentType,
        VocabularyId::WorkExperience,
        VocabularyId::Gender,
        VocabularyId::Education,
        VocabularyId::Language,
        VocabularyId::LanguageLevel,
    ];

    /// Stable snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            VocabularyId::Prefecture => "prefecture",
            VocabularyId::Industry => "industry",
            VocabularyId::Occupation => "occupation",
            VocabularyId::License => "license",
            VocabularyId::EmploymentType => "employment_type",
            VocabularyId::WorkExperience => "work_experience",
            VocabularyId::Gender => "gender",
            VocabularyId::Education => "education",
            VocabularyId::Language => "language",
            VocabularyId::LanguageLevel => "language_level",
        }
    }

    fn entries(&self) -> &'static [VocabEntry] {
        match self {
            VocabularyId::Prefecture => tables::PREFECTURES,
            VocabularyId::Industry => tables::INDUSTRIES,
            VocabularyId::Occupation => tables::OCCUPATIONS,
            VocabularyId::License => tables::LICENSES,
            VocabularyId::EmploymentType => tables::EMPLOYMENT_TYPES,
            VocabularyId::WorkExperience => tables::WORK_EXPERIENCE,
            VocabularyId::Gender => tables::GENDERS,
            VocabularyId::Education => tables::EDUCATION,
            VocabularyId::Language => tables::LANGUAGES,
            VocabularyId::LanguageLevel => tables::LANGUAGE_LEVELS,
        }
    }
}

impl fmt::Display for VocabularyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VocabularyId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        VocabularyId::ALL
            .iter()
            .copied()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| Error::unknown_vocabulary(s))
    }
}

/// Normalize a label for lookup
///
/// Trims ASCII and ideographic whitespace, folds full-width ASCII
/// (U+FF01..U+FF5E) to half-width and lowercases ASCII letters.
pub fn normalize_label(label: &str) -> String {
    label
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{3000}')
        .chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
            }
            '\u{3000}' => ' ',
            _ => c,
        })
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A static bidirectional label/code mapping
#[derive(Debug, Clone)]
pub struct Vocabulary {
    id: VocabularyId,
    entries: &'static [VocabEntry],
    by_label: HashMap<String, i32>,
}

impl Vocabulary {
    /// Build the lookup index for one shipped table
    pub fn new(id: VocabularyId) -> Self {
        let entries = id.entries();
        let mut by_label = HashMap::with_capacity(entries.len() * 2);

        for entry in entries {
            for label in std::iter::once(&entry.label).chain(entry.aliases.iter()) {
                let key = normalize_label(label);
                if let Some(existing) = by_label.get(&key) {
                    debug!(
                        "Vocabulary {}: label '{}' already mapped to {}, ignoring code {}",
                        id, label, existing, entry.code
                    );
                    continue;
                }
                by_label.insert(key, entry.code);
            }
        }

        Self {
            id,
            entries,
            by_label,
        }
    }

    /// Identifier of this vocabulary
    pub fn id(&self) -> VocabularyId {
        self.id
    }

    /// Resolve a spreadsheet label to its code
    pub fn code_of(&self, label: &str) -> Option<i32> {
        self.by_label.get(&normalize_label(label)).copied()
    }

    /// Resolve a code back to its canonical label
    pub fn label_of(&self, code: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.label)
    }

    /// Canonical entries in table order
    pub fn entries(&self) -> &'static [VocabEntry] {
        self.entries
    }

    /// Number of canonical entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All shipped vocabularies, indexed by id
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    tables: HashMap<VocabularyId, Vocabulary>,
}

static BUILTIN: LazyLock<VocabularyRegistry> = LazyLock::new(VocabularyRegistry::new);

impl VocabularyRegistry {
    /// Build every shipped vocabulary
    pub fn new() -> Self {
        let tables = VocabularyId::ALL
            .iter()
            .map(|&id| (id, Vocabulary::new(id)))
            .collect();
        Self { tables }
    }

    /// Process-wide registry of the shipped tables
    pub fn builtin() -> &'static VocabularyRegistry {
        &BUILTIN
    }

    /// Look up a vocabulary by id
    pub fn get(&self, id: VocabularyId) -> &Vocabulary {
        // every id is inserted by `new`
        &self.tables[&id]
    }

    /// Resolve a label in the named vocabulary
    pub fn code_of(&self, id: VocabularyId, label: &str) -> Option<i32> {
        self.get(id).code_of(label)
    }

    /// Resolve a code in the named vocabulary
    pub fn label_of(&self, id: VocabularyId, code: i32) -> Option<&'static str> {
        self.get(id).label_of(code)
    }
}

impl Default for VocabularyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
