//! # Chord/Scale Catalog
//!
//! Named chord and scale types, each an ordered list of semitone offsets from the
//! root. Chords and scales live in one table so lookup is uniform; every entry is
//! tagged with its [`ChordKind`] so a front end can still list them separately.
//!
//! ## Lookup rules
//! - [`ChordCatalog::lookup_kind`] matches name and kind exactly.
//! - [`ChordCatalog::lookup`] returns the first entry with that name in catalog
//!   order. Chords are stored before scales, so "Major" resolves to the triad.

use std::fmt;

use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TheoryError, TheoryResult};
use crate::interval::IntervalCatalog;
use crate::pitch::{PitchClass, SEMITONES};

/// Built-in chord types in display order.
pub const DEFAULT_CHORDS: [(&str, &[u8]); 7] = [
    ("Major", &[0, 4, 7]),
    ("Minor", &[0, 3, 7]),
    ("Major 7", &[0, 4, 7, 11]),
    ("Minor 7", &[0, 3, 7, 10]),
    ("Dominant 7", &[0, 4, 7, 10]),
    ("Dim7", &[0, 3, 6, 9]),
    ("Minor7b5", &[0, 3, 6, 10]),
];

/// Built-in scale types in display order.
pub const DEFAULT_SCALES: [(&str, &[u8]); 5] = [
    ("Major", &[0, 2, 4, 5, 7, 9, 11]),
    ("Minor", &[0, 2, 3, 5, 7, 8, 10]),
    ("MinorHarmonic", &[0, 2, 3, 5, 7, 8, 11]),
    ("MajorBlues", &[0, 2, 3, 4, 7, 9]),
    ("MinorBlues", &[0, 3, 5, 6, 7, 10]),
];

static DEFAULT_CATALOG: Lazy<ChordCatalog> = Lazy::new(|| {
    let mut types = builtin_types(ChordKind::Chord, &DEFAULT_CHORDS);
    types.extend(builtin_types(ChordKind::Scale, &DEFAULT_SCALES));
    ChordCatalog { types }
});

fn builtin_types(kind: ChordKind, table: &[(&str, &[u8])]) -> Vec<ChordType> {
    table
        .iter()
        .map(|(name, offsets)| ChordType {
            name: name.to_string(),
            kind,
            offsets: offsets.to_vec(),
        })
        .collect()
}

/// Whether a catalog entry is a chord or a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordKind {
    Chord,
    Scale,
}

impl fmt::Display for ChordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordKind::Chord => f.write_str("chord"),
            ChordKind::Scale => f.write_str("scale"),
        }
    }
}

/// One named chord or scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordType {
    pub name: String,
    pub kind: ChordKind,
    /// Semitone offsets from the root, in catalog order.
    pub offsets: Vec<u8>,
}

/// All chord and scale types known to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordCatalog {
    /// Chords first, then scales, each in the order supplied.
    types: Vec<ChordType>,
}

impl ChordCatalog {
    /// Validates and combines a chord table and a scale table.
    ///
    /// # Errors
    /// * [`ConfigError::EmptyType`] - an entry without offsets
    /// * [`ConfigError::OffsetOutOfRange`] - an offset of 12 or more
    /// * [`ConfigError::MissingRoot`] - an entry without offset 0
    /// * [`ConfigError::DuplicateType`] - a name repeated within one table
    /// * [`ConfigError::EmptyCatalog`] - no entries in either table
    pub fn new(
        chords: Vec<(String, Vec<u8>)>,
        scales: Vec<(String, Vec<u8>)>,
    ) -> Result<Self, ConfigError> {
        if chords.is_empty() && scales.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut types: Vec<ChordType> = Vec::with_capacity(chords.len() + scales.len());

        let tagged = chords
            .into_iter()
            .map(|entry| (ChordKind::Chord, entry))
            .chain(scales.into_iter().map(|entry| (ChordKind::Scale, entry)));

        for (kind, (name, offsets)) in tagged {
            if offsets.is_empty() {
                return Err(ConfigError::EmptyType { name });
            }
            if let Some(&offset) = offsets.iter().find(|&&o| o >= SEMITONES) {
                return Err(ConfigError::OffsetOutOfRange { name, offset });
            }
            if !offsets.contains(&0) {
                return Err(ConfigError::MissingRoot { name });
            }
            if types.iter().any(|t| t.kind == kind && t.name == name) {
                return Err(ConfigError::DuplicateType {
                    kind: kind.to_string(),
                    name,
                });
            }
            types.push(ChordType {
                name,
                kind,
                offsets,
            });
        }

        Ok(Self { types })
    }

    /// First entry called `name`, chords before scales.
    pub fn lookup(&self, name: &str) -> TheoryResult<&ChordType> {
        self.types
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| unknown_type(name))
    }

    /// The entry called `name` of exactly `kind`.
    pub fn lookup_kind(&self, name: &str, kind: ChordKind) -> TheoryResult<&ChordType> {
        self.types
            .iter()
            .find(|t| t.kind == kind && t.name == name)
            .ok_or_else(|| unknown_type(name))
    }

    /// Semitone offsets of `name`.
    pub fn offsets_of(&self, name: &str) -> TheoryResult<&[u8]> {
        self.lookup(name).map(|t| t.offsets.as_slice())
    }

    /// Names of every entry of `kind`, in catalog order.
    pub fn names(&self, kind: ChordKind) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .filter(move |t| t.kind == kind)
            .map(|t| t.name.as_str())
    }

    /// Every entry in catalog order.
    pub fn types(&self) -> &[ChordType] {
        &self.types
    }

    /// First entry of `kind`, the default selection in a front end.
    pub fn first(&self, kind: ChordKind) -> Option<&ChordType> {
        self.types.iter().find(|t| t.kind == kind)
    }

    /// Chord tones or scale notes of `name` built on `root`.
    pub fn notes_of(&self, name: &str, root: PitchClass) -> TheoryResult<Vec<PitchClass>> {
        Ok(self.lookup(name)?.notes(root))
    }

    /// Display text such as `"Major 7 (1 3 5 7)"`.
    pub fn describe(&self, name: &str, intervals: &IntervalCatalog) -> TheoryResult<String> {
        Ok(self.lookup(name)?.describe(intervals))
    }
}

impl ChordType {
    /// Notes of this type built on `root`, in offset order.
    ///
    /// A malformed entry with repeated offsets yields repeated notes; that is
    /// logged and passed through.
    pub fn notes(&self, root: PitchClass) -> Vec<PitchClass> {
        let notes: Vec<PitchClass> = self
            .offsets
            .iter()
            .map(|&offset| root.transpose(offset as i32))
            .collect();

        if notes.iter().enumerate().any(|(i, n)| notes[..i].contains(n)) {
            warn!("[CATALOG] '{}' produces duplicate notes: {:?}", self.name, notes);
        }
        notes
    }

    /// Name followed by its degree labels, e.g. `"Minor (1 b3 5)"`.
    pub fn describe(&self, intervals: &IntervalCatalog) -> String {
        let degrees: Vec<&str> = self
            .offsets
            .iter()
            .filter_map(|&offset| intervals.label_of(offset).ok())
            .collect();
        format!("{} ({})", self.name, degrees.join(" "))
    }
}

fn unknown_type(name: &str) -> TheoryError {
    TheoryError::UnknownType {
        name: name.to_string(),
    }
}

impl Default for ChordCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}
