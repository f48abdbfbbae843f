//! # Interval Catalog
//!
//! Scale-degree labels ("1", "b3", "b7", ...) mapped to semitone offsets and back.
//! A catalog is only constructible when the mapping is a bijection onto 0-11, so the
//! reverse lookup used by [`IntervalCatalog::function_of`] can never miss.

use once_cell::sync::Lazy;

use crate::error::{ConfigError, TheoryError, TheoryResult};
use crate::pitch::{PitchClass, SEMITONES};

/// Label of offset 0 in the built-in catalog.
pub const ROOT_LABEL: &str = "1";

/// Built-in degree labels in offset order.
pub const DEFAULT_LABELS: [&str; 12] = [
    "1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

static DEFAULT_CATALOG: Lazy<IntervalCatalog> = Lazy::new(|| IntervalCatalog {
    entries: DEFAULT_LABELS
        .iter()
        .enumerate()
        .map(|(offset, label)| (label.to_string(), offset as u8))
        .collect(),
    by_offset: DEFAULT_LABELS.map(str::to_string),
});

/// Coarse grouping of a degree by its number, ignoring accidentals.
///
/// The front end uses it to group markers (roots, thirds, fifths, sevenths).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegreeFamily {
    Root,
    Third,
    Fifth,
    Seventh,
    Other,
}

impl DegreeFamily {
    /// Classifies a label by its trailing degree number.
    pub fn of(label: &str) -> Self {
        match label.chars().last() {
            Some('1') => DegreeFamily::Root,
            Some('3') => DegreeFamily::Third,
            Some('5') => DegreeFamily::Fifth,
            Some('7') => DegreeFamily::Seventh,
            _ => DegreeFamily::Other,
        }
    }
}

/// Bijective mapping between degree labels and semitone offsets 0-11.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalCatalog {
    /// Label/offset pairs in catalog order.
    entries: Vec<(String, u8)>,
    /// Reverse map, indexed by offset.
    by_offset: [String; 12],
}

impl IntervalCatalog {
    /// Validates `entries` and builds the catalog.
    ///
    /// # Errors
    /// * [`ConfigError::OffsetOutOfRange`] - an offset of 12 or more
    /// * [`ConfigError::DuplicateIntervalLabel`] - a label given twice
    /// * [`ConfigError::DuplicateIntervalOffset`] - two labels for one offset
    /// * [`ConfigError::MissingIntervalOffset`] - an offset with no label
    pub fn new(entries: Vec<(String, u8)>) -> Result<Self, ConfigError> {
        let mut by_offset: [Option<String>; 12] = Default::default();

        for (i, (label, offset)) in entries.iter().enumerate() {
            if *offset >= SEMITONES {
                return Err(ConfigError::OffsetOutOfRange {
                    name: label.clone(),
                    offset: *offset,
                });
            }
            if entries[..i].iter().any(|(seen, _)| seen == label) {
                return Err(ConfigError::DuplicateIntervalLabel {
                    label: label.clone(),
                });
            }
            let slot = &mut by_offset[*offset as usize];
            if let Some(first) = slot {
                return Err(ConfigError::DuplicateIntervalOffset {
                    offset: *offset,
                    first: first.clone(),
                    second: label.clone(),
                });
            }
            *slot = Some(label.clone());
        }

        let mut labels: [String; 12] = Default::default();
        for (offset, slot) in by_offset.into_iter().enumerate() {
            labels[offset] = slot.ok_or(ConfigError::MissingIntervalOffset {
                offset: offset as u8,
            })?;
        }

        Ok(Self {
            entries,
            by_offset: labels,
        })
    }

    /// Semitone offset of `label`.
    pub fn offset_of(&self, label: &str) -> TheoryResult<u8> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, offset)| *offset)
            .ok_or_else(|| TheoryError::UnknownInterval {
                label: label.to_string(),
            })
    }

    /// Label for `offset`. Fails only for offsets outside 0-11.
    pub fn label_of(&self, offset: u8) -> TheoryResult<&str> {
        self.by_offset
            .get(offset as usize)
            .map(String::as_str)
            .ok_or(TheoryError::OffsetOutOfRange { offset })
    }

    /// Scale-degree function of `note` relative to `root`. Total: every pair of
    /// pitch classes has a label, and `note == root` gives the root label.
    pub fn function_of(&self, note: PitchClass, root: PitchClass) -> &str {
        &self.by_offset[note.interval_from(root) as usize]
    }

    /// Labels in catalog order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Label/offset pairs in catalog order.
    pub fn entries(&self) -> &[(String, u8)] {
        &self.entries
    }

    /// The label assigned to offset 0.
    pub fn root_label(&self) -> &str {
        &self.by_offset[0]
    }
}

impl Default for IntervalCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(name: &str) -> PitchClass {
        name.parse().unwrap()
    }

    #[test]
    fn default_catalog_is_total() {
        let catalog = IntervalCatalog::default();
        for offset in 0..12 {
            let label = catalog.label_of(offset).unwrap();
            assert_eq!(catalog.offset_of(label), Ok(offset));
        }
        assert_eq!(catalog.root_label(), ROOT_LABEL);
    }

    #[test]
    fn label_of_out_of_range() {
        assert_eq!(
            IntervalCatalog::default().label_of(12),
            Err(TheoryError::OffsetOutOfRange { offset: 12 })
        );
    }

    #[test]
    fn offset_of_unknown_label() {
        assert_eq!(
            IntervalCatalog::default().offset_of("#9"),
            Err(TheoryError::UnknownInterval {
                label: "#9".to_string()
            })
        );
    }

    #[test]
    fn function_of_examples() {
        let catalog = IntervalCatalog::default();
        assert_eq!(catalog.function_of(pc("G"), pc("C")), "5");
        assert_eq!(catalog.function_of(pc("C"), pc("C")), "1");
        assert_eq!(catalog.function_of(pc("C"), pc("D")), "b7");
        assert_eq!(catalog.function_of(pc("Bb"), pc("C")), "b7");
        assert_eq!(catalog.function_of(pc("E"), pc("F")), "7");
    }

    #[test]
    fn rejects_gaps_and_collisions() {
        let mut entries: Vec<(String, u8)> = DEFAULT_LABELS
            .iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), i as u8))
            .collect();

        let mut missing = entries.clone();
        missing.pop();
        assert!(matches!(
            IntervalCatalog::new(missing),
            Err(ConfigError::MissingIntervalOffset { offset: 11 })
        ));

        let mut collision = entries.clone();
        collision.push(("#4".to_string(), 6));
        assert!(matches!(
            IntervalCatalog::new(collision),
            Err(ConfigError::DuplicateIntervalOffset { offset: 6, .. })
        ));

        entries.push(("b2".to_string(), 1));
        assert!(matches!(
            IntervalCatalog::new(entries),
            Err(ConfigError::DuplicateIntervalLabel { .. })
        ));
    }

    #[test]
    fn degree_families() {
        assert_eq!(DegreeFamily::of("1"), DegreeFamily::Root);
        assert_eq!(DegreeFamily::of("b3"), DegreeFamily::Third);
        assert_eq!(DegreeFamily::of("b5"), DegreeFamily::Fifth);
        assert_eq!(DegreeFamily::of("7"), DegreeFamily::Seventh);
        assert_eq!(DegreeFamily::of("b6"), DegreeFamily::Other);
    }
}
