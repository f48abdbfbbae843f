//! # Pitch Model
//!
//! This module holds the canonical ordering of the 12 chromatic pitch classes.
//! Pitch classes are octave-independent and compared by chromatic index, never by
//! spelling.
//!
//! ## Features
//! - Canonical name table (`C C# D D# E F F# G G# A Bb B`)
//! - Enharmonic normalization on lookup (`A#`, `Bb` and `Cbb`-style spellings all resolve)
//! - Wrapping arithmetic for semitone offsets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TheoryError, TheoryResult};

/// Number of pitch classes in an octave.
pub const SEMITONES: u8 = 12;

/// Canonical spelling for each chromatic index, starting at C.
///
/// Only one spelling is stored per index; alternate spellings are normalized
/// onto these in [`index_of`].
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "Bb", "B",
];

/// A chromatic pitch class, 0 (C) through 11 (B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchClass(u8);

impl PitchClass {
    /// Builds a pitch class from any integer, wrapping into 0-11.
    pub fn new(index: i32) -> Self {
        Self(index.rem_euclid(SEMITONES as i32) as u8)
    }

    /// The chromatic index, 0-11.
    pub fn index(self) -> u8 {
        self.0
    }

    /// The canonical spelling.
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Moves up by `semitones`, wrapping at the octave.
    pub fn transpose(self, semitones: i32) -> Self {
        Self::new(self.0 as i32 + semitones)
    }

    /// Semitones from `root` up to `self`, always in 0-11.
    pub fn interval_from(self, root: PitchClass) -> u8 {
        (self.0 + SEMITONES - root.0) % SEMITONES
    }

    /// Every pitch class in chromatic order starting at C.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..SEMITONES).map(PitchClass)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        index_of(s).map(PitchClass)
    }
}

impl TryFrom<String> for PitchClass {
    type Error = TheoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(pitch: PitchClass) -> Self {
        pitch.name().to_string()
    }
}

/// Returns the chromatic index (0-11) of a note name.
///
/// The name is a letter `A`-`G` (either case) followed by any number of `#`/`♯`
/// or `b`/`♭` accidentals. Enharmonic spellings resolve to the same index as the
/// canonical name, so `"A#"` and `"Bb"` both give 10.
///
/// # Errors
/// * [`TheoryError::UnknownNote`] - empty name, unknown letter or stray characters
pub fn index_of(name: &str) -> TheoryResult<u8> {
    let unknown = || TheoryError::UnknownNote {
        name: name.to_string(),
    };

    let mut chars = name.chars();
    let natural: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(unknown()),
    };

    let mut shift = 0i32;
    for c in chars {
        match c {
            '#' | '♯' => shift += 1,
            'b' | '♭' => shift -= 1,
            _ => return Err(unknown()),
        }
    }

    Ok(PitchClass::new(natural + shift).index())
}

/// Returns the canonical name for a chromatic index. The index is taken mod 12,
/// so negative and large values wrap.
pub fn name_at(index: i32) -> &'static str {
    PitchClass::new(index).name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_resolve_to_their_position() {
        for (i, name) in NOTE_NAMES.iter().enumerate() {
            assert_eq!(index_of(name), Ok(i as u8));
        }
    }

    #[test]
    fn enharmonic_spellings_share_an_index() {
        assert_eq!(index_of("A#"), index_of("Bb"));
        assert_eq!(index_of("Db"), Ok(1));
        assert_eq!(index_of("Cb"), Ok(11));
        assert_eq!(index_of("E#"), Ok(5));
        assert_eq!(index_of("bb"), Ok(10));
        assert_eq!(index_of("F##"), Ok(7));
    }

    #[test]
    fn unknown_names_are_rejected() {
        for bad in ["", "H", "C+", "Do", " C"] {
            assert_eq!(
                index_of(bad),
                Err(TheoryError::UnknownNote {
                    name: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn name_at_wraps_in_both_directions() {
        assert_eq!(name_at(0), "C");
        assert_eq!(name_at(12), "C");
        assert_eq!(name_at(-1), "B");
        assert_eq!(name_at(4 + 8), "C");
        assert_eq!(name_at(-14), "Bb");
    }

    #[test]
    fn interval_from_is_upward_distance() {
        let c: PitchClass = "C".parse().unwrap();
        let g: PitchClass = "G".parse().unwrap();
        assert_eq!(g.interval_from(c), 7);
        assert_eq!(c.interval_from(g), 5);
        assert_eq!(c.interval_from(c), 0);
    }

    #[test]
    fn serializes_as_canonical_name() {
        let pitch: PitchClass = serde_json::from_str("\"A#\"").unwrap();
        assert_eq!(pitch.index(), 10);
        assert_eq!(serde_json::to_string(&pitch).unwrap(), "\"Bb\"");
        assert!(serde_json::from_str::<PitchClass>("\"X\"").is_err());
    }
}
