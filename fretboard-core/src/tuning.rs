//! # Instrument Tuning Module
//!
//! A tuning is the open pitch class of each string, ordered from string 0 upward.
//! For the built-in guitar tuning string 0 is the low E, matching the fretboard
//! coordinate model used everywhere else in the crate.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TheoryResult};
use crate::pitch::PitchClass;

/// Open-string note names of a standard-tuned six-string guitar, low to high.
pub const STANDARD_GUITAR: [&str; 6] = ["E", "A", "D", "G", "B", "E"];

/// Statically resolved standard guitar tuning.
static STANDARD_GUITAR_TUNING: Lazy<Tuning> = Lazy::new(|| Tuning {
    strings: STANDARD_GUITAR
        .iter()
        .filter_map(|name| name.parse().ok())
        .collect(),
});

/// Instruments with a built-in tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Instrument {
    /// Six-string guitar in standard E tuning.
    #[default]
    Guitar,
}

impl Instrument {
    /// The fixed open-string tuning for this instrument.
    pub fn tuning(self) -> &'static Tuning {
        match self {
            Instrument::Guitar => &STANDARD_GUITAR_TUNING,
        }
    }
}

/// Ordered open-string pitch classes, one per string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuning {
    strings: Vec<PitchClass>,
}

impl Tuning {
    /// Builds a tuning from already-resolved pitch classes.
    ///
    /// # Errors
    /// * [`ConfigError::EmptyTuning`] - no strings supplied
    pub fn new(strings: Vec<PitchClass>) -> Result<Self, ConfigError> {
        if strings.is_empty() {
            return Err(ConfigError::EmptyTuning);
        }
        Ok(Self { strings })
    }

    /// Resolves a list of note names (enharmonics allowed) into a tuning.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let strings = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<TheoryResult<Vec<PitchClass>>>()?;
        Self::new(strings)
    }

    /// Number of strings.
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Open pitch class of `string`, if the string exists.
    pub fn open_note(&self, string: usize) -> Option<PitchClass> {
        self.strings.get(string).copied()
    }

    /// Open pitch classes in string order.
    pub fn strings(&self) -> &[PitchClass] {
        &self.strings
    }

    /// Open-string names in string order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strings.iter().map(|p| p.name()).collect()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Instrument::Guitar.tuning().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guitar_is_standard_e() {
        let tuning = Instrument::Guitar.tuning();
        assert_eq!(tuning.string_count(), 6);
        assert_eq!(tuning.names(), vec!["E", "A", "D", "G", "B", "E"]);
    }

    #[test]
    fn from_names_normalizes_spellings() {
        let drop_d = Tuning::from_names(&["D", "A", "D", "G", "B", "E"]).unwrap();
        assert_eq!(drop_d.open_note(0).map(|p| p.index()), Some(2));

        let flat = Tuning::from_names(&["Eb", "Ab", "Db", "Gb", "Bb", "Eb"]).unwrap();
        assert_eq!(flat.names(), vec!["D#", "G#", "C#", "F#", "Bb", "D#"]);
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert!(matches!(
            Tuning::from_names::<&str>(&[]),
            Err(ConfigError::EmptyTuning)
        ));
        assert!(matches!(
            Tuning::from_names(&["E", "Q"]),
            Err(ConfigError::Note(_))
        ));
    }

    #[test]
    fn open_note_out_of_range_is_none() {
        assert_eq!(Tuning::default().open_note(6), None);
    }
}
