//! # Fretboard Search Module
//!
//! Maps pitch classes onto the logical (string, fret) grid of a tuned instrument.
//! Everything here is pure: the same inputs always give the same cells in the same
//! order, so callers can recompute on every selection change without caching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;
use crate::tuning::Tuning;

/// Highest fret drawn by default (one octave above the open strings).
pub const DEFAULT_MAX_FRET: u8 = 12;

/// A playable cell: string index and fret number. Fret 0 is the open string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FretPosition {
    pub string: usize,
    pub fret: u8,
}

impl FretPosition {
    pub fn new(string: usize, fret: u8) -> Self {
        Self { string, fret }
    }
}

impl fmt::Display for FretPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.string, self.fret)
    }
}

/// A tuning together with the playable fret range `[0, max_fret]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fretboard {
    tuning: Tuning,
    max_fret: u8,
}

impl Fretboard {
    pub fn new(tuning: Tuning, max_fret: u8) -> Self {
        Self { tuning, max_fret }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn max_fret(&self) -> u8 {
        self.max_fret
    }

    /// Whether `position` lies on this board.
    pub fn contains(&self, position: FretPosition) -> bool {
        position.string < self.tuning.string_count() && position.fret <= self.max_fret
    }

    /// The pitch class sounded at `position`, or `None` off the board.
    pub fn note_at(&self, position: FretPosition) -> Option<PitchClass> {
        if position.fret > self.max_fret {
            return None;
        }
        self.tuning
            .open_note(position.string)
            .map(|open| open.transpose(position.fret as i32))
    }

    /// Every cell on the board, string-major then fret-ascending.
    pub fn cells(&self) -> impl Iterator<Item = FretPosition> + '_ {
        let max_fret = self.max_fret;
        (0..self.tuning.string_count()).flat_map(move |string| {
            (0..=max_fret).map(move |fret| FretPosition::new(string, fret))
        })
    }

    /// Cells whose sounded note is in `targets`. See [`fret_positions`].
    pub fn positions_of(&self, targets: &[PitchClass]) -> Vec<FretPosition> {
        fret_positions(targets, &self.tuning, self.max_fret)
    }
}

impl Default for Fretboard {
    fn default() -> Self {
        Self::new(Tuning::default(), DEFAULT_MAX_FRET)
    }
}

/// Finds every (string, fret) cell in `[0, max_fret]` whose sounded pitch class is in
/// `targets`.
///
/// Output is string-major, then fret-ascending. An empty target set gives an empty
/// result, and a target absent from the range simply contributes no cells.
///
/// # Arguments
/// * `targets` - Pitch classes to look for (order and repeats are irrelevant)
/// * `tuning` - Open pitch class of each string
/// * `max_fret` - Highest fret searched, inclusive
pub fn fret_positions(targets: &[PitchClass], tuning: &Tuning, max_fret: u8) -> Vec<FretPosition> {
    let mut wanted = [false; 12];
    for target in targets {
        wanted[target.index() as usize] = true;
    }

    let mut positions = Vec::new();
    for (string, open) in tuning.strings().iter().enumerate() {
        for fret in 0..=max_fret {
            let note = open.transpose(fret as i32);
            if wanted[note.index() as usize] {
                positions.push(FretPosition::new(string, fret));
            }
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pcs(names: &[&str]) -> Vec<PitchClass> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn c_major_on_low_e_string() {
        let board = Fretboard::default();
        let positions = board.positions_of(&pcs(&["C", "E", "G"]));
        let low_e: Vec<u8> = positions
            .iter()
            .filter(|p| p.string == 0)
            .map(|p| p.fret)
            .collect();
        assert_eq!(low_e, vec![0, 3, 8, 12]);
        assert!(positions.contains(&FretPosition::new(0, 8)));
    }

    #[test]
    fn output_is_string_major_and_sorted() {
        let positions = Fretboard::default().positions_of(&pcs(&["A", "D"]));
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn empty_targets_give_nothing() {
        assert!(Fretboard::default().positions_of(&[]).is_empty());
    }

    #[test]
    fn full_chromatic_set_covers_every_cell() {
        let board = Fretboard::default();
        let all: Vec<PitchClass> = PitchClass::all().collect();
        let positions = board.positions_of(&all);
        assert_eq!(positions.len(), 6 * 13);
        assert_eq!(positions, board.cells().collect::<Vec<_>>());
    }

    #[test]
    fn note_missing_from_short_range() {
        let tuning = Tuning::from_names(&["E"]).unwrap();
        // E string up to fret 2 only reaches F#.
        assert!(fret_positions(&pcs(&["G"]), &tuning, 2).is_empty());
        assert_eq!(
            fret_positions(&pcs(&["F#"]), &tuning, 2),
            vec![FretPosition::new(0, 2)]
        );
    }

    #[test]
    fn note_at_and_bounds() {
        let board = Fretboard::default();
        assert_eq!(board.note_at(FretPosition::new(0, 8)).map(|p| p.name()), Some("C"));
        assert_eq!(board.note_at(FretPosition::new(4, 1)).map(|p| p.name()), Some("C"));
        assert_eq!(board.note_at(FretPosition::new(6, 0)), None);
        assert_eq!(board.note_at(FretPosition::new(0, 13)), None);
        assert!(!board.contains(FretPosition::new(0, 13)));
    }
}
