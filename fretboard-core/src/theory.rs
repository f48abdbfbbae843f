//! # Theory Engine
//!
//! The in-process API the front end calls. A [`TheoryEngine`] is built once from an
//! [`EngineConfig`], resolving every name up front, and is immutable afterwards:
//! each call is a pure function of its arguments and the configuration.
//!
//! ## Operations
//! - Notes of a chord or scale on a root
//! - The single note an interval label names above a root
//! - The degree label of a note relative to a root
//! - Fretboard cells sounding a set of pitch classes
//! - Note/degree labels for individual cells

use std::fmt;

use log::debug;
use rand::Rng;

use crate::catalog::{ChordCatalog, ChordKind, ChordType};
use crate::config::EngineConfig;
use crate::error::{ConfigError, TheoryResult};
use crate::fretboard::{FretPosition, Fretboard, fret_positions};
use crate::interval::{DegreeFamily, IntervalCatalog};
use crate::pitch::PitchClass;
use crate::quiz;
use crate::tuning::Tuning;

/// What the front end prints on a marked cell, e.g. `C(1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLabel {
    pub position: FretPosition,
    pub note: PitchClass,
    /// Degree label relative to the current root.
    pub function: String,
    pub family: DegreeFamily,
}

impl fmt::Display for CellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.note, self.function)
    }
}

/// Resolved configuration plus the operations over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoryEngine {
    fretboard: Fretboard,
    intervals: IntervalCatalog,
    catalog: ChordCatalog,
}

impl TheoryEngine {
    /// Validates `config` and resolves it.
    ///
    /// # Errors
    /// Any [`ConfigError`]: unknown tuning notes, an empty tuning, a non-bijective
    /// interval catalog or a malformed chord/scale entry.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let tuning = Tuning::from_names(&config.instrument_tuning)?;
        let intervals = IntervalCatalog::new(config.interval_catalog.into_entries())?;
        let catalog = ChordCatalog::new(
            config.chord_catalog.into_entries(),
            config.scale_catalog.into_entries(),
        )?;

        debug!(
            "[ENGINE] {} strings, frets 0-{}, {} catalog types",
            tuning.string_count(),
            config.max_fret,
            catalog.types().len()
        );

        Ok(Self {
            fretboard: Fretboard::new(tuning, config.max_fret),
            intervals,
            catalog,
        })
    }

    pub fn fretboard(&self) -> &Fretboard {
        &self.fretboard
    }

    pub fn intervals(&self) -> &IntervalCatalog {
        &self.intervals
    }

    pub fn catalog(&self) -> &ChordCatalog {
        &self.catalog
    }

    /// Notes of the chord or scale `type_name` on `root`, in catalog offset order.
    ///
    /// Chords shadow scales of the same name; use [`Self::notes_for_kind`] to pick
    /// one explicitly.
    pub fn notes_for_chord_or_scale(
        &self,
        root: &str,
        type_name: &str,
    ) -> TheoryResult<Vec<PitchClass>> {
        let root: PitchClass = root.parse()?;
        self.catalog.notes_of(type_name, root)
    }

    /// Notes of the `kind` entry called `type_name` on `root`.
    pub fn notes_for_kind(
        &self,
        root: PitchClass,
        type_name: &str,
        kind: ChordKind,
    ) -> TheoryResult<Vec<PitchClass>> {
        Ok(self.catalog.lookup_kind(type_name, kind)?.notes(root))
    }

    /// The note `label` names above `root`.
    pub fn notes_for_interval(&self, root: &str, label: &str) -> TheoryResult<PitchClass> {
        self.interval_note(root.parse()?, label)
    }

    /// Typed form of [`Self::notes_for_interval`].
    pub fn interval_note(&self, root: PitchClass, label: &str) -> TheoryResult<PitchClass> {
        let offset = self.intervals.offset_of(label)?;
        Ok(root.transpose(offset as i32))
    }

    /// Degree label of `note` relative to `root`; `"1"` when they are equal.
    pub fn function_label(&self, note: &str, root: &str) -> TheoryResult<&str> {
        let note: PitchClass = note.parse()?;
        let root: PitchClass = root.parse()?;
        Ok(self.intervals.function_of(note, root))
    }

    /// Cells on the configured board sounding any of `targets`.
    pub fn fret_positions(&self, targets: &[PitchClass]) -> Vec<FretPosition> {
        self.fretboard.positions_of(targets)
    }

    /// Cells sounding any of `targets` on an explicit tuning and fret range.
    pub fn fret_positions_on(
        &self,
        targets: &[PitchClass],
        tuning: &Tuning,
        max_fret: u8,
    ) -> Vec<FretPosition> {
        fret_positions(targets, tuning, max_fret)
    }

    /// Note and degree label of `position` relative to `root`, or `None` off the board.
    pub fn cell_label(&self, position: FretPosition, root: PitchClass) -> Option<CellLabel> {
        let note = self.fretboard.note_at(position)?;
        let function = self.intervals.function_of(note, root).to_string();
        Some(CellLabel {
            position,
            note,
            family: DegreeFamily::of(&function),
            function,
        })
    }

    /// Labels for every cell in `positions` that is on the board.
    pub fn cell_labels(&self, positions: &[FretPosition], root: PitchClass) -> Vec<CellLabel> {
        positions
            .iter()
            .filter_map(|&p| self.cell_label(p, root))
            .collect()
    }

    /// Text for a catalog entry, e.g. `"Dominant 7 (1 3 5 b7)"`.
    pub fn describe(&self, entry: &ChordType) -> String {
        entry.describe(&self.intervals)
    }

    /// A random non-root interval label different from `previous`.
    /// See [`quiz::next_random_interval`].
    pub fn next_random_interval<R: Rng + ?Sized>(
        &self,
        previous: Option<&str>,
        rng: &mut R,
    ) -> String {
        quiz::next_random_interval(&self.intervals, previous, rng)
    }
}

impl Default for TheoryEngine {
    fn default() -> Self {
        Self {
            fretboard: Fretboard::default(),
            intervals: IntervalCatalog::default(),
            catalog: ChordCatalog::default(),
        }
    }
}
