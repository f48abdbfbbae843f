//! # Quiz Session Module
//!
//! State for one open fretboard screen: the current selection, the active mode and
//! which target cells the user has found so far.
//!
//! ## Modes
//! - **Display**: every target cell is shown, taps are not tracked
//! - **Fill chord**: tap every cell of the selected chord
//! - **Find interval**: one root cell is revealed, tap every cell of a randomly
//!   chosen interval above it
//! - **Find scale**: tap every cell of the selected scale
//!
//! Targets are always re-derived from scratch by [`derive_round`] when the mode or
//! selection changes; the found set is reset at the same time. Completion is
//! reported once per round, by the [`TapOutcome::Completed`] return value and the
//! optional completion listener. A tracked round with no cells on the board is
//! complete as soon as it is derived.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::ChordKind;
use crate::error::{TheoryError, TheoryResult};
use crate::fretboard::FretPosition;
use crate::interval::IntervalCatalog;
use crate::pitch::PitchClass;
use crate::theory::TheoryEngine;

/// Interaction mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Display,
    FillChord,
    FindSingleInterval,
    FindScale,
}

impl Mode {
    /// Every mode in menu order.
    pub const ALL: [Mode; 4] = [
        Mode::Display,
        Mode::FillChord,
        Mode::FindSingleInterval,
        Mode::FindScale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Display => "FretBoard",
            Mode::FillChord => "FillChord",
            Mode::FindSingleInterval => "FindNotes",
            Mode::FindScale => "FindScale",
        }
    }

    /// Whether taps are checked against the targets.
    pub fn tracks_taps(self) -> bool {
        !matches!(self, Mode::Display)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The inputs a round is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub root: PitchClass,
    /// Chord (or any catalog entry) used by display and fill-chord.
    pub chord_type: String,
    /// Scale used by find-scale.
    pub scale_type: String,
    /// Interval to find in find-interval.
    pub interval: String,
}

/// Per-mode round data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Round {
    Display {
        targets: Vec<FretPosition>,
    },
    FillChord {
        targets: Vec<FretPosition>,
    },
    FindSingleInterval {
        interval: String,
        /// Reference root cell shown from the start, if the root is on the board.
        revealed: Option<FretPosition>,
        targets: Vec<FretPosition>,
    },
    FindScale {
        targets: Vec<FretPosition>,
    },
}

impl Round {
    pub fn mode(&self) -> Mode {
        match self {
            Round::Display { .. } => Mode::Display,
            Round::FillChord { .. } => Mode::FillChord,
            Round::FindSingleInterval { .. } => Mode::FindSingleInterval,
            Round::FindScale { .. } => Mode::FindScale,
        }
    }

    /// Cells the user has to find (all shown cells in display mode).
    pub fn targets(&self) -> &[FretPosition] {
        match self {
            Round::Display { targets }
            | Round::FillChord { targets }
            | Round::FindSingleInterval { targets, .. }
            | Round::FindScale { targets } => targets,
        }
    }

    /// Cells shown before any tap.
    pub fn revealed(&self) -> Option<FretPosition> {
        match self {
            Round::FindSingleInterval { revealed, .. } => *revealed,
            _ => None,
        }
    }

    /// Whether `found` completes this round. Display rounds never complete.
    pub fn is_complete(&self, found: &BTreeSet<FretPosition>) -> bool {
        match self {
            Round::Display { .. } => false,
            Round::FillChord { targets }
            | Round::FindSingleInterval { targets, .. }
            | Round::FindScale { targets } => found.len() == targets.len(),
        }
    }
}

/// Builds the round for `mode` from `selection`.
///
/// Pure apart from `rng`, which only picks the revealed root cell of a
/// find-interval round.
pub fn derive_round<R: Rng + ?Sized>(
    engine: &TheoryEngine,
    mode: Mode,
    selection: &Selection,
    rng: &mut R,
) -> TheoryResult<Round> {
    let root = selection.root;
    let chord_cells = || -> TheoryResult<Vec<FretPosition>> {
        let notes = engine.catalog().notes_of(&selection.chord_type, root)?;
        Ok(engine.fret_positions(&notes))
    };
    let round = match mode {
        Mode::Display => Round::Display {
            targets: chord_cells()?,
        },
        Mode::FillChord => Round::FillChord {
            targets: chord_cells()?,
        },
        Mode::FindSingleInterval => {
            let note = engine.interval_note(root, &selection.interval)?;
            let root_cells = engine.fret_positions(&[root]);
            Round::FindSingleInterval {
                interval: selection.interval.clone(),
                revealed: root_cells.choose(rng).copied(),
                targets: engine.fret_positions(&[note]),
            }
        }
        Mode::FindScale => {
            let notes = engine.notes_for_kind(root, &selection.scale_type, ChordKind::Scale)?;
            Round::FindScale {
                targets: engine.fret_positions(&notes),
            }
        }
    };

    debug!(
        "[QUIZ] {} round, root: {} chord: {} scale: {} interval: {} targets: {}",
        mode,
        root,
        selection.chord_type,
        selection.scale_type,
        selection.interval,
        round.targets().len()
    );
    Ok(round)
}

/// Picks a random interval label other than the root label and `previous`.
///
/// When no other label is left the previous choice is returned again (or the root
/// label if there was none), so this never fails.
pub fn next_random_interval<R: Rng + ?Sized>(
    intervals: &IntervalCatalog,
    previous: Option<&str>,
    rng: &mut R,
) -> String {
    pick_label(intervals.labels(), intervals.root_label(), previous, rng)
}

fn pick_label<'a, R: Rng + ?Sized>(
    labels: impl Iterator<Item = &'a str>,
    root: &str,
    previous: Option<&str>,
    rng: &mut R,
) -> String {
    let candidates: Vec<&str> = labels
        .filter(|&label| label != root && Some(label) != previous)
        .collect();

    match candidates.choose(rng) {
        Some(label) => label.to_string(),
        None => previous.unwrap_or(root).to_string(),
    }
}

/// Result of a single tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Not a target, already found, or taps are not tracked in this mode.
    Ignored,
    /// A new target cell; `remaining` are still hidden.
    Found { remaining: usize },
    /// The tap that found the last target.
    Completed,
}

/// Details handed to the completion listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Chord,
    /// `found` counts the revealed root cell too.
    Interval { found: usize },
    Scale,
}

impl Completion {
    /// Completion of `round` with `found` tapped cells; display rounds have none.
    fn of(round: &Round, found: usize) -> Option<Self> {
        match round {
            Round::Display { .. } => None,
            Round::FillChord { .. } => Some(Completion::Chord),
            Round::FindSingleInterval { revealed, .. } => Some(Completion::Interval {
                found: found + usize::from(revealed.is_some()),
            }),
            Round::FindScale { .. } => Some(Completion::Scale),
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Completion::Chord => Mode::FillChord,
            Completion::Interval { .. } => Mode::FindSingleInterval,
            Completion::Scale => Mode::FindScale,
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Chord => write!(f, "You found all chord notes!"),
            Completion::Interval { found } => write!(f, "You found all {found} notes!"),
            Completion::Scale => write!(f, "You found all scale notes!"),
        }
    }
}

type CompletionListener<'e> = Box<dyn FnMut(&Completion) + 'e>;

/// One screen's worth of quiz state. Single owner, mutated only through its methods.
pub struct Session<'e, R: Rng> {
    engine: &'e TheoryEngine,
    rng: R,
    mode: Mode,
    selection: Selection,
    /// Interval asked last, so the next pick can avoid it.
    last_interval: Option<String>,
    round: Round,
    found: BTreeSet<FretPosition>,
    completed: bool,
    on_complete: Option<CompletionListener<'e>>,
}

impl<'e, R: Rng> Session<'e, R> {
    /// Opens a display-mode session on the first note, chord and scale of the
    /// catalogs, with a freshly drawn interval.
    pub fn new(engine: &'e TheoryEngine, mut rng: R) -> TheoryResult<Self> {
        let catalog = engine.catalog();
        let chord_type = catalog
            .first(ChordKind::Chord)
            .or_else(|| catalog.types().first())
            .map(|t| t.name.clone())
            .ok_or_else(|| TheoryError::UnknownType {
                name: String::new(),
            })?;
        let scale_type = catalog
            .first(ChordKind::Scale)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| chord_type.clone());
        let interval = next_random_interval(engine.intervals(), None, &mut rng);

        let selection = Selection {
            root: PitchClass::new(0),
            chord_type,
            scale_type,
            interval: interval.clone(),
        };
        let round = derive_round(engine, Mode::Display, &selection, &mut rng)?;

        Ok(Self {
            engine,
            rng,
            mode: Mode::Display,
            selection,
            last_interval: Some(interval),
            round,
            found: BTreeSet::new(),
            completed: false,
            on_complete: None,
        })
    }

    /// Registers a listener called once each time a round is completed.
    pub fn set_on_complete<F: FnMut(&Completion) + 'e>(&mut self, listener: F) {
        self.on_complete = Some(Box::new(listener));
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn found(&self) -> &BTreeSet<FretPosition> {
        &self.found
    }

    pub fn last_interval(&self) -> Option<&str> {
        self.last_interval.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// The find-interval prompt: the revealed label and the label to find.
    pub fn prompt(&self) -> (&str, &str) {
        (self.engine.intervals().root_label(), &self.selection.interval)
    }

    pub fn set_mode(&mut self, mode: Mode) -> TheoryResult<()> {
        let selection = self.selection.clone();
        self.apply(mode, selection)
    }

    /// Changes the root; enharmonic names are accepted.
    pub fn set_root(&mut self, root: &str) -> TheoryResult<()> {
        let selection = Selection {
            root: root.parse()?,
            ..self.selection.clone()
        };
        self.apply(self.mode, selection)
    }

    pub fn set_chord_type(&mut self, name: &str) -> TheoryResult<()> {
        self.engine.catalog().lookup(name)?;
        let selection = Selection {
            chord_type: name.to_string(),
            ..self.selection.clone()
        };
        self.apply(self.mode, selection)
    }

    pub fn set_scale_type(&mut self, name: &str) -> TheoryResult<()> {
        self.engine.catalog().lookup_kind(name, ChordKind::Scale)?;
        let selection = Selection {
            scale_type: name.to_string(),
            ..self.selection.clone()
        };
        self.apply(self.mode, selection)
    }

    /// Draws a new interval to find, never the same as the last one asked.
    ///
    /// Only a find-interval round is rebuilt; other modes keep their progress.
    pub fn reroll_interval(&mut self) -> TheoryResult<&str> {
        let interval = next_random_interval(
            self.engine.intervals(),
            self.last_interval.as_deref(),
            &mut self.rng,
        );
        if self.mode == Mode::FindSingleInterval {
            let selection = Selection {
                interval: interval.clone(),
                ..self.selection.clone()
            };
            self.apply(self.mode, selection)?;
        } else {
            self.selection.interval = interval.clone();
        }
        self.last_interval = Some(interval);
        Ok(&self.selection.interval)
    }

    /// Re-derives the round and clears progress. State is untouched on error.
    fn apply(&mut self, mode: Mode, selection: Selection) -> TheoryResult<()> {
        let round = derive_round(self.engine, mode, &selection, &mut self.rng)?;
        self.mode = mode;
        self.selection = selection;
        self.round = round;
        self.found.clear();
        self.completed = false;
        if self.round.is_complete(&self.found) {
            debug!("[QUIZ] {} round has no cells on the board", self.mode);
            self.complete();
        }
        Ok(())
    }

    /// Marks the round complete and notifies the listener.
    fn complete(&mut self) {
        let Some(completion) = Completion::of(&self.round, self.found.len()) else {
            return;
        };
        self.completed = true;
        info!("[QUIZ] {} complete: {}", self.mode, completion);
        if let Some(listener) = self.on_complete.as_mut() {
            listener(&completion);
        }
    }

    /// Handles a tap on `position`.
    ///
    /// Only unfound targets count; anything else is ignored, so re-tapping a found
    /// cell is a no-op and completion is reported exactly once.
    pub fn tap(&mut self, position: FretPosition) -> TapOutcome {
        if !self.mode.tracks_taps()
            || self.completed
            || !self.round.targets().contains(&position)
            || !self.found.insert(position)
        {
            return TapOutcome::Ignored;
        }

        if !self.round.is_complete(&self.found) {
            return TapOutcome::Found {
                remaining: self.round.targets().len() - self.found.len(),
            };
        }

        self.complete();
        TapOutcome::Completed
    }

    /// Cells to draw: every target in display mode, otherwise the revealed cell
    /// plus everything found so far.
    pub fn visible_positions(&self) -> Vec<FretPosition> {
        match self.mode {
            Mode::Display => self.round.targets().to_vec(),
            _ => {
                let mut cells: BTreeSet<FretPosition> = self.found.clone();
                cells.extend(self.round.revealed());
                cells.into_iter().collect()
            }
        }
    }
}
