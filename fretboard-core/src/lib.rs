// fretboard-core/src/lib.rs

//! The core logic for the fretboard theory trainer.
//! This crate maps roots, chord/scale types and interval labels onto the cells of a
//! tuned fretboard, and tracks quiz progress. It is completely headless
//! and contains no UI code.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fretboard;
pub mod interval;
pub mod pitch;
pub mod quiz;
pub mod theory;
pub mod tuning;

pub use catalog::{ChordCatalog, ChordKind, ChordType};
pub use config::EngineConfig;
pub use error::{ConfigError, TheoryError, TheoryResult};
pub use fretboard::{FretPosition, Fretboard, fret_positions};
pub use interval::{DegreeFamily, IntervalCatalog};
pub use pitch::PitchClass;
pub use quiz::{Completion, Mode, Round, Session, TapOutcome};
pub use theory::{CellLabel, TheoryEngine};
pub use tuning::{Instrument, Tuning};
