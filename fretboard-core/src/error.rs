//! # Error Types
//!
//! Every engine failure is a programmer or configuration mistake: the front end only
//! ever hands the engine values taken from its own catalogs. The engine therefore
//! fails fast with an explicit error instead of falling back to a default.

use thiserror::Error;

/// Result type for theory engine operations.
pub type TheoryResult<T> = Result<T, TheoryError>;

/// Errors raised while resolving notes, chord/scale types and interval labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    /// A note name that is not in the chromatic table, even after enharmonic
    /// normalization.
    #[error("unknown note: '{name}'")]
    UnknownNote {
        /// The name as supplied.
        name: String,
    },

    /// A chord or scale name absent from the catalog.
    #[error("unknown chord or scale type: '{name}'")]
    UnknownType {
        /// The type name as supplied.
        name: String,
    },

    /// An interval label absent from the interval catalog.
    #[error("unknown interval label: '{label}'")]
    UnknownInterval {
        /// The label as supplied.
        label: String,
    },

    /// A semitone offset outside 0-11 was asked for its label.
    #[error("interval offset {offset} is outside 0-11")]
    OffsetOutOfRange {
        /// The offending offset.
        offset: u8,
    },
}

/// Errors raised while loading or validating an [`crate::config::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The instrument has no strings.
    #[error("instrument tuning is empty")]
    EmptyTuning,

    /// A tuning note or other note name failed to resolve.
    #[error("invalid note in configuration: {0}")]
    Note(#[from] TheoryError),

    /// Two interval labels share a name.
    #[error("interval label '{label}' is defined more than once")]
    DuplicateIntervalLabel {
        /// The repeated label.
        label: String,
    },

    /// Two interval labels map to the same offset.
    #[error("interval offset {offset} is claimed by both '{first}' and '{second}'")]
    DuplicateIntervalOffset {
        /// The shared offset.
        offset: u8,
        /// Label seen first.
        first: String,
        /// Label seen second.
        second: String,
    },

    /// The interval catalog leaves an offset in 0-11 without a label.
    #[error("interval catalog has no label for offset {offset}")]
    MissingIntervalOffset {
        /// The uncovered offset.
        offset: u8,
    },

    /// A chord, scale or interval offset is 12 or more.
    #[error("'{name}' uses offset {offset}, expected 0-11")]
    OffsetOutOfRange {
        /// The catalog entry.
        name: String,
        /// The offending offset.
        offset: u8,
    },

    /// A chord or scale type does not contain the root.
    #[error("'{name}' does not contain the root offset 0")]
    MissingRoot {
        /// The catalog entry.
        name: String,
    },

    /// A chord or scale type with no offsets at all.
    #[error("'{name}' has no offsets")]
    EmptyType {
        /// The catalog entry.
        name: String,
    },

    /// Both the chord and the scale catalog are empty.
    #[error("chord and scale catalogs are both empty")]
    EmptyCatalog,

    /// The same type name appears twice in one catalog.
    #[error("{kind} '{name}' is defined more than once")]
    DuplicateType {
        /// "chord" or "scale".
        kind: String,
        /// The repeated name.
        name: String,
    },

    /// The configuration file could not be parsed.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
