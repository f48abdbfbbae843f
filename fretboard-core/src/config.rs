//! # Engine Configuration
//!
//! The static data the front end hands to the engine at construction time: the
//! instrument tuning, the fret range and the three catalogs. It is plain serde data
//! with camelCase keys so it can live in a JSON file:
//!
//! ```json
//! {
//!   "instrumentTuning": ["E", "A", "D", "G", "B", "E"],
//!   "maxFret": 12,
//!   "chordCatalog": { "Major": [0, 4, 7] },
//!   "scaleCatalog": { "Major": [0, 2, 4, 5, 7, 9, 11] },
//!   "intervalCatalog": { "1": 0, "b2": 1 }
//! }
//! ```
//!
//! Any key left out falls back to the built-in value. Catalog mappings keep the
//! order they have in the file, since the first entry is the default selection.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::Path;

use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{DEFAULT_CHORDS, DEFAULT_SCALES};
use crate::error::ConfigError;
use crate::fretboard::DEFAULT_MAX_FRET;
use crate::interval::DEFAULT_LABELS;
use crate::tuning::STANDARD_GUITAR;

/// A string-keyed mapping that keeps insertion order through serde.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn entries(&self) -> &[(String, V)] {
        &self.0
    }

    pub fn into_entries(self) -> Vec<(String, V)> {
        self.0
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(OrderedMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Everything the theory engine needs to know about the instrument and its catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Open-string note names, string 0 first.
    pub instrument_tuning: Vec<String>,
    /// Highest fret searched, inclusive.
    pub max_fret: u8,
    pub chord_catalog: OrderedMap<Vec<u8>>,
    pub scale_catalog: OrderedMap<Vec<u8>>,
    /// Degree label to semitone offset.
    pub interval_catalog: OrderedMap<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instrument_tuning: STANDARD_GUITAR.iter().map(|s| s.to_string()).collect(),
            max_fret: DEFAULT_MAX_FRET,
            chord_catalog: offset_table(&DEFAULT_CHORDS),
            scale_catalog: offset_table(&DEFAULT_SCALES),
            interval_catalog: DEFAULT_LABELS
                .iter()
                .enumerate()
                .map(|(offset, label)| (label.to_string(), offset as u8))
                .collect(),
        }
    }
}

fn offset_table(entries: &[(&str, &[u8])]) -> OrderedMap<Vec<u8>> {
    entries
        .iter()
        .map(|(name, offsets)| (name.to_string(), offsets.to_vec()))
        .collect()
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;
        let config = Self::from_json_str(&data)?;
        debug!("[CONFIG] Loaded {}", path.display());
        Ok(config)
    }

    /// Writes this configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json_string = self.to_json_pretty()?;
        let mut file = File::create(path)?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the whole configuration without keeping the resolved result.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::theory::TheoryEngine::new(self.clone()).map(|_| ())
    }
}
