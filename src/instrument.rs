//! # Instrument Model
//!
//! Static per-instrument configuration: string count, standard tuning, fret range.
//!
//! The table is a frozen `static` initialized at compile time and never mutated,
//! so it can be read from any thread without synchronization. Diagrams carry an
//! owned [`InstrumentConfig`] copy of their entry so they stay value-like on the
//! wire; [`InstrumentConfig::is_recognized`] checks a carried copy against the table.
//!
//! ## String numbering
//! String 1 is the lowest-pitched string and corresponds to index 0 of the
//! tuning array. For guitar: `1=E 2=A 3=D 4=G 5=B 6=E`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FretworkError;

/// Supported fretted instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Guitar,
    Ukulele,
    Mandolin,
}

/// Compile-time entry in the instrument table.
struct InstrumentSpec {
    kind: InstrumentType,
    string_count: u8,
    standard_tuning: &'static [&'static str],
    max_fret: i8,
}

static INSTRUMENTS: [InstrumentSpec; 3] = [
    InstrumentSpec {
        kind: InstrumentType::Guitar,
        string_count: 6,
        standard_tuning: &["E", "A", "D", "G", "B", "E"],
        max_fret: 24,
    },
    InstrumentSpec {
        kind: InstrumentType::Ukulele,
        string_count: 4,
        standard_tuning: &["G", "C", "E", "A"],
        max_fret: 18,
    },
    InstrumentSpec {
        kind: InstrumentType::Mandolin,
        string_count: 4,
        standard_tuning: &["G", "D", "A", "E"],
        max_fret: 20,
    },
];

impl InstrumentType {
    pub const ALL: [InstrumentType; 3] = [
        InstrumentType::Guitar,
        InstrumentType::Ukulele,
        InstrumentType::Mandolin,
    ];

    fn spec(self) -> &'static InstrumentSpec {
        // The table is ordered like the enum.
        &INSTRUMENTS[self as usize]
    }

    /// Owned configuration for this instrument.
    pub fn config(self) -> InstrumentConfig {
        let spec = self.spec();
        InstrumentConfig {
            kind: spec.kind,
            string_count: spec.string_count,
            standard_tuning: spec.standard_tuning.iter().map(|n| n.to_string()).collect(),
            fret_range: FretRange {
                min: 0,
                max: spec.max_fret,
            },
        }
    }

    pub fn string_count(self) -> u8 {
        self.spec().string_count
    }

    pub fn max_fret(self) -> i8 {
        self.spec().max_fret
    }

    pub fn standard_tuning(self) -> &'static [&'static str] {
        self.spec().standard_tuning
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentType::Guitar => "guitar",
            InstrumentType::Ukulele => "ukulele",
            InstrumentType::Mandolin => "mandolin",
        }
    }

    /// Parse an instrument name such as `"guitar"` (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guitar" => Some(InstrumentType::Guitar),
            "ukulele" | "uke" => Some(InstrumentType::Ukulele),
            "mandolin" => Some(InstrumentType::Mandolin),
            _ => None,
        }
    }

    /// Like [`InstrumentType::from_str`] but with an error naming the input.
    pub fn parse(s: &str) -> Result<Self, FretworkError> {
        Self::from_str(s).ok_or_else(|| FretworkError::UnknownInstrument(s.to_string()))
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playable fret range; `min` is always the nut (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretRange {
    pub min: i8,
    pub max: i8,
}

/// Instrument configuration as carried by a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentConfig {
    #[serde(rename = "type")]
    pub kind: InstrumentType,
    pub string_count: u8,
    pub standard_tuning: Vec<String>,
    pub fret_range: FretRange,
}

impl InstrumentConfig {
    /// Whether this configuration matches the static table entry for its type.
    pub fn is_recognized(&self) -> bool {
        *self == self.kind.config()
    }

    pub fn max_fret(&self) -> i8 {
        self.fret_range.max
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        InstrumentType::Guitar.config()
    }
}
