//! # Chord Diagram Types
//!
//! This module defines the chord-diagram data model and its JSON wire shape.
//!
//! ## Type Hierarchy
//! ```text
//! ChordDiagram
//!   ├── id, name
//!   ├── instrument: InstrumentConfig
//!   ├── positions: Vec<StringPosition>   (one per string)
//!   ├── barre: Option<BarreChord>
//!   ├── difficulty: DifficultyLevel
//!   ├── alternatives: Vec<AlternativeFingering>
//!   ├── notes: ChordNotes (root, notes, intervals, isStandardTuning)
//!   ├── localization: Localization (names / descriptions / fingeringInstructions per locale)
//!   ├── metadata: DiagramMetadata (timestamps, source, popularity, tags)
//!   └── capoPosition: Option<u8>
//! ```
//!
//! ## Position encoding
//! - `fret = -1` muted, `finger = -1`
//! - `fret = 0` open, `finger = 0`
//! - `fret > 0` fretted, `finger` in `1..=4` (index to pinky)
//!
//! Values outside those ranges are representable on purpose: diagrams arrive
//! from editors and generators, and the validation engine must be able to
//! report exactly what is wrong with them.
//!
//! ## Ownership
//! Diagrams are plain values. Transforms in [`crate::transform`] take `&ChordDiagram`
//! and return a new diagram; nothing mutates a diagram shared between collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::instrument::InstrumentConfig;

/// Fret value for a muted string.
pub const MUTED: i8 = -1;
/// Fret value for an open string.
pub const OPEN: i8 = 0;

/// Skill tier required to play a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
        DifficultyLevel::Expert,
    ];

    /// Largest fret stretch a player at this tier is expected to manage.
    pub fn max_stretch(self) -> i8 {
        match self {
            DifficultyLevel::Beginner => 2,
            DifficultyLevel::Intermediate => 3,
            DifficultyLevel::Advanced => 4,
            DifficultyLevel::Expert => 5,
        }
    }

    /// Fixed ordinal used for sorting (beginner < intermediate < advanced < expert).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(DifficultyLevel::Beginner),
            "intermediate" => Some(DifficultyLevel::Intermediate),
            "advanced" => Some(DifficultyLevel::Advanced),
            "expert" => Some(DifficultyLevel::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one string does in a chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringPosition {
    pub string_number: u8,
    pub fret: i8,
    pub finger: i8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_barre: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barre_span: Option<u8>,
}

impl StringPosition {
    pub fn muted(string_number: u8) -> Self {
        Self::new(string_number, MUTED, MUTED)
    }

    pub fn open(string_number: u8) -> Self {
        Self::new(string_number, OPEN, 0)
    }

    pub fn fretted(string_number: u8, fret: i8, finger: i8) -> Self {
        Self::new(string_number, fret, finger)
    }

    pub fn new(string_number: u8, fret: i8, finger: i8) -> Self {
        Self {
            string_number,
            fret,
            finger,
            is_barre: None,
            barre_span: None,
        }
    }

    /// Mark this position as held down by a barre covering `span` strings.
    pub fn with_barre(mut self, span: u8) -> Self {
        self.is_barre = Some(true);
        self.barre_span = Some(span);
        self
    }

    pub fn is_muted(&self) -> bool {
        self.fret == MUTED
    }

    pub fn is_open(&self) -> bool {
        self.fret == OPEN
    }

    pub fn is_fretted(&self) -> bool {
        self.fret > OPEN
    }

    pub fn is_barre(&self) -> bool {
        self.is_barre.unwrap_or(false)
    }
}

/// One finger laid across several strings at the same fret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarreChord {
    pub fret: i8,
    pub finger: i8,
    pub start_string: u8,
    pub end_string: u8,
    pub is_partial: bool,
}

impl BarreChord {
    /// Number of strings covered, inclusive of both ends.
    pub fn span(&self) -> u8 {
        self.end_string.saturating_sub(self.start_string) + 1
    }

    pub fn covers(&self, string_number: u8) -> bool {
        (self.start_string..=self.end_string).contains(&string_number)
    }
}

/// An alternative way to finger the same chord; owned by its parent diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeFingering {
    pub id: String,
    pub description: String,
    pub positions: Vec<StringPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barre: Option<BarreChord>,
    pub difficulty: DifficultyLevel,
    #[serde(default)]
    pub notes: ChordNotes,
}

/// Musical content of a chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordNotes {
    pub root: String,
    pub notes: Vec<String>,
    /// Semitones above the root, one per entry in `notes`.
    pub intervals: Vec<u8>,
    pub is_standard_tuning: bool,
}

impl Default for ChordNotes {
    fn default() -> Self {
        Self {
            root: String::new(),
            notes: Vec::new(),
            intervals: Vec::new(),
            is_standard_tuning: true,
        }
    }
}

/// Localized text keyed by locale code (`"en"`, `"fr"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
    #[serde(default)]
    pub fingering_instructions: BTreeMap<String, String>,
}

/// Bookkeeping attached to every diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source: String,
    /// Popularity in `[0, 1]`.
    pub popularity_score: f64,
    pub is_verified: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DiagramMetadata {
    /// Default metadata for a freshly created diagram: unverified, popularity 0.5.
    pub fn new(source: &str, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            source: source.to_string(),
            popularity_score: 0.5,
            is_verified: false,
            tags,
        }
    }
}

impl Default for DiagramMetadata {
    fn default() -> Self {
        Self::new("user", Vec::new())
    }
}

/// The aggregate root: one chord shape on one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordDiagram {
    pub id: String,
    pub name: String,
    pub instrument: InstrumentConfig,
    pub positions: Vec<StringPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barre: Option<BarreChord>,
    pub difficulty: DifficultyLevel,
    #[serde(default)]
    pub alternatives: Vec<AlternativeFingering>,
    #[serde(default)]
    pub notes: ChordNotes,
    #[serde(default)]
    pub localization: Localization,
    pub metadata: DiagramMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capo_position: Option<u8>,
}

impl ChordDiagram {
    /// Positions that press a fret (excludes open and muted strings).
    pub fn fretted(&self) -> impl Iterator<Item = &StringPosition> {
        self.positions.iter().filter(|p| p.is_fretted())
    }

    /// Highest non-muted fret, 0 for an all-open or all-muted chord.
    pub fn max_fret(&self) -> i8 {
        max_fret(&self.positions)
    }

    pub fn position(&self, string_number: u8) -> Option<&StringPosition> {
        self.positions.iter().find(|p| p.string_number == string_number)
    }

    /// Frets in string order, as used by the compact form and the CLI.
    pub fn fret_pattern(&self) -> Vec<i8> {
        let mut sorted: Vec<&StringPosition> = self.positions.iter().collect();
        sorted.sort_by_key(|p| p.string_number);
        sorted.iter().map(|p| p.fret).collect()
    }
}

/// Highest non-muted fret in a set of positions.
pub fn max_fret(positions: &[StringPosition]) -> i8 {
    positions
        .iter()
        .filter(|p| !p.is_muted())
        .map(|p| p.fret)
        .max()
        .unwrap_or(0)
        .max(0)
}

/// `(lowest, highest)` fretted fret, or `None` when nothing is fretted.
pub fn fretted_bounds(positions: &[StringPosition]) -> Option<(i8, i8)> {
    let frets = positions.iter().filter(|p| p.is_fretted()).map(|p| p.fret);
    let (mut lo, mut hi) = (i8::MAX, i8::MIN);
    let mut any = false;
    for fret in frets {
        any = true;
        lo = lo.min(fret);
        hi = hi.max(fret);
    }
    any.then_some((lo, hi))
}

/// Fret stretch: highest minus lowest fretted position (0 when fewer than two).
pub fn fret_stretch(positions: &[StringPosition]) -> i8 {
    fretted_bounds(positions).map(|(lo, hi)| hi - lo).unwrap_or(0)
}
