//! Tuning presets catalog.
//!
//! Like the instrument table, the catalog is a frozen `static`; lookups hand out
//! owned [`TuningInfo`] values.

use serde::{Deserialize, Serialize};

use crate::diagram::DifficultyLevel;
use crate::error::{FretworkError, Result};
use crate::instrument::InstrumentType;
use crate::pitch::{normalize, parse_pitch_class};

/// Named tuning families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TuningPreset {
    Standard,
    DropD,
    DoubleDropD,
    Dadgad,
    OpenG,
    OpenD,
    OpenE,
    OpenC,
    HalfStepDown,
    WholeStepDown,
    DropC,
    LowG,
    Baritone,
    DTuning,
    CrossA,
    Custom,
}

/// A tuning: open-string notes from string 1 (lowest) upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningInfo {
    pub id: String,
    pub name: String,
    pub instrument: InstrumentType,
    pub notes: Vec<String>,
    pub preset: TuningPreset,
    pub is_standard: bool,
    pub difficulty: DifficultyLevel,
    #[serde(default)]
    pub genres: Vec<String>,
}

struct TuningSpec {
    id: &'static str,
    name: &'static str,
    instrument: InstrumentType,
    notes: &'static [&'static str],
    preset: TuningPreset,
    difficulty: DifficultyLevel,
    genres: &'static [&'static str],
}

impl TuningSpec {
    fn to_info(&self) -> TuningInfo {
        TuningInfo {
            id: self.id.to_string(),
            name: self.name.to_string(),
            instrument: self.instrument,
            notes: self.notes.iter().map(|n| n.to_string()).collect(),
            preset: self.preset,
            is_standard: self.preset == TuningPreset::Standard,
            difficulty: self.difficulty,
            genres: self.genres.iter().map(|g| g.to_string()).collect(),
        }
    }
}

use DifficultyLevel::{Advanced, Beginner, Intermediate};
use InstrumentType::{Guitar, Mandolin, Ukulele};

static PRESETS: &[TuningSpec] = &[
    TuningSpec { id: "standard", name: "Standard", instrument: Guitar, notes: &["E", "A", "D", "G", "B", "E"], preset: TuningPreset::Standard, difficulty: Beginner, genres: &["pop", "rock", "folk", "jazz", "blues"] },
    TuningSpec { id: "drop-d", name: "Drop D", instrument: Guitar, notes: &["D", "A", "D", "G", "B", "E"], preset: TuningPreset::DropD, difficulty: Beginner, genres: &["rock", "metal", "folk"] },
    TuningSpec { id: "double-drop-d", name: "Double Drop D", instrument: Guitar, notes: &["D", "A", "D", "G", "B", "D"], preset: TuningPreset::DoubleDropD, difficulty: Intermediate, genres: &["folk", "rock"] },
    TuningSpec { id: "dadgad", name: "DADGAD", instrument: Guitar, notes: &["D", "A", "D", "G", "A", "D"], preset: TuningPreset::Dadgad, difficulty: Intermediate, genres: &["celtic", "folk"] },
    TuningSpec { id: "open-g", name: "Open G", instrument: Guitar, notes: &["D", "G", "D", "G", "B", "D"], preset: TuningPreset::OpenG, difficulty: Intermediate, genres: &["blues", "rock", "slide"] },
    TuningSpec { id: "open-d", name: "Open D", instrument: Guitar, notes: &["D", "A", "D", "F#", "A", "D"], preset: TuningPreset::OpenD, difficulty: Intermediate, genres: &["blues", "folk", "slide"] },
    TuningSpec { id: "open-e", name: "Open E", instrument: Guitar, notes: &["E", "B", "E", "G#", "B", "E"], preset: TuningPreset::OpenE, difficulty: Intermediate, genres: &["blues", "slide"] },
    TuningSpec { id: "open-c", name: "Open C", instrument: Guitar, notes: &["C", "G", "C", "G", "C", "E"], preset: TuningPreset::OpenC, difficulty: Advanced, genres: &["folk", "ambient"] },
    TuningSpec { id: "half-step-down", name: "Half-step down", instrument: Guitar, notes: &["Eb", "Ab", "Db", "Gb", "Bb", "Eb"], preset: TuningPreset::HalfStepDown, difficulty: Beginner, genres: &["rock", "blues", "grunge"] },
    TuningSpec { id: "whole-step-down", name: "Whole-step down", instrument: Guitar, notes: &["D", "G", "C", "F", "A", "D"], preset: TuningPreset::WholeStepDown, difficulty: Beginner, genres: &["metal", "rock"] },
    TuningSpec { id: "drop-c", name: "Drop C", instrument: Guitar, notes: &["C", "G", "C", "F", "A", "D"], preset: TuningPreset::DropC, difficulty: Intermediate, genres: &["metal"] },
    TuningSpec { id: "ukulele-standard", name: "Standard (GCEA)", instrument: Ukulele, notes: &["G", "C", "E", "A"], preset: TuningPreset::Standard, difficulty: Beginner, genres: &["pop", "hawaiian", "folk"] },
    TuningSpec { id: "ukulele-low-g", name: "Low G", instrument: Ukulele, notes: &["G", "C", "E", "A"], preset: TuningPreset::LowG, difficulty: Beginner, genres: &["jazz", "fingerstyle"] },
    TuningSpec { id: "ukulele-baritone", name: "Baritone (DGBE)", instrument: Ukulele, notes: &["D", "G", "B", "E"], preset: TuningPreset::Baritone, difficulty: Intermediate, genres: &["folk"] },
    TuningSpec { id: "ukulele-d", name: "D tuning (ADF#B)", instrument: Ukulele, notes: &["A", "D", "F#", "B"], preset: TuningPreset::DTuning, difficulty: Intermediate, genres: &["hawaiian", "vintage"] },
    TuningSpec { id: "mandolin-standard", name: "Standard (GDAE)", instrument: Mandolin, notes: &["G", "D", "A", "E"], preset: TuningPreset::Standard, difficulty: Beginner, genres: &["bluegrass", "folk", "classical"] },
    TuningSpec { id: "mandolin-cross-a", name: "Cross A (AEAE)", instrument: Mandolin, notes: &["A", "E", "A", "E"], preset: TuningPreset::CrossA, difficulty: Intermediate, genres: &["old-time", "fiddle"] },
];

/// Look up a preset by id.
pub fn find_tuning(id: &str) -> Option<TuningInfo> {
    PRESETS.iter().find(|spec| spec.id == id).map(TuningSpec::to_info)
}

/// Like [`find_tuning`] but with an error naming the id.
pub fn tuning_by_id(id: &str) -> Result<TuningInfo> {
    find_tuning(id).ok_or_else(|| FretworkError::UnknownTuning(id.to_string()))
}

/// Every preset for an instrument, standard first.
pub fn tunings_for(instrument: InstrumentType) -> Vec<TuningInfo> {
    PRESETS
        .iter()
        .filter(|spec| spec.instrument == instrument)
        .map(TuningSpec::to_info)
        .collect()
}

/// The standard tuning preset of an instrument.
pub fn standard_tuning(instrument: InstrumentType) -> TuningInfo {
    PRESETS
        .iter()
        .find(|spec| spec.instrument == instrument && spec.preset == TuningPreset::Standard)
        .map(TuningSpec::to_info)
        .unwrap_or_else(|| TuningInfo {
            id: format!("{}-standard", instrument),
            name: "Standard".to_string(),
            instrument,
            notes: instrument.standard_tuning().iter().map(|n| n.to_string()).collect(),
            preset: TuningPreset::Standard,
            is_standard: true,
            difficulty: DifficultyLevel::Beginner,
            genres: Vec::new(),
        })
}

impl TuningInfo {
    /// Build a user-defined tuning after checking every note name.
    ///
    /// # Examples
    /// ```
    /// use fretwork::{InstrumentType, TuningInfo};
    ///
    /// let tuning = TuningInfo::custom("Nashville-ish", InstrumentType::Guitar, &["E", "A", "D", "G", "B", "E"]).unwrap();
    /// assert!(tuning.is_standard);
    /// assert!(TuningInfo::custom("Bad", InstrumentType::Guitar, &["E", "A", "D", "G", "B", "X"]).is_err());
    /// ```
    pub fn custom(name: &str, instrument: InstrumentType, notes: &[&str]) -> Result<TuningInfo> {
        if notes.len() != instrument.string_count() as usize {
            return Err(FretworkError::Config(format!(
                "tuning '{}' has {} notes but {} has {} strings",
                name,
                notes.len(),
                instrument,
                instrument.string_count()
            )));
        }
        for note in notes {
            if parse_pitch_class(note).is_none() {
                return Err(FretworkError::InvalidNote(note.to_string()));
            }
        }

        let notes: Vec<String> = notes.iter().map(|n| n.trim().to_string()).collect();
        let is_standard = same_pitches(&notes, &standard_tuning(instrument).notes);
        let slug: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();

        Ok(TuningInfo {
            id: format!("custom-{}", slug),
            name: name.trim().to_string(),
            instrument,
            notes,
            preset: TuningPreset::Custom,
            is_standard,
            difficulty: DifficultyLevel::Intermediate,
            genres: Vec::new(),
        })
    }

    /// Open-string pitch classes; unparseable names become `None`.
    pub fn pitch_classes(&self) -> Vec<Option<u8>> {
        self.notes.iter().map(|n| parse_pitch_class(n)).collect()
    }

    /// Every string shifted by `semitones` (e.g. -1 for a half step down).
    pub fn shifted(&self, semitones: i32) -> Vec<u8> {
        self.pitch_classes()
            .into_iter()
            .flatten()
            .map(|pc| normalize(pc as i32 + semitones))
            .collect()
    }
}

fn same_pitches(a: &[String], b: &[String]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| parse_pitch_class(x).is_some() && parse_pitch_class(x) == parse_pitch_class(y))
}
