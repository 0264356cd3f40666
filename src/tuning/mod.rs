//! # Tuning & Capo Engine
//!
//! Preset tunings per instrument, tuning comparison, and conversion of a chord
//! shape from one tuning to another with optional capo search.
//!
//! ## Conversion model
//! Tunings are compared by pitch class only; octaves are not modelled. For each
//! sounding string the shape is moved by the nearest interval (`-6..=5`) between
//! the new effective open string (tuning note plus capo) and the old open string.
//! Fretted notes that fall below the nut or above the neck are muted. Open
//! strings stay open and are only counted as reproduced when the effective open
//! pitch is unchanged.
//!
//! ## Capo search
//! With `allow_capo`, every capo position from 0 to `max_capo_position` is
//! evaluated and the one reproducing the most strings wins (lowest capo on ties).
//! Converted frets are relative to the capo.
//!
//! ## Confidence
//! Weighted share of reproduced strings (open strings weigh half), minus 5 points
//! per newly muted string and `5 + capo` points for any capo, clamped to 0..=100.
//! `success` means no sounding string had to be muted.

mod convert;
mod presets;

#[cfg(test)]
mod tests;

pub use convert::{
    apply_conversion, calculate_optimal_capo, compare_tunings, convert_chord_between_tunings, evaluate_capo,
    CapoCandidate, ConversionDifficulty, ConversionOptions, ConversionResult, TuningComparison, CAPO_LIMIT,
};
pub use presets::{find_tuning, standard_tuning, tuning_by_id, tunings_for, TuningInfo, TuningPreset};
