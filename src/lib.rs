//! Chord diagrams for fretted instruments.
//!
//! Model, validate, classify, retune and search guitar, ukulele and mandolin
//! chord shapes. Every operation is pure: transforms take a diagram by
//! reference and return a new one.

pub mod config;
pub mod diagram;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod instrument;
pub mod pitch;
pub mod search;
pub mod serialize;
pub mod theory;
pub mod transform;
pub mod tuning;
pub mod validation;

pub use config::FretworkConfig;
pub use diagram::*;
pub use difficulty::assess_difficulty;
pub use error::*;
pub use generator::generate;
pub use instrument::{FretRange, InstrumentConfig, InstrumentType};
pub use search::{search, SearchCriteria, SearchOptions, SearchResults};
pub use serialize::{deserialize, from_compact_format, serialize, to_compact_format};
pub use transform::{add_alternative_fingering, clone_diagram, create, create_with_barre, transpose};
pub use tuning::{compare_tunings, convert_chord_between_tunings, ConversionOptions, ConversionResult, TuningInfo};
pub use validation::{validate, ValidationResult};

/// Convert a diagram between two preset tunings named by id (e.g. `"standard"`, `"drop-d"`).
///
/// # Examples
/// ```
/// use fretwork::{convert, from_compact_format, ConversionOptions};
///
/// let c = from_compact_format("C:guitar:x32010").unwrap();
/// let result = convert(&c, "standard", "drop-d", &ConversionOptions::default()).unwrap();
/// assert!(result.success);
/// assert!(convert(&c, "standard", "nashville", &ConversionOptions::default()).is_err());
/// ```
pub fn convert(diagram: &ChordDiagram, from: &str, to: &str, options: &ConversionOptions) -> Result<ConversionResult> {
    let from = tuning::tuning_by_id(from)?;
    let to = tuning::tuning_by_id(to)?;
    Ok(convert_chord_between_tunings(diagram, &from, &to, options))
}
