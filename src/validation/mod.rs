//! # Validation Engine
//!
//! Structural, musical and physical-playability checks for chord diagrams.
//!
//! ## Purpose
//! A diagram may deserialize cleanly yet be unplayable or musically wrong. This
//! module runs every check independently and merges the results, so callers get
//! the complete defect list in one pass.
//!
//! ## Errors (block acceptance)
//! - `missing_required` - empty id/name, no positions, unrecognized instrument
//! - `invalid_string` - string number out of range or duplicated
//! - `invalid_fret` - fret outside `[-1, max_fret]`
//! - `invalid_finger` - bad finger, fret/finger mismatch, or a finger on two frets
//! - `invalid_barre` - malformed barre or mismatched barre markers
//! - `impossible_stretch` - span above 5 frets, whatever the declared difficulty
//!
//! ## Warnings (reduce the score)
//! - stretch above the declared difficulty's limit
//! - declared difficulty differs from [`assess_difficulty`](crate::assess_difficulty)
//! - finger-order inversions
//! - frets above 12
//! - fewer than 3 unique notes
//! - (non-strict) fewer positions than strings
//!
//! ## Score
//! Starts at 1.0. Any error forces 0. Each warning deducts 0.2 / 0.1 / 0.05 for
//! high / medium / low severity, floored at 0.
//!
//! ## Entry Points
//! - [`validate()`] - one diagram, default options
//! - [`validate_with_options()`] - one diagram, explicit options
//! - [`validate_batch()`] - a collection, keyed by diagram id
//! - [`validate_strict()`] / [`validate_batch_strict()`] - error with every message instead of a result

mod checks;
mod types;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use crate::diagram::ChordDiagram;
use crate::error::{FretworkError, Result};

pub use checks::MAX_STRETCH;
pub use types::{
    Severity, ValidationError, ValidationOptions, ValidationResult, ValidationWarning, WarningKind,
};

/// Validate a diagram with default options.
///
/// # Example
/// ```rust
/// use fretwork::{create, validate, InstrumentType, StringPosition};
///
/// let c = create("C", InstrumentType::Guitar, vec![
///     StringPosition::muted(1),
///     StringPosition::fretted(2, 3, 3),
///     StringPosition::fretted(3, 2, 2),
///     StringPosition::open(4),
///     StringPosition::fretted(5, 1, 1),
///     StringPosition::open(6),
/// ]);
/// let result = validate(&c);
/// assert!(result.is_valid);
/// assert_eq!(result.score, 1.0);
/// ```
pub fn validate(diagram: &ChordDiagram) -> ValidationResult {
    validate_with_options(diagram, &ValidationOptions::default())
}

/// Validate a diagram.
///
/// Runs the structural, position, barre, finger-conflict and stretch checks,
/// then the advisory playability checks, and merges all findings.
pub fn validate_with_options(diagram: &ChordDiagram, options: &ValidationOptions) -> ValidationResult {
    let mut findings = checks::Findings::default();

    checks::check_structure(diagram, options, &mut findings);
    checks::check_positions(diagram, &mut findings);
    checks::check_barre(diagram, &mut findings);
    checks::check_finger_conflicts(diagram, &mut findings);
    checks::check_stretch(diagram, &mut findings);
    if !diagram.positions.is_empty() {
        checks::check_playability(diagram, &mut findings);
    }

    ValidationResult::from_findings(findings.errors, findings.warnings)
}

/// Validate a collection; the map is keyed by diagram id.
///
/// Diagrams sharing an id overwrite each other; the last one wins.
pub fn validate_batch(diagrams: &[ChordDiagram], options: &ValidationOptions) -> BTreeMap<String, ValidationResult> {
    diagrams
        .iter()
        .map(|d| (d.id.clone(), validate_with_options(d, options)))
        .collect()
}

/// Validate and fail with a single aggregated error if anything is wrong.
///
/// Warnings never cause a failure.
pub fn validate_strict(diagram: &ChordDiagram, options: &ValidationOptions) -> Result<()> {
    let result = validate_with_options(diagram, options);
    if result.is_valid {
        Ok(())
    } else {
        Err(FretworkError::Validation {
            diagram_id: diagram.id.clone(),
            messages: result.error_messages(),
        })
    }
}

/// Strict variant of [`validate_batch`]: the error names every failing diagram.
pub fn validate_batch_strict(diagrams: &[ChordDiagram], options: &ValidationOptions) -> Result<()> {
    let messages: Vec<String> = diagrams
        .iter()
        .flat_map(|d| {
            let result = validate_with_options(d, options);
            result
                .error_messages()
                .into_iter()
                .map(move |m| format!("{}: {}", d.id, m))
                .collect::<Vec<_>>()
        })
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(FretworkError::Validation {
            diagram_id: format!("batch of {}", diagrams.len()),
            messages,
        })
    }
}
