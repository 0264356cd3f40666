//! Validation result types.

use serde::Serialize;
use thiserror::Error;

/// Error kinds, one per defect category.
///
/// Each variant carries only the fields relevant to its kind. Serialized with a
/// `type` tag (`"invalid_finger"`, ...) for the UI layer.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationError {
    /// An id, name, positions list or instrument is absent or unusable.
    #[error("Missing required {field}: {message}")]
    MissingRequired { field: String, message: String },

    /// String number out of range or duplicated.
    #[error("Invalid string {string_number}: {message}")]
    InvalidString { string_number: u8, message: String },

    /// Fret outside `[-1, max_fret]`.
    #[error("Invalid fret {fret} on string {string_number} (allowed -1..={max_fret})")]
    InvalidFret { string_number: u8, fret: i8, max_fret: i8 },

    /// Bad finger value, fret/finger inconsistency, or one finger on two frets.
    #[error("Invalid finger {finger}: {message}")]
    InvalidFinger {
        /// `None` when the defect spans several strings (finger conflicts).
        string_number: Option<u8>,
        finger: i8,
        frets: Vec<i8>,
        message: String,
    },

    /// Malformed barre or mismatched barre markers on positions.
    #[error("Invalid barre: {message}")]
    InvalidBarre { message: String },

    /// Fret span exceeds what a hand can physically reach.
    #[error("Impossible stretch of {span} frets (maximum {max_span})")]
    ImpossibleStretch { span: i8, max_span: i8 },
}

impl ValidationError {
    /// Wire code for this kind, e.g. `"invalid_barre"`.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingRequired { .. } => "missing_required",
            ValidationError::InvalidString { .. } => "invalid_string",
            ValidationError::InvalidFret { .. } => "invalid_fret",
            ValidationError::InvalidFinger { .. } => "invalid_finger",
            ValidationError::InvalidBarre { .. } => "invalid_barre",
            ValidationError::ImpossibleStretch { .. } => "impossible_stretch",
        }
    }
}

/// How much a warning matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Score deduction applied per warning of this severity.
    pub fn penalty(self) -> f64 {
        match self {
            Severity::High => 0.2,
            Severity::Medium => 0.1,
            Severity::Low => 0.05,
        }
    }
}

/// Advisory finding; never blocks acceptance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub code: WarningKind,
    pub message: String,
    pub severity: Severity,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    StretchAboveDifficulty,
    DifficultyMismatch,
    FingerOrder,
    HighFret,
    IncompleteChord,
    MissingStrings,
}

/// Outcome of validating one diagram. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    /// Quality score in `[0, 1]`.
    pub score: f64,
}

impl ValidationResult {
    /// Build a result; validity and score are derived, never set independently.
    ///
    /// Any error forces the score to 0. Otherwise each warning deducts its
    /// severity penalty from 1.0, floored at 0.
    pub fn from_findings(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        let score = if errors.is_empty() {
            let penalty: f64 = warnings.iter().map(|w| w.severity.penalty()).sum();
            (1.0 - penalty).max(0.0)
        } else {
            0.0
        };
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            score,
        }
    }

    pub fn has_error(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code() == code)
    }

    pub fn error_count(&self, code: &str) -> usize {
        self.errors.iter().filter(|e| e.code() == code).count()
    }

    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.code == kind)
    }

    /// Every error rendered as a message, in discovery order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Switches for the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationOptions {
    /// Require exactly one position per instrument string (error instead of warning).
    pub require_all_strings: bool,
}
