//! # Error Types
//!
//! This module defines the crate-level error type for fretwork.
//!
//! Validation itself never fails with this type: checks return a
//! [`ValidationResult`](crate::validation::ValidationResult) listing every defect.
//! `FretworkError` is reserved for the operations that must refuse their input:
//! the strict validation variants, (de)serialization, pattern parsing, and
//! configuration loading.
//!
//! ## Error Types
//! - `Validation` - Strict validation failed; carries every error message
//! - `Json` / `MissingField` - Malformed or incomplete JSON diagrams
//! - `CompactFormat` - Malformed compact strings (`C:guitar:x32010`)
//! - `InvalidPattern` / `InvalidNote` - Generator and tuning input errors
//! - `UnknownInstrument` / `UnknownTuning` - Lookup failures
//! - `Config` / `Yaml` / `Io` - Configuration loading
//! - `Xml` - MusicXML frame export
//!
//! ## Usage
//! ```rust
//! use fretwork::{from_compact_format, FretworkError};
//!
//! match from_compact_format("C:banjo:x32010") {
//!     Ok(diagram) => println!("Parsed {}", diagram.name),
//!     Err(FretworkError::UnknownInstrument(name)) => eprintln!("No such instrument: {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FretworkError>;

#[derive(Error, Debug)]
pub enum FretworkError {
    /// Strict validation failed.
    ///
    /// Aggregates every error message found on the diagram into one error.
    ///
    /// # Example
    /// ```
    /// # use fretwork::FretworkError;
    /// let err = FretworkError::Validation {
    ///     diagram_id: "c-major".to_string(),
    ///     messages: vec!["Name is required".to_string(), "String 7 is out of range".to_string()],
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Chord diagram 'c-major' failed validation: Name is required; String 7 is out of range"
    /// );
    /// ```
    #[error("Chord diagram '{diagram_id}' failed validation: {}", messages.join("; "))]
    Validation {
        diagram_id: String,
        messages: Vec<String>,
    },

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field required to build a diagram was absent and could not be back-filled.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Compact string could not be decoded or encoded.
    ///
    /// # Example
    /// ```
    /// # use fretwork::FretworkError;
    /// let err = FretworkError::CompactFormat {
    ///     input: "C:guitar".to_string(),
    ///     message: "expected at least 3 segments".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid compact chord 'C:guitar': expected at least 3 segments");
    /// ```
    #[error("Invalid compact chord '{input}': {message}")]
    CompactFormat { input: String, message: String },

    /// A fret pattern handed to the generator could not be parsed.
    #[error("Invalid fret pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A note name could not be parsed into a pitch class.
    #[error("Invalid note name: {0}")]
    InvalidNote(String),

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Unknown tuning: {0}")]
    UnknownTuning(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
