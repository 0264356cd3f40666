//! JSON serialization with option-controlled sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::musicxml::to_musicxml_frame;
use crate::diagram::{
    AlternativeFingering, BarreChord, ChordDiagram, ChordNotes, DiagramMetadata, DifficultyLevel, Localization,
    StringPosition,
};
use crate::difficulty::assess_difficulty;
use crate::error::{FretworkError, Result};
use crate::instrument::{InstrumentConfig, InstrumentType};
use crate::theory::analyze_notes;
use crate::transform::generate_id;
use crate::validation::{validate, validate_strict, ValidationOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerializeOptions {
    /// Embed the MusicXML `<harmony>` frame markup under `"frame"`.
    /// Also read from the `includeSvg` key.
    #[serde(alias = "includeSvg")]
    pub include_frame: bool,
    pub include_metadata: bool,
    pub include_alternatives: bool,
    /// Single-line JSON instead of pretty-printed.
    pub compact: bool,
    /// Refuse to emit a diagram that fails validation.
    pub validate: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            include_frame: false,
            include_metadata: true,
            include_alternatives: true,
            compact: false,
            validate: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeserializeOptions {
    pub validate: bool,
    /// Fail on validation errors instead of logging them.
    pub strict: bool,
    /// Back-fill a missing id, difficulty, notes and metadata.
    pub fill_defaults: bool,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            validate: true,
            strict: false,
            fill_defaults: true,
        }
    }
}

/// Either a bare instrument name or a full configuration object.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawInstrument {
    Kind(InstrumentType),
    Config(InstrumentConfig),
}

/// Raw metadata for JSON deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    source: Option<String>,
    popularity_score: Option<f64>,
    is_verified: Option<bool>,
    tags: Option<Vec<String>>,
}

/// Raw diagram for JSON deserialization; every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawChordDiagram {
    id: Option<String>,
    name: Option<String>,
    instrument: Option<RawInstrument>,
    positions: Option<Vec<StringPosition>>,
    barre: Option<BarreChord>,
    difficulty: Option<DifficultyLevel>,
    alternatives: Option<Vec<AlternativeFingering>>,
    notes: Option<ChordNotes>,
    localization: Option<Localization>,
    metadata: Option<RawMetadata>,
    capo_position: Option<u8>,
}

fn to_object(diagram: &ChordDiagram, options: &SerializeOptions) -> Result<Value> {
    if options.validate {
        validate_strict(diagram, &ValidationOptions::default())?;
    }

    let mut value = serde_json::to_value(diagram)?;
    if let Value::Object(map) = &mut value {
        if !options.include_metadata {
            map.remove("metadata");
        }
        if !options.include_alternatives {
            map.remove("alternatives");
        }
        if options.include_frame {
            map.insert("frame".to_string(), Value::String(to_musicxml_frame(diagram)?));
        }
    }
    Ok(value)
}

fn render(value: &Value, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

/// Serialize a diagram to JSON.
///
/// With `validate` on (the default) an invalid diagram is refused with
/// [`FretworkError::Validation`].
pub fn serialize(diagram: &ChordDiagram, options: &SerializeOptions) -> Result<String> {
    render(&to_object(diagram, options)?, options.compact)
}

/// Serialize several diagrams as one JSON array. Any invalid diagram fails the whole call.
pub fn serialize_collection(diagrams: &[ChordDiagram], options: &SerializeOptions) -> Result<String> {
    let values = diagrams
        .iter()
        .map(|d| to_object(d, options))
        .collect::<Result<Vec<Value>>>()?;
    render(&Value::Array(values), options.compact)
}

fn build_metadata(raw: Option<RawMetadata>, fill_defaults: bool) -> Result<DiagramMetadata> {
    let raw = match raw {
        Some(raw) => raw,
        None if fill_defaults => return Ok(DiagramMetadata::new("import", Vec::new())),
        None => return Err(FretworkError::MissingField("metadata".to_string())),
    };

    let defaults = DiagramMetadata::new("import", Vec::new());
    let require = |field: &str| {
        if fill_defaults {
            Ok(())
        } else {
            Err(FretworkError::MissingField(format!("metadata.{}", field)))
        }
    };

    let created_at = match raw.created_at {
        Some(at) => at,
        None => {
            require("createdAt")?;
            defaults.created_at
        }
    };
    let source = match raw.source {
        Some(source) => source,
        None => {
            require("source")?;
            defaults.source
        }
    };

    Ok(DiagramMetadata {
        created_at,
        updated_at: raw.updated_at.unwrap_or(created_at),
        source,
        popularity_score: raw.popularity_score.unwrap_or(defaults.popularity_score).clamp(0.0, 1.0),
        is_verified: raw.is_verified.unwrap_or(false),
        tags: raw.tags.unwrap_or_default(),
    })
}

fn build_diagram(raw: RawChordDiagram, options: &DeserializeOptions) -> Result<ChordDiagram> {
    let name = raw.name.ok_or_else(|| FretworkError::MissingField("name".to_string()))?;
    let instrument = match raw.instrument {
        Some(RawInstrument::Kind(kind)) => kind.config(),
        Some(RawInstrument::Config(config)) => config,
        None => return Err(FretworkError::MissingField("instrument".to_string())),
    };
    let mut positions = raw
        .positions
        .ok_or_else(|| FretworkError::MissingField("positions".to_string()))?;
    positions.sort_by_key(|p| p.string_number);

    let id = match raw.id {
        Some(id) => id,
        None if options.fill_defaults => generate_id(&name, instrument.kind),
        None => return Err(FretworkError::MissingField("id".to_string())),
    };
    let difficulty = match raw.difficulty {
        Some(difficulty) => difficulty,
        None if options.fill_defaults => assess_difficulty(&positions, raw.barre.as_ref()),
        None => return Err(FretworkError::MissingField("difficulty".to_string())),
    };
    let notes = match raw.notes {
        Some(notes) => notes,
        None if options.fill_defaults => analyze_notes(
            &name,
            &positions,
            &instrument.standard_tuning,
            raw.capo_position.unwrap_or(0),
            true,
        ),
        None => ChordNotes::default(),
    };
    let metadata = build_metadata(raw.metadata, options.fill_defaults)?;

    Ok(ChordDiagram {
        id,
        name,
        instrument,
        positions,
        barre: raw.barre,
        difficulty,
        alternatives: raw.alternatives.unwrap_or_default(),
        notes,
        localization: raw.localization.unwrap_or_default(),
        metadata,
        capo_position: raw.capo_position,
    })
}

fn check(diagram: ChordDiagram, options: &DeserializeOptions) -> Result<ChordDiagram> {
    if !options.validate {
        return Ok(diagram);
    }
    let result = validate(&diagram);
    if result.is_valid {
        return Ok(diagram);
    }
    if options.strict {
        return Err(FretworkError::Validation {
            diagram_id: diagram.id.clone(),
            messages: result.error_messages(),
        });
    }
    warn!(
        id = %diagram.id,
        errors = result.errors.len(),
        "returning chord diagram that failed validation: {}",
        result.error_messages().join("; ")
    );
    Ok(diagram)
}

/// Parse a diagram from JSON.
///
/// `instrument` may be a bare name (`"ukulele"`) or a full configuration. With
/// `fill_defaults`, a missing id, difficulty, notes or metadata is derived;
/// without it those fields are required. Failed validation is an error only in
/// `strict` mode; otherwise it is logged and the diagram returned as is.
pub fn deserialize(json: &str, options: &DeserializeOptions) -> Result<ChordDiagram> {
    let raw: RawChordDiagram = serde_json::from_str(json)?;
    check(build_diagram(raw, options)?, options)
}

/// Parse a JSON array of diagrams, applying the same rules to each item.
pub fn deserialize_collection(json: &str, options: &DeserializeOptions) -> Result<Vec<ChordDiagram>> {
    let raws: Vec<RawChordDiagram> = serde_json::from_str(json)?;
    raws.into_iter()
        .map(|raw| check(build_diagram(raw, options)?, options))
        .collect()
}

/// Serialize and parse back, then compare the musically identifying fields.
///
/// Metadata timestamps and derived notes are not compared.
pub fn verify_round_trip(diagram: &ChordDiagram) -> Result<bool> {
    let json = serialize(
        diagram,
        &SerializeOptions {
            validate: false,
            ..SerializeOptions::default()
        },
    )?;
    let back = deserialize(
        &json,
        &DeserializeOptions {
            validate: false,
            ..DeserializeOptions::default()
        },
    )?;

    Ok(back.id == diagram.id
        && back.name == diagram.name
        && back.instrument == diagram.instrument
        && back.positions == diagram.positions
        && back.barre == diagram.barre
        && back.difficulty == diagram.difficulty
        && back.capo_position == diagram.capo_position
        && back.alternatives == diagram.alternatives)
}
