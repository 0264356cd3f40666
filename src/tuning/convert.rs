//! Tuning comparison and chord conversion between tunings.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::presets::TuningInfo;
use crate::diagram::{BarreChord, ChordDiagram, StringPosition, OPEN};
use crate::difficulty::assess_difficulty;
use crate::pitch::{nearest_interval, normalize};
use crate::theory::analyze_notes;

/// Highest capo position ever considered.
pub const CAPO_LIMIT: u8 = 12;
/// Open strings count for less than fretted ones when scoring a conversion.
const OPEN_STRING_WEIGHT: f64 = 0.5;
/// Confidence lost per string that had to be muted.
const MUTE_PENALTY: f64 = 5.0;
/// Confidence lost for using a capo at all; each capo fret adds one more point.
const CAPO_PENALTY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionDifficulty {
    Easy,
    Medium,
    Hard,
}

/// String-by-string comparison of two tunings by pitch class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningComparison {
    /// Percentage of strings whose open pitch class agrees.
    pub similarity: f64,
    pub matching_strings: Vec<u8>,
    pub different_strings: Vec<u8>,
    pub conversion_difficulty: ConversionDifficulty,
}

/// Compare two tunings string by string.
///
/// Strings present in only one tuning count as different. Similarity is
/// `matching / max(len)` as a percentage: 80 or more is easy, 50 or more is
/// medium, anything lower is hard.
///
/// # Examples
/// ```
/// use fretwork::tuning::{compare_tunings, find_tuning, ConversionDifficulty};
///
/// let standard = find_tuning("standard").unwrap();
/// let drop_d = find_tuning("drop-d").unwrap();
/// let cmp = compare_tunings(&standard, &drop_d);
/// assert_eq!(cmp.different_strings, vec![1]);
/// assert_eq!(cmp.conversion_difficulty, ConversionDifficulty::Easy);
/// ```
pub fn compare_tunings(a: &TuningInfo, b: &TuningInfo) -> TuningComparison {
    let a_pcs = a.pitch_classes();
    let b_pcs = b.pitch_classes();
    let len = a_pcs.len().max(b_pcs.len());

    let mut matching_strings = Vec::new();
    let mut different_strings = Vec::new();
    for idx in 0..len {
        let string_number = (idx + 1) as u8;
        match (a_pcs.get(idx).copied().flatten(), b_pcs.get(idx).copied().flatten()) {
            (Some(x), Some(y)) if x == y => matching_strings.push(string_number),
            _ => different_strings.push(string_number),
        }
    }

    let similarity = if len == 0 {
        100.0
    } else {
        matching_strings.len() as f64 / len as f64 * 100.0
    };
    let conversion_difficulty = if similarity >= 80.0 {
        ConversionDifficulty::Easy
    } else if similarity >= 50.0 {
        ConversionDifficulty::Medium
    } else {
        ConversionDifficulty::Hard
    };

    TuningComparison {
        similarity,
        matching_strings,
        different_strings,
        conversion_difficulty,
    }
}

/// Knobs for [`convert_chord_between_tunings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    pub allow_capo: bool,
    /// Clamped to [`CAPO_LIMIT`].
    pub max_capo_position: u8,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            allow_capo: true,
            max_capo_position: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// No string had to be muted to keep its pitch.
    pub success: bool,
    /// 0 to 100.
    pub confidence: f64,
    pub original_positions: Vec<StringPosition>,
    /// Frets are relative to the capo when one is used.
    pub converted_positions: Vec<StringPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capo_position: Option<u8>,
    /// Strings that sounded before and are muted after conversion.
    #[serde(default)]
    pub muted_strings: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barre: Option<BarreChord>,
}

/// Outcome of trying one capo position.
#[derive(Debug, Clone, PartialEq)]
pub struct CapoCandidate {
    pub capo: u8,
    /// Strings that keep their pitch class. The optimizer ranks on this.
    pub reproduced: usize,
    /// Weighted count of strings that keep their pitch class, for confidence.
    pub coverage: f64,
    /// Weighted count of strings that sounded originally.
    pub considered: f64,
    pub positions: Vec<StringPosition>,
    pub muted_strings: Vec<u8>,
}

fn weight(position: &StringPosition) -> f64 {
    if position.is_open() {
        OPEN_STRING_WEIGHT
    } else {
        1.0
    }
}

/// Re-fret `positions` from `from` onto `to` with the capo at `capo`.
///
/// `source_capo` is the capo the shape was played with in `from`. Each fretted string moves by the nearest interval between the new effective
/// open string and the old one; strings that would leave `[0, max_fret - capo]`
/// are muted. Open strings stay open and only count as kept when the effective
/// open pitch is unchanged. Muted strings pass through.
pub fn evaluate_capo(
    positions: &[StringPosition],
    from: &TuningInfo,
    to: &TuningInfo,
    source_capo: u8,
    capo: u8,
    max_fret: i8,
) -> CapoCandidate {
    let from_pcs = from.pitch_classes();
    let to_pcs = to.pitch_classes();
    let mut candidate = CapoCandidate {
        capo,
        reproduced: 0,
        coverage: 0.0,
        considered: 0.0,
        positions: Vec::with_capacity(positions.len()),
        muted_strings: Vec::new(),
    };

    for position in positions {
        if position.is_muted() {
            candidate.positions.push(StringPosition::muted(position.string_number));
            continue;
        }
        candidate.considered += weight(position);

        let idx = (position.string_number as usize).saturating_sub(1);
        let (Some(old_open), Some(new_open)) = (
            from_pcs.get(idx).copied().flatten(),
            to_pcs.get(idx).copied().flatten(),
        ) else {
            candidate.positions.push(StringPosition::muted(position.string_number));
            candidate.muted_strings.push(position.string_number);
            continue;
        };

        let old_open = normalize(old_open as i32 + source_capo as i32);
        let effective_open = normalize(new_open as i32 + capo as i32);
        let shift = nearest_interval(effective_open, old_open);

        if position.is_open() {
            if shift == 0 {
                candidate.reproduced += 1;
                candidate.coverage += OPEN_STRING_WEIGHT;
            }
            candidate.positions.push(StringPosition::open(position.string_number));
            continue;
        }

        let relative = position.fret as i32 + shift;
        if relative < 0 || relative + capo as i32 > max_fret as i32 {
            candidate.positions.push(StringPosition::muted(position.string_number));
            candidate.muted_strings.push(position.string_number);
            continue;
        }

        candidate.reproduced += 1;
        candidate.coverage += 1.0;
        let converted = if relative == OPEN as i32 {
            StringPosition::open(position.string_number)
        } else {
            let finger = if (1..=4).contains(&position.finger) { position.finger } else { 1 };
            StringPosition::fretted(position.string_number, relative as i8, finger)
        };
        candidate.positions.push(converted);
    }

    candidate
}

/// Capo position in `0..=max_capo` that reproduces the most original pitches;
/// ties go to the lower capo. Open and fretted strings count alike here.
pub fn calculate_optimal_capo(
    positions: &[StringPosition],
    from: &TuningInfo,
    to: &TuningInfo,
    source_capo: u8,
    max_capo: u8,
    max_fret: i8,
) -> CapoCandidate {
    let mut best = evaluate_capo(positions, from, to, source_capo, 0, max_fret);
    for capo in 1..=max_capo.min(CAPO_LIMIT) {
        let candidate = evaluate_capo(positions, from, to, source_capo, capo, max_fret);
        debug!(capo, reproduced = candidate.reproduced, "evaluated capo position");
        if candidate.reproduced > best.reproduced {
            best = candidate;
        }
    }
    best
}

/// Carry the barre across when every barre string landed on the same new fret.
fn convert_barre(diagram: &ChordDiagram, converted: &mut [StringPosition]) -> Option<BarreChord> {
    let barre = diagram.barre.as_ref()?;
    let covered: Vec<i8> = diagram
        .positions
        .iter()
        .filter(|p| p.fret == barre.fret && barre.covers(p.string_number))
        .filter_map(|p| converted.iter().find(|c| c.string_number == p.string_number))
        .map(|c| c.fret)
        .collect();

    let new_fret = *covered.first()?;
    if new_fret <= OPEN || covered.len() < 2 || covered.iter().any(|f| *f != new_fret) {
        for position in converted.iter_mut() {
            position.is_barre = None;
            position.barre_span = None;
        }
        return None;
    }

    for position in converted.iter_mut() {
        let original = diagram.position(position.string_number);
        if original.is_some_and(|p| p.is_barre()) && position.fret == new_fret {
            position.is_barre = Some(true);
            position.barre_span = original.and_then(|p| p.barre_span);
        }
    }
    Some(BarreChord {
        fret: new_fret,
        ..barre.clone()
    })
}

/// Convert a diagram's shape from one tuning to another.
///
/// Never fails: problems lower the confidence or clear `success`. With
/// `allow_capo`, every capo position up to `max_capo_position` is tried and the
/// one reproducing the most strings wins. A capo already on the source diagram
/// is part of its sounding pitch, so a capoed shape converts to the pitches it
/// actually sounds.
pub fn convert_chord_between_tunings(
    diagram: &ChordDiagram,
    from: &TuningInfo,
    to: &TuningInfo,
    options: &ConversionOptions,
) -> ConversionResult {
    let max_capo = if options.allow_capo {
        options.max_capo_position.min(CAPO_LIMIT)
    } else {
        0
    };
    let max_fret = diagram.instrument.kind.max_fret();

    if from.notes.len() != to.notes.len() {
        warn!(
            from = %from.id,
            to = %to.id,
            "tunings have different string counts; unmatched strings will be muted"
        );
    }

    let source_capo = diagram.capo_position.unwrap_or(0);
    let best = calculate_optimal_capo(&diagram.positions, from, to, source_capo, max_capo, max_fret);
    let mut converted = best.positions;
    let barre = convert_barre(diagram, &mut converted);

    let confidence = if best.considered == 0.0 {
        0.0
    } else {
        let mut score = best.coverage / best.considered * 100.0;
        score -= best.muted_strings.len() as f64 * MUTE_PENALTY;
        if best.capo > 0 {
            score -= CAPO_PENALTY + best.capo as f64;
        }
        score.clamp(0.0, 100.0)
    };
    let success = best.considered > 0.0 && best.muted_strings.is_empty();

    debug!(
        diagram = %diagram.id,
        from = %from.id,
        to = %to.id,
        capo = best.capo,
        confidence,
        success,
        "converted chord between tunings"
    );

    ConversionResult {
        success,
        confidence,
        original_positions: diagram.positions.clone(),
        converted_positions: converted,
        capo_position: (best.capo > 0).then_some(best.capo),
        muted_strings: best.muted_strings,
        barre,
    }
}

/// Build a new diagram from a conversion result.
///
/// Difficulty is re-assessed and notes are analysed on the target tuning.
pub fn apply_conversion(diagram: &ChordDiagram, result: &ConversionResult, to: &TuningInfo) -> ChordDiagram {
    let mut next = diagram.clone();
    next.positions = result.converted_positions.clone();
    next.barre = result.barre.clone();
    next.capo_position = result.capo_position;
    next.difficulty = assess_difficulty(&next.positions, next.barre.as_ref());
    next.notes = analyze_notes(
        &diagram.name,
        &next.positions,
        &to.notes,
        result.capo_position.unwrap_or(0),
        to.is_standard,
    );
    if !next.metadata.tags.iter().any(|t| t == &to.id) {
        next.metadata.tags.push(to.id.clone());
    }
    next.metadata.updated_at = chrono::Utc::now();
    next
}
