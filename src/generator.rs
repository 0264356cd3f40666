//! Pattern-based chord generation.
//!
//! Chord generators hand over a root, a quality symbol, and a fret pattern. This
//! module turns that triple into a complete diagram: fingers assigned, barre
//! detected, difficulty classified, notes analysed and tags derived.
//!
//! ## Pattern syntax
//! - Compact: one character per string, low string first: `x32010`
//! - Frets above 9 in parentheses: `x(10)(12)(12)(11)x`
//! - Comma separated: `x,3,2,0,1,0` or `8,10,10,9,8,8`
//!
//! `x`/`X` mutes a string, `0` leaves it open.

use crate::diagram::{BarreChord, ChordDiagram, StringPosition, MUTED};
use crate::error::{FretworkError, Result};
use crate::instrument::InstrumentType;
use crate::pitch::{is_flat_spelling, parse_pitch_class, pitch_class_name};
use crate::theory::{derive_tags, intervals_for};
use crate::transform::create_with_barre;

/// Fretting fingers on one hand.
const MAX_FINGERS: usize = 4;

/// Parse a fret pattern into frets in string order.
///
/// # Examples
/// ```
/// use fretwork::generator::parse_pattern;
///
/// assert_eq!(parse_pattern("x32010").unwrap(), vec![-1, 3, 2, 0, 1, 0]);
/// assert_eq!(parse_pattern("x,3,2,0,1,0").unwrap(), vec![-1, 3, 2, 0, 1, 0]);
/// assert_eq!(parse_pattern("x(10)(12)").unwrap(), vec![-1, 10, 12]);
/// ```
pub fn parse_pattern(pattern: &str) -> Result<Vec<i8>> {
    let invalid = |message: &str| FretworkError::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(invalid("pattern is empty"));
    }

    if trimmed.contains(',') {
        return trimmed
            .split(',')
            .map(|token| parse_fret_token(token.trim()).ok_or_else(|| invalid(&format!("bad fret '{}'", token.trim()))))
            .collect();
    }

    let mut frets = Vec::new();
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        match c {
            'x' | 'X' => frets.push(MUTED),
            d @ '0'..='9' => frets.push((d as u8 - b'0') as i8),
            '(' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        _ => return Err(invalid("unterminated '(' group")),
                    }
                }
                let fret = digits.parse::<i8>().map_err(|_| invalid("bad fret in '(' group"))?;
                frets.push(fret);
            }
            other => return Err(invalid(&format!("unexpected character '{}'", other))),
        }
    }
    Ok(frets)
}

fn parse_fret_token(token: &str) -> Option<i8> {
    match token {
        "x" | "X" | "-1" => Some(MUTED),
        _ => token.parse::<i8>().ok().filter(|f| *f >= 0),
    }
}

/// Choose fingers and a barre for a fret pattern.
///
/// When more than four strings are fretted and the lowest fret appears on at
/// least two strings, finger 1 barres that fret from its first to its last
/// occurrence. Remaining fretted strings get fingers in ascending fret order,
/// low string first. Returns `None` when the shape needs more than four fingers.
pub fn assign_fingers(frets: &[i8]) -> Option<(Vec<StringPosition>, Option<BarreChord>)> {
    let fretted: Vec<(usize, i8)> = frets
        .iter()
        .enumerate()
        .filter(|(_, f)| **f > 0)
        .map(|(i, f)| (i, *f))
        .collect();

    let barre = detect_barre(frets, &fretted);
    let mut fingers: Vec<i8> = frets.iter().map(|&f| if f > 0 { 0 } else { f.max(MUTED) }).collect();

    let mut next_finger = 1;
    if let Some(b) = &barre {
        for (i, f) in &fretted {
            if *f == b.fret && b.covers(*i as u8 + 1) {
                fingers[*i] = b.finger;
            }
        }
        next_finger = 2;
    }

    let mut remaining: Vec<(usize, i8)> = fretted
        .iter()
        .copied()
        .filter(|(i, _)| fingers[*i] == 0)
        .collect();
    remaining.sort_by_key(|(i, f)| (*f, *i));
    for (i, _) in remaining {
        if next_finger as usize > MAX_FINGERS {
            return None;
        }
        fingers[i] = next_finger;
        next_finger += 1;
    }

    let positions = frets
        .iter()
        .enumerate()
        .map(|(i, &fret)| {
            let string_number = i as u8 + 1;
            let position = StringPosition::new(string_number, fret, fingers[i]);
            match &barre {
                Some(b) if fret == b.fret && b.covers(string_number) => position.with_barre(b.span()),
                _ => position,
            }
        })
        .collect();

    Some((positions, barre))
}

fn detect_barre(frets: &[i8], fretted: &[(usize, i8)]) -> Option<BarreChord> {
    if fretted.len() <= MAX_FINGERS {
        return None;
    }
    let lowest = fretted.iter().map(|(_, f)| *f).min()?;
    let at_lowest: Vec<usize> = fretted.iter().filter(|(_, f)| *f == lowest).map(|(i, _)| *i).collect();
    if at_lowest.len() < 2 {
        return None;
    }

    let start = *at_lowest.first()?;
    let end = *at_lowest.last()?;
    // Open strings inside the span would be silenced by the barre.
    if frets[start..=end].iter().any(|f| *f == 0) {
        return None;
    }

    Some(BarreChord {
        fret: lowest,
        finger: 1,
        start_string: start as u8 + 1,
        end_string: end as u8 + 1,
        is_partial: !(start == 0 && end + 1 == frets.len()),
    })
}

/// Generate a tagged diagram from a root, quality symbol and fret pattern.
///
/// The quality must be known to [`intervals_for`]; the chord name is the root
/// followed by the conventional suffix for that quality.
///
/// # Examples
/// ```
/// use fretwork::{generate, DifficultyLevel, InstrumentType};
///
/// let f = generate("F", "major", "133211", InstrumentType::Guitar).unwrap();
/// assert_eq!(f.name, "F");
/// assert!(f.barre.is_some());
/// assert_eq!(f.difficulty, DifficultyLevel::Advanced);
/// assert_eq!(f.notes.notes, vec!["F", "A", "C"]);
/// ```
pub fn generate(root: &str, quality: &str, pattern: &str, instrument: InstrumentType) -> Result<ChordDiagram> {
    let root_pc = parse_pitch_class(root).ok_or_else(|| FretworkError::InvalidNote(root.to_string()))?;
    if intervals_for(quality).is_none() {
        return Err(FretworkError::InvalidPattern {
            pattern: pattern.to_string(),
            message: format!("unknown chord quality '{}'", quality),
        });
    }

    let frets = parse_pattern(pattern)?;
    if frets.len() != instrument.string_count() as usize {
        return Err(FretworkError::InvalidPattern {
            pattern: pattern.to_string(),
            message: format!(
                "expected {} strings for {}, got {}",
                instrument.string_count(),
                instrument,
                frets.len()
            ),
        });
    }

    let spelled_root = pitch_class_name(root_pc as i32, is_flat_spelling(root.trim()));
    let name = format!("{}{}", spelled_root, quality_suffix(quality));

    let (positions, barre) = assign_fingers(&frets).ok_or_else(|| FretworkError::InvalidPattern {
        pattern: pattern.to_string(),
        message: "shape needs more than four fingers and has no barre to share".to_string(),
    })?;
    let mut diagram = create_with_barre(&name, instrument, positions, barre);
    diagram.metadata.source = "generator".to_string();
    let mut tags = derive_tags(&name);
    tags.push(quality.to_string());
    tags.dedup();
    diagram.metadata.tags = tags;
    Ok(diagram)
}

/// Conventional chord-name suffix for a quality symbol.
fn quality_suffix(quality: &str) -> &str {
    match quality {
        "major" => "",
        "minor" => "m",
        "diminished" => "dim",
        "augmented" => "aug",
        "power" => "5",
        "dominant7" => "7",
        "major7" => "maj7",
        "minor7" => "m7",
        "minorMajor7" => "mMaj7",
        "diminished7" => "dim7",
        "halfDiminished7" => "m7b5",
        "dominant7sharp5" => "7#5",
        "augmented7" => "aug7",
        "dominant7sus4" => "7sus4",
        "major6" => "6",
        "minor6" => "m6",
        "minorAdd9" => "madd9",
        "dominant9" => "9",
        "major9" => "maj9",
        "minor9" => "m9",
        other => other,
    }
}
