//! Chord theory: quality interval table, chord-type derivation, note analysis.
//!
//! ## Quality table
//! [`CHORD_QUALITIES`] maps quality symbols to semitone intervals above the root.
//! Several symbols share the same intervals (`dominant7sharp5` and `augmented7`
//! are both `[0, 4, 8, 10]`). Both are kept as distinct entries; callers that
//! look up by intervals get every matching symbol back and must not assume the
//! symbols are musically distinguishable.
//!
//! ## Chord type
//! [`ChordType::from_name`] derives a coarse category from the suffix of a chord
//! name (`Cmaj7` → `Major7`, `F#m` → `Minor`, `G5` → `Power`). Any other suffix
//! ending in a bare digit (`C6`, `C9`) is also `Power`. Search filters on it.
//!
//! ## Note analysis
//! [`analyze_notes`] works out which pitch classes a set of positions actually
//! sounds on a given tuning (capo included) and describes them relative to the root.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::diagram::{ChordNotes, StringPosition};
use crate::pitch::{is_flat_spelling, parse_pitch_class, pitch_class_name, split_root};

/// Quality symbol → intervals in semitones above the root.
pub static CHORD_QUALITIES: &[(&str, &[u8])] = &[
    ("major", &[0, 4, 7]),
    ("minor", &[0, 3, 7]),
    ("diminished", &[0, 3, 6]),
    ("augmented", &[0, 4, 8]),
    ("sus2", &[0, 2, 7]),
    ("sus4", &[0, 5, 7]),
    ("power", &[0, 7]),
    ("dominant7", &[0, 4, 7, 10]),
    ("major7", &[0, 4, 7, 11]),
    ("minor7", &[0, 3, 7, 10]),
    ("minorMajor7", &[0, 3, 7, 11]),
    ("diminished7", &[0, 3, 6, 9]),
    ("halfDiminished7", &[0, 3, 6, 10]),
    ("dominant7sharp5", &[0, 4, 8, 10]),
    ("augmented7", &[0, 4, 8, 10]),
    ("dominant7sus4", &[0, 5, 7, 10]),
    ("major6", &[0, 4, 7, 9]),
    ("minor6", &[0, 3, 7, 9]),
    ("add9", &[0, 2, 4, 7]),
    ("minorAdd9", &[0, 2, 3, 7]),
    ("dominant9", &[0, 2, 4, 7, 10]),
    ("major9", &[0, 2, 4, 7, 11]),
    ("minor9", &[0, 2, 3, 7, 10]),
];

/// Intervals for a quality symbol (case-sensitive, as listed in [`CHORD_QUALITIES`]).
///
/// Common chord-name suffixes are accepted too: `""`, `"m"`, `"7"`, `"maj7"`, `"m7"`,
/// `"dim"`, `"aug"`, `"5"`, ...
///
/// # Examples
/// ```
/// use fretwork::theory::intervals_for;
///
/// assert_eq!(intervals_for("major"), Some(&[0u8, 4, 7][..]));
/// assert_eq!(intervals_for("m7"), Some(&[0u8, 3, 7, 10][..]));
/// assert_eq!(intervals_for("unknown"), None);
/// ```
pub fn intervals_for(symbol: &str) -> Option<&'static [u8]> {
    let canonical = match symbol {
        "" | "maj" | "M" => "major",
        "m" | "min" | "-" => "minor",
        "dim" | "°" => "diminished",
        "aug" | "+" => "augmented",
        "sus" => "sus4",
        "5" => "power",
        "7" => "dominant7",
        "maj7" | "M7" => "major7",
        "m7" | "min7" | "-7" => "minor7",
        "mMaj7" | "mM7" => "minorMajor7",
        "dim7" | "°7" => "diminished7",
        "m7b5" | "ø" => "halfDiminished7",
        "7#5" => "dominant7sharp5",
        "aug7" | "+7" => "augmented7",
        "7sus4" => "dominant7sus4",
        "6" => "major6",
        "m6" => "minor6",
        "madd9" => "minorAdd9",
        "9" => "dominant9",
        "maj9" | "M9" => "major9",
        "m9" | "min9" => "minor9",
        other => other,
    };
    CHORD_QUALITIES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, intervals)| *intervals)
}

/// Every quality symbol whose interval set equals `intervals` (order-insensitive).
///
/// Returns all matches in table order; duplicates are reported, never resolved.
pub fn symbols_for(intervals: &[u8]) -> Vec<&'static str> {
    let wanted: BTreeSet<u8> = intervals.iter().map(|i| i % 12).collect();
    CHORD_QUALITIES
        .iter()
        .filter(|(_, ivs)| ivs.iter().copied().collect::<BTreeSet<u8>>() == wanted)
        .map(|(name, _)| *name)
        .collect()
}

/// Coarse chord category derived from a chord name's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChordType {
    Major,
    Minor,
    Seventh,
    Major7,
    Minor7,
    Sus2,
    Sus4,
    Diminished,
    Augmented,
    Add9,
    Power,
    /// Suffix matched no pattern.
    Other,
}

impl ChordType {
    /// Derive the chord type from a chord name via suffix patterns.
    ///
    /// # Examples
    /// ```
    /// use fretwork::theory::ChordType;
    ///
    /// assert_eq!(ChordType::from_name("C"), ChordType::Major);
    /// assert_eq!(ChordType::from_name("Cmaj7"), ChordType::Major7);
    /// assert_eq!(ChordType::from_name("Am"), ChordType::Minor);
    /// assert_eq!(ChordType::from_name("G7"), ChordType::Seventh);
    /// assert_eq!(ChordType::from_name("E5"), ChordType::Power);
    /// assert_eq!(ChordType::from_name("C6"), ChordType::Power);
    /// ```
    pub fn from_name(name: &str) -> ChordType {
        let suffix = split_root(name.trim()).map(|(_, rest)| rest).unwrap_or(name);
        // Slash bass notes ("C/G") don't change the quality.
        let suffix = suffix.split('/').next().unwrap_or("");
        let lower = suffix.to_ascii_lowercase();

        if suffix.is_empty() || lower == "maj" {
            ChordType::Major
        } else if lower.contains("maj7") || suffix.starts_with("M7") {
            ChordType::Major7
        } else if lower.contains("sus2") {
            ChordType::Sus2
        } else if lower.contains("sus") {
            ChordType::Sus4
        } else if lower.contains("dim") || suffix.contains('°') {
            ChordType::Diminished
        } else if lower.contains("aug") || suffix.contains('+') {
            ChordType::Augmented
        } else if lower.contains("add9") {
            ChordType::Add9
        } else if suffix.starts_with('m') && !lower.starts_with("maj") {
            if suffix.contains('7') {
                ChordType::Minor7
            } else {
                ChordType::Minor
            }
        } else if suffix.ends_with('7') {
            ChordType::Seventh
        } else if suffix.ends_with(|c: char| c.is_ascii_digit()) {
            ChordType::Power
        } else {
            ChordType::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChordType::Major => "major",
            ChordType::Minor => "minor",
            ChordType::Seventh => "7th",
            ChordType::Major7 => "maj7",
            ChordType::Minor7 => "m7",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Diminished => "dim",
            ChordType::Augmented => "aug",
            ChordType::Add9 => "add9",
            ChordType::Power => "power",
            ChordType::Other => "other",
        }
    }
}

/// Tags derived from a chord name: root, chord type, and `"sharp"`/`"flat"`.
///
/// ```
/// use fretwork::theory::derive_tags;
///
/// assert_eq!(derive_tags("F#m"), vec!["F#", "minor", "sharp"]);
/// ```
pub fn derive_tags(name: &str) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some((pc, _)) = split_root(name.trim()) {
        let flat = is_flat_spelling(name.trim());
        tags.push(pitch_class_name(pc as i32, flat).to_string());
        tags.push(ChordType::from_name(name).as_str().to_string());
        if name.contains('#') {
            tags.push("sharp".to_string());
        } else if flat {
            tags.push("flat".to_string());
        }
    }
    tags
}

/// Sounding pitch classes of `positions` on `tuning`, in string order.
///
/// Muted strings and strings without a tuning entry are skipped. The capo raises
/// every open string; fretted notes are taken relative to the capo.
pub fn sounding_pitches(positions: &[StringPosition], tuning: &[String], capo: u8) -> Vec<u8> {
    let mut sorted: Vec<&StringPosition> = positions.iter().filter(|p| !p.is_muted()).collect();
    sorted.sort_by_key(|p| p.string_number);

    sorted
        .into_iter()
        .filter_map(|p| {
            let idx = (p.string_number as usize).checked_sub(1)?;
            let open = parse_pitch_class(tuning.get(idx)?)?;
            Some(crate::pitch::normalize(open as i32 + capo as i32 + p.fret as i32))
        })
        .collect()
}

/// Describe what a set of positions sounds like.
///
/// The root is taken from `name` when it starts with a note; otherwise the lowest
/// sounding string supplies it. Notes are unique, ordered by interval above the root.
///
/// # Examples
/// ```
/// use fretwork::{theory::analyze_notes, InstrumentType, StringPosition};
///
/// let c = vec![
///     StringPosition::muted(1),
///     StringPosition::fretted(2, 3, 3),
///     StringPosition::fretted(3, 2, 2),
///     StringPosition::open(4),
///     StringPosition::fretted(5, 1, 1),
///     StringPosition::open(6),
/// ];
/// let tuning = InstrumentType::Guitar.config().standard_tuning;
/// let notes = analyze_notes("C", &c, &tuning, 0, true);
/// assert_eq!(notes.root, "C");
/// assert_eq!(notes.notes, vec!["C", "E", "G"]);
/// assert_eq!(notes.intervals, vec![0, 4, 7]);
/// ```
pub fn analyze_notes(
    name: &str,
    positions: &[StringPosition],
    tuning: &[String],
    capo: u8,
    is_standard_tuning: bool,
) -> ChordNotes {
    let pitches = sounding_pitches(positions, tuning, capo);
    let named_root = split_root(name.trim()).map(|(pc, _)| pc);
    let prefer_flat = is_flat_spelling(name.trim());

    let root = match named_root.or_else(|| pitches.first().copied()) {
        Some(root) => root,
        None => {
            return ChordNotes {
                is_standard_tuning,
                ..ChordNotes::default()
            }
        }
    };

    let intervals: BTreeSet<u8> = pitches
        .iter()
        .map(|&pc| crate::pitch::normalize(pc as i32 - root as i32))
        .collect();

    ChordNotes {
        root: pitch_class_name(root as i32, prefer_flat).to_string(),
        notes: intervals
            .iter()
            .map(|&iv| pitch_class_name(root as i32 + iv as i32, prefer_flat).to_string())
            .collect(),
        intervals: intervals.into_iter().collect(),
        is_standard_tuning,
    }
}

/// Number of distinct pitch classes sounded.
pub fn unique_note_count(positions: &[StringPosition], tuning: &[String], capo: u8) -> usize {
    sounding_pitches(positions, tuning, capo)
        .into_iter()
        .collect::<BTreeSet<u8>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::InstrumentType;

    #[test]
    fn test_duplicate_interval_symbols_are_both_reported() {
        let symbols = symbols_for(&[0, 4, 8, 10]);
        assert_eq!(symbols, vec!["dominant7sharp5", "augmented7"]);
        assert_eq!(intervals_for("dominant7sharp5"), intervals_for("augmented7"));
    }

    #[test]
    fn test_symbols_for_is_order_insensitive() {
        assert_eq!(symbols_for(&[7, 0, 4]), vec!["major"]);
        assert!(symbols_for(&[0, 1]).is_empty());
    }

    #[test]
    fn test_chord_type_suffixes() {
        let cases = [
            ("C", ChordType::Major),
            ("Cmaj", ChordType::Major),
            ("Cmaj7", ChordType::Major7),
            ("Am", ChordType::Minor),
            ("Am7", ChordType::Minor7),
            ("G7", ChordType::Seventh),
            ("Dsus2", ChordType::Sus2),
            ("Dsus4", ChordType::Sus4),
            ("Bdim", ChordType::Diminished),
            ("Caug", ChordType::Augmented),
            ("Cadd9", ChordType::Add9),
            ("E5", ChordType::Power),
            ("C6", ChordType::Power),
            ("C9", ChordType::Power),
            ("Am6", ChordType::Minor),
            ("C13", ChordType::Power),
            ("Cx", ChordType::Other),
            ("Bbm", ChordType::Minor),
            ("C/G", ChordType::Major),
        ];
        for (name, expected) in cases {
            assert_eq!(ChordType::from_name(name), expected, "chord {}", name);
        }
    }

    #[test]
    fn test_derive_tags() {
        assert_eq!(derive_tags("C"), vec!["C", "major"]);
        assert_eq!(derive_tags("Bbmaj7"), vec!["Bb", "maj7", "flat"]);
        assert!(derive_tags("???").is_empty());
    }

    #[test]
    fn test_analyze_with_capo() {
        // A-shape played with capo 2 sounds B major: x02220
        let positions = vec![
            StringPosition::muted(1),
            StringPosition::open(2),
            StringPosition::fretted(3, 2, 1),
            StringPosition::fretted(4, 2, 2),
            StringPosition::fretted(5, 2, 3),
            StringPosition::open(6),
        ];
        let tuning = InstrumentType::Guitar.config().standard_tuning;
        let notes = analyze_notes("B", &positions, &tuning, 2, true);
        assert_eq!(notes.notes, vec!["B", "D#", "F#"]);
        assert_eq!(notes.intervals, vec![0, 4, 7]);
    }

    #[test]
    fn test_analyze_without_named_root_uses_bass() {
        let positions = vec![
            StringPosition::open(1),
            StringPosition::fretted(2, 2, 2),
            StringPosition::fretted(3, 2, 3),
            StringPosition::fretted(4, 1, 1),
            StringPosition::open(5),
            StringPosition::open(6),
        ];
        let tuning = InstrumentType::Guitar.config().standard_tuning;
        let notes = analyze_notes("", &positions, &tuning, 0, true);
        assert_eq!(notes.root, "E");
        assert_eq!(notes.intervals, vec![0, 4, 7]);
    }

    #[test]
    fn test_unique_note_count() {
        let tuning = InstrumentType::Guitar.config().standard_tuning;
        let open: Vec<_> = (1..=6).map(StringPosition::open).collect();
        // E A D G B E
        assert_eq!(unique_note_count(&open, &tuning, 0), 5);
    }
}
