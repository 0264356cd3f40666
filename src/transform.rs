//! Construction and pure transforms over [`ChordDiagram`].
//!
//! Every function here takes its input by reference and returns a new diagram.
//! `metadata.updated_at` is refreshed on every transform; the `id` is regenerated
//! whenever a musically identifying field (name or instrument) changes.

use chrono::Utc;
use uuid::Uuid;

use crate::diagram::{
    AlternativeFingering, BarreChord, ChordDiagram, DiagramMetadata, DifficultyLevel, Localization,
    StringPosition,
};
use crate::difficulty::assess_difficulty;
use crate::instrument::{InstrumentConfig, InstrumentType};
use crate::pitch::{is_flat_spelling, pitch_class_name, split_root, transpose_name};
use crate::theory::{analyze_notes, derive_tags};

/// Build a diagram id from the chord name and instrument plus a random suffix.
///
/// `"C#m7"` on guitar becomes something like `"c-sharp-m7-guitar-1a2b3c4d"`.
pub fn generate_id(name: &str, instrument: InstrumentType) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        match c {
            '#' => slug.push_str("-sharp-"),
            c if c.is_ascii_alphanumeric() => slug.push(c.to_ascii_lowercase()),
            _ => slug.push('-'),
        }
    }
    let slug: Vec<&str> = slug.split('-').filter(|s| !s.is_empty()).collect();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", slug.join("-"), instrument, &suffix[..8])
}

/// Create a diagram with default metadata.
///
/// Defaults: unverified, popularity 0.5, source `"user"`, tags derived from the
/// name. Difficulty comes from [`assess_difficulty`] and notes from the
/// instrument's standard tuning.
///
/// # Examples
/// ```
/// use fretwork::{create, DifficultyLevel, InstrumentType, StringPosition};
///
/// let positions = vec![
///     StringPosition::muted(1),
///     StringPosition::fretted(2, 3, 3),
///     StringPosition::fretted(3, 2, 2),
///     StringPosition::open(4),
///     StringPosition::fretted(5, 1, 1),
///     StringPosition::open(6),
/// ];
/// let c = create("C", InstrumentType::Guitar, positions);
/// assert_eq!(c.difficulty, DifficultyLevel::Beginner);
/// assert_eq!(c.metadata.popularity_score, 0.5);
/// assert!(!c.metadata.is_verified);
/// assert!(c.metadata.tags.contains(&"major".to_string()));
/// ```
pub fn create(name: &str, instrument: InstrumentType, positions: Vec<StringPosition>) -> ChordDiagram {
    create_with_barre(name, instrument, positions, None)
}

/// Like [`create`], with a barre.
pub fn create_with_barre(
    name: &str,
    instrument: InstrumentType,
    mut positions: Vec<StringPosition>,
    barre: Option<BarreChord>,
) -> ChordDiagram {
    positions.sort_by_key(|p| p.string_number);
    let config = instrument.config();
    let difficulty = assess_difficulty(&positions, barre.as_ref());
    let notes = analyze_notes(name, &positions, &config.standard_tuning, 0, true);

    ChordDiagram {
        id: generate_id(name, instrument),
        name: name.trim().to_string(),
        instrument: config,
        positions,
        barre,
        difficulty,
        alternatives: Vec::new(),
        notes,
        localization: Localization::default(),
        metadata: DiagramMetadata::new("user", derive_tags(name)),
        capo_position: None,
    }
}

/// Deep value copy; the result shares nothing with the input.
pub fn clone_diagram(diagram: &ChordDiagram) -> ChordDiagram {
    diagram.clone()
}

/// Rename a chord and/or move it to another instrument.
///
/// Changing either regenerates the id; positions are kept as given.
pub fn rename(diagram: &ChordDiagram, name: &str, instrument: Option<InstrumentConfig>) -> ChordDiagram {
    let mut next = diagram.clone();
    let instrument = instrument.unwrap_or_else(|| diagram.instrument.clone());
    let identity_changed = name.trim() != diagram.name || instrument != diagram.instrument;

    next.name = name.trim().to_string();
    next.instrument = instrument;
    if identity_changed {
        next.id = generate_id(&next.name, next.instrument.kind);
        next.metadata.tags = derive_tags(&next.name);
    }
    touch(next)
}

/// Shift the root and every note name by `semitones` (mod 12).
///
/// Fret positions are tuning- and position-specific and are left untouched; only
/// the chord's name, root, note names and localized names move. Spelling follows
/// the original root: flat roots stay flat.
///
/// # Examples
/// ```
/// use fretwork::{create, transpose, InstrumentType, StringPosition};
///
/// let positions = vec![
///     StringPosition::muted(1),
///     StringPosition::fretted(2, 3, 3),
///     StringPosition::fretted(3, 2, 2),
///     StringPosition::open(4),
///     StringPosition::fretted(5, 1, 1),
///     StringPosition::open(6),
/// ];
/// let c = create("C", InstrumentType::Guitar, positions);
/// let d = transpose(&c, 2);
/// assert_eq!(d.name, "D");
/// assert_eq!(d.notes.root, "D");
/// assert_eq!(d.notes.notes, vec!["D", "F#", "A"]);
/// assert_eq!(d.positions, c.positions);
/// assert_ne!(d.id, c.id);
/// ```
pub fn transpose(diagram: &ChordDiagram, semitones: i32) -> ChordDiagram {
    let shift = semitones.rem_euclid(12);
    let mut next = diagram.clone();
    if shift == 0 {
        return touch(next);
    }

    let prefer_flat = is_flat_spelling(&diagram.notes.root) || is_flat_spelling(diagram.name.trim());
    next.name = transpose_chord_name(&diagram.name, shift, prefer_flat);
    next.notes.root = transpose_name(&diagram.notes.root, shift, prefer_flat);
    next.notes.notes = diagram
        .notes
        .notes
        .iter()
        .map(|n| transpose_name(n, shift, prefer_flat))
        .collect();
    for alt in &mut next.alternatives {
        alt.notes.root = transpose_name(&alt.notes.root, shift, prefer_flat);
        alt.notes.notes = alt
            .notes
            .notes
            .iter()
            .map(|n| transpose_name(n, shift, prefer_flat))
            .collect();
    }
    for localized in next.localization.names.values_mut() {
        *localized = transpose_chord_name(localized, shift, prefer_flat);
    }

    if next.name != diagram.name {
        next.id = generate_id(&next.name, next.instrument.kind);
        next.metadata.tags = derive_tags(&next.name);
    }
    touch(next)
}

/// Replace the leading root of a chord name (and a slash bass note) with the transposed root.
fn transpose_chord_name(name: &str, semitones: i32, prefer_flat: bool) -> String {
    let trimmed = name.trim();
    let Some((root, rest)) = split_root(trimmed) else {
        return trimmed.to_string();
    };
    let new_root = pitch_class_name(root as i32 + semitones, prefer_flat);

    match rest.split_once('/') {
        Some((quality, bass)) => {
            let new_bass = transpose_name(bass, semitones, prefer_flat);
            format!("{}{}/{}", new_root, quality, new_bass)
        }
        None => format!("{}{}", new_root, rest),
    }
}

/// Append an alternative fingering; existing alternatives are never replaced.
///
/// The alternative's notes are analysed on the parent's instrument tuning.
pub fn add_alternative_fingering(
    diagram: &ChordDiagram,
    mut positions: Vec<StringPosition>,
    description: &str,
    difficulty: DifficultyLevel,
    barre: Option<BarreChord>,
) -> ChordDiagram {
    positions.sort_by_key(|p| p.string_number);
    let notes = analyze_notes(
        &diagram.name,
        &positions,
        &diagram.instrument.standard_tuning,
        diagram.capo_position.unwrap_or(0),
        diagram.notes.is_standard_tuning,
    );

    let mut next = diagram.clone();
    next.alternatives.push(AlternativeFingering {
        id: format!("{}-alt-{}", diagram.id, next.alternatives.len() + 1),
        description: description.to_string(),
        positions,
        barre,
        difficulty,
        notes,
    });
    touch(next)
}

fn touch(mut diagram: ChordDiagram) -> ChordDiagram {
    diagram.metadata.updated_at = Utc::now();
    diagram
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> ChordDiagram {
        create(
            "C",
            InstrumentType::Guitar,
            vec![
                StringPosition::muted(1),
                StringPosition::fretted(2, 3, 3),
                StringPosition::fretted(3, 2, 2),
                StringPosition::open(4),
                StringPosition::fretted(5, 1, 1),
                StringPosition::open(6),
            ],
        )
    }

    #[test]
    fn test_generate_id_slug() {
        let id = generate_id("C#m7", InstrumentType::Guitar);
        assert!(id.starts_with("c-sharp-m7-guitar-"), "got {}", id);
        assert_eq!(id.len(), "c-sharp-m7-guitar-".len() + 8);
    }

    #[test]
    fn test_create_sorts_positions() {
        let d = create(
            "Em",
            InstrumentType::Guitar,
            vec![
                StringPosition::open(6),
                StringPosition::open(5),
                StringPosition::open(4),
                StringPosition::fretted(3, 2, 3),
                StringPosition::fretted(2, 2, 2),
                StringPosition::open(1),
            ],
        );
        let strings: Vec<u8> = d.positions.iter().map(|p| p.string_number).collect();
        assert_eq!(strings, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(d.notes.root, "E");
        assert_eq!(d.notes.intervals, vec![0, 3, 7]);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = c_major();
        let mut copy = clone_diagram(&original);
        copy.positions[1].fret = 5;
        copy.metadata.tags.push("edited".to_string());
        assert_eq!(original.positions[1].fret, 3);
        assert!(!original.metadata.tags.contains(&"edited".to_string()));
    }

    #[test]
    fn test_transpose_wraps_and_keeps_frets() {
        let c = c_major();
        let b = transpose(&c, -1);
        assert_eq!(b.name, "B");
        assert_eq!(b.notes.notes, vec!["B", "D#", "F#"]);
        assert_eq!(b.positions, c.positions);

        let same = transpose(&c, 12);
        assert_eq!(same.name, "C");
        assert_eq!(same.id, c.id);
    }

    #[test]
    fn test_transpose_keeps_flat_spelling_and_slash_bass() {
        let mut bb = c_major();
        bb.name = "Bb/F".to_string();
        bb.notes.root = "Bb".to_string();
        let c = transpose(&bb, 2);
        assert_eq!(c.name, "C/G");
        let db = transpose(&bb, 3);
        assert_eq!(db.name, "Db/Ab");
    }

    #[test]
    fn test_transpose_does_not_mutate_input() {
        let c = c_major();
        let before = c.clone();
        let _ = transpose(&c, 5);
        assert_eq!(c, before);
    }

    #[test]
    fn test_add_alternative_appends() {
        let c = c_major();
        let alt_positions = vec![
            StringPosition::muted(1),
            StringPosition::fretted(2, 3, 1).with_barre(5),
            StringPosition::fretted(3, 5, 2),
            StringPosition::fretted(4, 5, 3),
            StringPosition::fretted(5, 5, 4),
            StringPosition::fretted(6, 3, 1).with_barre(5),
        ];
        let once = add_alternative_fingering(&c, alt_positions.clone(), "A-shape at 3rd fret", DifficultyLevel::Advanced, None);
        let twice = add_alternative_fingering(&once, alt_positions, "Second copy", DifficultyLevel::Advanced, None);
        assert!(c.alternatives.is_empty());
        assert_eq!(once.alternatives.len(), 1);
        assert_eq!(twice.alternatives.len(), 2);
        assert_eq!(twice.alternatives[0].description, "A-shape at 3rd fret");
        assert_eq!(twice.alternatives[0].notes.root, "C");
        assert_eq!(twice.id, c.id);
    }

    #[test]
    fn test_rename_regenerates_id() {
        let c = c_major();
        let renamed = rename(&c, "Cadd9", None);
        assert_ne!(renamed.id, c.id);
        assert!(renamed.metadata.tags.contains(&"add9".to_string()));

        let unchanged = rename(&c, "C", None);
        assert_eq!(unchanged.id, c.id);
    }
}
