//! Pitch-class arithmetic shared by the diagram model, tunings, and chord theory.
//!
//! Notes are carried as plain names ("C", "F#", "Bb") on the wire. Everything
//! that compares or moves notes goes through the semitone form here (0 = C).

/// Number of semitones in an octave.
pub const SEMITONES: i32 = 12;

const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
const FLAT_NAMES: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

/// Note name to semitone offset from C.
///
/// Accepts an upper- or lowercase letter followed by any number of `#`/`b`
/// accidentals.
///
/// # Examples
/// ```
/// use fretwork::pitch::parse_pitch_class;
///
/// assert_eq!(parse_pitch_class("C"), Some(0));
/// assert_eq!(parse_pitch_class("Bb"), Some(10));
/// assert_eq!(parse_pitch_class("e"), Some(4));
/// assert_eq!(parse_pitch_class("Cb"), Some(11));
/// assert_eq!(parse_pitch_class("H"), None);
/// ```
pub fn parse_pitch_class(name: &str) -> Option<u8> {
    let (pc, rest) = split_root(name.trim())?;
    if rest.is_empty() {
        Some(pc)
    } else {
        None
    }
}

/// Split a chord or note name into its root pitch class and the remaining suffix.
///
/// `"F#m7"` → `(6, "m7")`, `"Bbmaj7"` → `(10, "maj7")`.
pub fn split_root(name: &str) -> Option<(u8, &str)> {
    let mut chars = name.char_indices();
    let (_, letter) = chars.next()?;
    let base: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut offset = 0;
    let mut end = letter.len_utf8();
    for (idx, c) in chars {
        match c {
            '#' | '♯' => offset += 1,
            'b' | '♭' => offset -= 1,
            _ => break,
        }
        end = idx + c.len_utf8();
    }

    Some((normalize(base + offset), &name[end..]))
}

/// Convert a semitone value into a note name, preferring flats or sharps.
///
/// # Examples
/// ```
/// use fretwork::pitch::pitch_class_name;
///
/// assert_eq!(pitch_class_name(1, false), "C#");
/// assert_eq!(pitch_class_name(1, true), "Db");
/// assert_eq!(pitch_class_name(-1, false), "B");
/// ```
pub fn pitch_class_name(semitone: i32, prefer_flat: bool) -> &'static str {
    let idx = normalize(semitone) as usize;
    if prefer_flat {
        FLAT_NAMES[idx]
    } else {
        SHARP_NAMES[idx]
    }
}

/// Reduce any semitone offset into `0..12`.
pub fn normalize(semitone: i32) -> u8 {
    semitone.rem_euclid(SEMITONES) as u8
}

/// Smallest signed interval that moves `from` onto `to`, in `-6..=5`.
///
/// Used for retuning: dropping E to D is `-2`, raising E to F is `+1`.
pub fn nearest_interval(from: u8, to: u8) -> i32 {
    let up = (to as i32 - from as i32).rem_euclid(SEMITONES);
    if up > 5 {
        up - SEMITONES
    } else {
        up
    }
}

/// Whether a spelled note uses a flat accidental (drives spelling after transposition).
pub fn is_flat_spelling(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next();
    matches!(chars.next(), Some('b') | Some('♭'))
}

/// Transpose a single note name by `semitones`, wrapping around the octave.
///
/// Unparseable names are returned unchanged.
pub fn transpose_name(name: &str, semitones: i32, prefer_flat: bool) -> String {
    match parse_pitch_class(name) {
        Some(pc) => pitch_class_name(pc as i32 + semitones, prefer_flat).to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naturals_and_accidentals() {
        assert_eq!(parse_pitch_class("E"), Some(4));
        assert_eq!(parse_pitch_class("F#"), Some(6));
        assert_eq!(parse_pitch_class("Gb"), Some(6));
        assert_eq!(parse_pitch_class("B#"), Some(0));
        assert_eq!(parse_pitch_class(""), None);
        assert_eq!(parse_pitch_class("C7"), None);
    }

    #[test]
    fn test_split_root_keeps_quality() {
        assert_eq!(split_root("F#m7"), Some((6, "m7")));
        assert_eq!(split_root("Bbmaj7"), Some((10, "maj7")));
        assert_eq!(split_root("C"), Some((0, "")));
        assert_eq!(split_root("Csus4"), Some((0, "sus4")));
        assert_eq!(split_root("Cdim"), Some((0, "dim")));
        assert_eq!(split_root("Xm"), None);
    }

    #[test]
    fn test_nearest_interval() {
        assert_eq!(nearest_interval(4, 2), -2); // E -> D
        assert_eq!(nearest_interval(4, 5), 1); // E -> F
        assert_eq!(nearest_interval(4, 4), 0);
        assert_eq!(nearest_interval(0, 6), -6);
    }

    #[test]
    fn test_transpose_name_wraps() {
        assert_eq!(transpose_name("A", 3, false), "C");
        assert_eq!(transpose_name("C", -1, true), "B");
        assert_eq!(transpose_name("E", 13, false), "F");
        assert_eq!(transpose_name("??", 2, false), "??");
    }
}
