//! Difficulty classification.
//!
//! [`assess_difficulty`] is the single source of truth for a diagram's tier: the
//! generator uses it to tag new diagrams and the validation engine uses it to
//! flag diagrams whose declared difficulty disagrees.

use crate::diagram::{fret_stretch, fretted_bounds, BarreChord, DifficultyLevel, StringPosition};

/// Above this fret a chord is an expert shape.
const EXPERT_FRET: i8 = 12;
/// Above this fret a chord is at least advanced.
const ADVANCED_FRET: i8 = 7;
/// More fretted strings than this is at least intermediate.
const BEGINNER_MAX_FRETTED: usize = 3;

/// Classify a chord shape. First matching rule wins:
///
/// 1. `expert` - highest fret above 12, or stretch above 4
/// 2. `advanced` - highest fret above 7, stretch above 3, or any barre
/// 3. `intermediate` - stretch above 2, or more than 3 fretted strings
/// 4. `beginner`
///
/// # Examples
/// ```
/// use fretwork::{assess_difficulty, DifficultyLevel, StringPosition};
///
/// // Open C: x32010
/// let c = vec![
///     StringPosition::muted(1),
///     StringPosition::fretted(2, 3, 3),
///     StringPosition::fretted(3, 2, 2),
///     StringPosition::open(4),
///     StringPosition::fretted(5, 1, 1),
///     StringPosition::open(6),
/// ];
/// assert_eq!(assess_difficulty(&c, None), DifficultyLevel::Beginner);
/// ```
pub fn assess_difficulty(positions: &[StringPosition], barre: Option<&BarreChord>) -> DifficultyLevel {
    let highest = fretted_bounds(positions).map(|(_, hi)| hi).unwrap_or(0);
    let stretch = fret_stretch(positions);
    let fretted = positions.iter().filter(|p| p.is_fretted()).count();

    if highest > EXPERT_FRET || stretch > DifficultyLevel::Advanced.max_stretch() {
        DifficultyLevel::Expert
    } else if highest > ADVANCED_FRET
        || stretch > DifficultyLevel::Intermediate.max_stretch()
        || barre.is_some()
    {
        DifficultyLevel::Advanced
    } else if stretch > DifficultyLevel::Beginner.max_stretch() || fretted > BEGINNER_MAX_FRETTED {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Beginner
    }
}
