//! Name scoring.
//!
//! Edit distance alone punishes short queries against longer names ("C" vs
//! "Cmaj7" is only 20% similar), so containment earns a floor: a prefix scores
//! at least 80 and a substring at least 60, rising with how much of the
//! candidate the query covers.

use super::types::MatchReason;
use crate::diagram::ChordDiagram;

const PREFIX_FLOOR: f64 = 80.0;
const CONTAINS_FLOOR: f64 = 60.0;
const COVERAGE_BONUS: f64 = 20.0;

fn coverage(query: &str, candidate: &str) -> f64 {
    query.chars().count() as f64 / candidate.chars().count().max(1) as f64
}

/// Similarity of `query` to `candidate` in `[0, 100]`, case-insensitive.
///
/// # Examples
/// ```
/// use fretwork::search::similarity;
///
/// assert_eq!(similarity("Am7", "am7"), 100.0);
/// assert!(similarity("C", "Cmaj7") > 80.0);
/// assert_eq!(similarity("C", "G"), 0.0);
/// ```
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    if query == candidate {
        return 100.0;
    }

    let edit = strsim::normalized_levenshtein(&query, &candidate) * 100.0;
    let containment = if candidate.starts_with(&query) {
        PREFIX_FLOOR + COVERAGE_BONUS * coverage(&query, &candidate)
    } else if candidate.contains(&query) {
        CONTAINS_FLOOR + COVERAGE_BONUS * coverage(&query, &candidate)
    } else {
        0.0
    };
    edit.max(containment).clamp(0.0, 100.0)
}

fn literal_match(query: &str, candidate: &str) -> Option<(f64, MatchReason)> {
    let q = query.trim().to_lowercase();
    let c = candidate.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }
    if q == c {
        Some((100.0, MatchReason::ExactName))
    } else if c.starts_with(&q) {
        Some((PREFIX_FLOOR + COVERAGE_BONUS * coverage(&q, &c), MatchReason::NamePrefix))
    } else if c.contains(&q) {
        Some((CONTAINS_FLOOR + COVERAGE_BONUS * coverage(&q, &c), MatchReason::NameContains))
    } else {
        None
    }
}

/// Best name score for a diagram, checking the name and every localized name.
///
/// Without `fuzzy`, only exact, prefix and substring matches count. With it,
/// any candidate at or above `threshold` percent qualifies.
pub(crate) fn score_name(diagram: &ChordDiagram, query: &str, fuzzy: bool, threshold: f64) -> Option<(f64, MatchReason)> {
    let score_one = |name: &str| -> Option<(f64, MatchReason)> {
        if fuzzy {
            let score = similarity(query, name);
            let reason = literal_match(query, name).map_or(MatchReason::FuzzyName, |(_, r)| r);
            (score > 0.0 && score >= threshold).then_some((score, reason))
        } else {
            literal_match(query, name)
        }
    };

    let primary = score_one(&diagram.name);
    let localized = diagram
        .localization
        .names
        .values()
        .filter_map(|name| score_one(name))
        .map(|(score, _)| score)
        .fold(None, |best: Option<f64>, score| Some(best.map_or(score, |b| b.max(score))));

    match (primary, localized) {
        (Some((score, _)), Some(loc)) if loc > score => Some((loc, MatchReason::LocalizedName)),
        (Some(hit), _) => Some(hit),
        (None, Some(loc)) => Some((loc, MatchReason::LocalizedName)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_case() {
        assert_eq!(similarity("cmaj7", "Cmaj7"), 100.0);
        assert_eq!(similarity("", "C"), 0.0);
    }

    #[test]
    fn test_prefix_beats_substring() {
        let prefix = similarity("maj", "maj7");
        let inner = similarity("maj", "Cmaj7");
        assert!(prefix > inner);
        assert!(inner >= CONTAINS_FLOOR);
    }

    #[test]
    fn test_misspelling_is_close() {
        // One missing letter.
        let score = similarity("Cmjor7", "Cmajor7");
        assert!(score > 80.0, "{}", score);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        assert!(similarity("C", "Am") < 50.0);
        assert!(similarity("C", "D7") < 50.0);
        assert!(similarity("C", "F") < 50.0);
    }
}
