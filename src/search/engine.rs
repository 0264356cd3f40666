//! Filtering, ranking and pagination.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use super::fuzzy::{score_name, similarity};
use super::types::{MatchReason, SearchCriteria, SearchHit, SearchOptions, SearchResults, SortBy, SortDirection};
use crate::diagram::ChordDiagram;
use crate::theory::ChordType;

/// Structured filters, cheapest first; the name query is scored separately.
fn passes_filters(diagram: &ChordDiagram, criteria: &SearchCriteria) -> bool {
    if criteria.instrument.is_some_and(|kind| kind != diagram.instrument.kind) {
        return false;
    }
    if !criteria.difficulty.is_empty() && !criteria.difficulty.contains(&diagram.difficulty) {
        return false;
    }
    if criteria.has_barre.is_some_and(|want| want != diagram.barre.is_some()) {
        return false;
    }
    if criteria
        .min_popularity
        .is_some_and(|min| diagram.metadata.popularity_score < min)
    {
        return false;
    }

    let top = diagram.max_fret();
    if criteria.min_fret.is_some_and(|min| top < min) || criteria.max_fret.is_some_and(|max| top > max) {
        return false;
    }

    if !criteria.tags.iter().all(|wanted| {
        diagram
            .metadata
            .tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(wanted))
    }) {
        return false;
    }

    criteria
        .chord_type
        .map_or(true, |kind| ChordType::from_name(&diagram.name) == kind)
}

fn relevance(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    a.score.total_cmp(&b.score)
}

fn by_name(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    a.diagram
        .name
        .to_lowercase()
        .cmp(&b.diagram.name.to_lowercase())
        .then_with(|| a.diagram.id.cmp(&b.diagram.id))
}

fn popularity(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    a.diagram
        .metadata
        .popularity_score
        .total_cmp(&b.diagram.metadata.popularity_score)
}

fn sort_hits(hits: &mut [SearchHit<'_>], sort_by: SortBy, direction: SortDirection) {
    let primary = |a: &SearchHit<'_>, b: &SearchHit<'_>| -> Ordering {
        let ord = match sort_by {
            SortBy::Relevance => relevance(a, b),
            SortBy::Alphabetical => by_name(a, b),
            SortBy::Difficulty => a.diagram.difficulty.ordinal().cmp(&b.diagram.difficulty.ordinal()),
            SortBy::Popularity => popularity(a, b),
            SortBy::FretPosition => a.diagram.max_fret().cmp(&b.diagram.max_fret()),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    };

    // Ties: more popular first, then by name.
    hits.sort_by(|a, b| {
        primary(a, b)
            .then_with(|| popularity(b, a))
            .then_with(|| by_name(a, b))
    });
}

/// Filter, rank and paginate a collection.
///
/// Filtering happens before scoring and sorting, and the collection is walked
/// once. Without a name query every surviving diagram scores 100.
///
/// # Examples
/// ```
/// use fretwork::search::{search, SearchCriteria, SearchOptions};
/// use fretwork::{generate, InstrumentType};
///
/// let chords = vec![
///     generate("C", "major", "x32010", InstrumentType::Guitar).unwrap(),
///     generate("C", "major7", "x32000", InstrumentType::Guitar).unwrap(),
///     generate("G", "major", "320003", InstrumentType::Guitar).unwrap(),
/// ];
/// let options = SearchOptions {
///     criteria: SearchCriteria {
///         name: Some("C".into()),
///         fuzzy: true,
///         fuzzy_threshold: 50.0,
///         ..SearchCriteria::default()
///     },
///     ..SearchOptions::default()
/// };
/// let found = search(&chords, &options);
/// assert_eq!(found.names(), vec!["C", "Cmaj7"]);
/// ```
pub fn search<'a>(diagrams: &'a [ChordDiagram], options: &SearchOptions) -> SearchResults<'a> {
    let criteria = &options.criteria;
    let query = criteria.name.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let mut hits: Vec<SearchHit<'a>> = diagrams
        .iter()
        .filter(|d| passes_filters(d, criteria))
        .filter_map(|diagram| {
            let (score, match_reason) = match query {
                Some(q) => score_name(diagram, q, criteria.fuzzy, criteria.fuzzy_threshold)?,
                None => (100.0, MatchReason::Filters),
            };
            Some(SearchHit {
                diagram,
                score,
                match_reason,
            })
        })
        .collect();

    sort_hits(&mut hits, options.sort_by, options.sort_direction);

    let page_size = options.page_size.max(1);
    let total_count = hits.len();
    let total_pages = total_count.div_ceil(page_size);
    let results: Vec<SearchHit<'a>> = hits
        .into_iter()
        .skip(options.page.saturating_mul(page_size))
        .take(page_size)
        .collect();

    debug!(
        query = query.unwrap_or(""),
        fuzzy = criteria.fuzzy,
        total_count,
        page = options.page,
        returned = results.len(),
        "search complete"
    );

    SearchResults {
        results,
        total_count,
        page: options.page,
        page_size,
        total_pages,
    }
}

/// Up to `limit` distinct chord names ranked by similarity to `prefix`, for autocomplete.
///
/// Names that share nothing with the prefix are dropped.
pub fn suggest(diagrams: &[ChordDiagram], prefix: &str, limit: usize) -> Vec<String> {
    let mut best: BTreeMap<&str, f64> = BTreeMap::new();
    for diagram in diagrams {
        let score = similarity(prefix, &diagram.name);
        if score > 0.0 {
            let entry = best.entry(diagram.name.as_str()).or_insert(score);
            *entry = entry.max(score);
        }
    }

    let mut ranked: Vec<(&str, f64)> = best.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}
