//! Search query and result types.

use serde::{Deserialize, Serialize};

use crate::diagram::{ChordDiagram, DifficultyLevel};
use crate::instrument::InstrumentType;
use crate::theory::ChordType;

/// Default minimum fuzzy similarity, in percent.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 60.0;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Filters applied conjunctively; unset fields match everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    /// Name query, matched against the chord name and its localized names.
    pub name: Option<String>,
    pub fuzzy: bool,
    /// Minimum similarity (0-100) a fuzzy match must reach.
    pub fuzzy_threshold: f64,
    pub instrument: Option<InstrumentType>,
    /// Accepted difficulty levels; empty accepts all.
    pub difficulty: Vec<DifficultyLevel>,
    pub chord_type: Option<ChordType>,
    /// Bounds on the highest non-muted fret.
    pub min_fret: Option<i8>,
    pub max_fret: Option<i8>,
    pub has_barre: Option<bool>,
    pub min_popularity: Option<f64>,
    /// Every tag listed must be present (case-insensitive).
    pub tags: Vec<String>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            name: None,
            fuzzy: false,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            instrument: None,
            difficulty: Vec::new(),
            chord_type: None,
            min_fret: None,
            max_fret: None,
            has_barre: None,
            min_popularity: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Relevance,
    Alphabetical,
    Difficulty,
    Popularity,
    FretPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub criteria: SearchCriteria,
    pub sort_by: SortBy,
    /// Applies to the primary sort key; tie-breakers keep a fixed order.
    pub sort_direction: SortDirection,
    /// 0-indexed.
    pub page: usize,
    /// Values below 1 are treated as 1.
    pub page_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            criteria: SearchCriteria::default(),
            sort_by: SortBy::Relevance,
            sort_direction: SortDirection::Descending,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Why a diagram made it into the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    /// No name query; only structured filters applied.
    Filters,
    ExactName,
    NamePrefix,
    NameContains,
    FuzzyName,
    LocalizedName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    pub diagram: &'a ChordDiagram,
    /// Relevance in `[0, 100]`.
    pub score: f64,
    pub match_reason: MatchReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults<'a> {
    pub results: Vec<SearchHit<'a>>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<'a> SearchResults<'a> {
    pub fn names(&self) -> Vec<&'a str> {
        self.results.iter().map(|hit| hit.diagram.name.as_str()).collect()
    }
}
