//! # Search & Ranking Engine
//!
//! Filters a chord collection by structured criteria, scores name matches,
//! sorts and paginates.
//!
//! - Filters are conjunctive: instrument, difficulty set, chord type, fret
//!   bounds on the highest fret, barre presence, minimum popularity, tags.
//! - Name queries match the chord name and its localized names. Literal mode
//!   accepts exact, prefix and substring matches; fuzzy mode accepts anything
//!   whose [`similarity`] reaches the threshold.
//! - Relevance ties go to the more popular diagram, then to the name.
//! - Pages are 0-indexed; a page past the end is empty.

mod engine;
mod fuzzy;
mod types;


pub use engine::{search, suggest};
pub use fuzzy::similarity;
pub use types::{
    MatchReason, SearchCriteria, SearchHit, SearchOptions, SearchResults, SortBy, SortDirection,
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_PAGE_SIZE,
};
