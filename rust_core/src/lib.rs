//! Statline Core - athlete entity matching and season-stat reconciliation.
//!
//! This module provides:
//! - Name normalization and abbreviation ("Tom Brady" <-> "T.Brady")
//! - Normalized Levenshtein similarity scoring
//! - Position and team code standardization
//! - A read-only entity index built once per run
//! - Best-candidate matching with acceptance/disambiguation thresholds
//! - Per-position stat category tables and field difference computation

mod error;
pub mod matching;
pub mod models;
pub mod reconcile;
pub mod stat_categories;
pub mod team_codes;
pub mod utils;

pub use error::{CoreResult, MatchError};
pub use matching::{
    EntityIndex, EntityMatch, EntityMatcher, MatchConfidence, MatchResult, MatcherConfig,
    NoMatchReason,
};
pub use models::{Entity, LinkedIdentity, MatchQuery, Position, ReferenceRow};
pub use reconcile::FieldDifference;
pub use stat_categories::StatCategories;
pub use team_codes::TeamCodes;
