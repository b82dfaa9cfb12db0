//! Entity Matching
//!
//! Resolves a reference-source name (plus optional team and position hints) to a
//! single entity of the computed source, or reports that none fits.
//!
//! - [`EntityIndex`]: read-only pool of candidates, built once per run
//! - [`EntityMatcher`]: scores candidates, applies thresholds, tie-break and team
//!   disambiguation
//! - [`MatchResult`]: matched entity with score, or an explicit no-match reason

use crate::error::MatchError;
use crate::models::{Entity, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod index;
pub mod matcher;

pub use index::EntityIndex;
pub use matcher::EntityMatcher;

/// Minimum similarity for a candidate to be considered at all.
pub const ACCEPT_THRESHOLD: f64 = 0.8;

/// Below this score a team hint is required to trust the match.
pub const DISAMBIGUATION_THRESHOLD: f64 = 0.85;

/// Match confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    Uncertain = 0,        // In the ambiguous band, no team hint to confirm
    TeamCorroborated = 1, // In the ambiguous band, confirmed by team hint
    High = 2,             // At or above the disambiguation threshold
    Exact = 3,            // Score 1.0: same normalized name, or same F.Last on both sides
}

impl MatchConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchConfidence::Uncertain => "uncertain",
            MatchConfidence::TeamCorroborated => "team_corroborated",
            MatchConfidence::High => "high",
            MatchConfidence::Exact => "exact",
        }
    }
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a query produced no match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoMatchReason {
    /// Position filter left nothing to score
    NoCandidates { position: Option<Position> },
    /// Nobody reached the acceptance threshold
    BelowThreshold { best_score: f64 },
    /// Only ambiguous candidates, none on the hinted team
    TeamMismatch { team: String, best_score: f64 },
}

impl NoMatchReason {
    pub fn kind(&self) -> &'static str {
        match self {
            NoMatchReason::NoCandidates { .. } => "no_candidates",
            NoMatchReason::BelowThreshold { .. } => "below_threshold",
            NoMatchReason::TeamMismatch { .. } => "team_mismatch",
        }
    }
}

impl fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoMatchReason::NoCandidates { position: Some(p) } => {
                write!(f, "no candidates at position {}", p)
            }
            NoMatchReason::NoCandidates { position: None } => write!(f, "candidate pool is empty"),
            NoMatchReason::BelowThreshold { best_score } => {
                write!(f, "best score {:.3} below acceptance threshold", best_score)
            }
            NoMatchReason::TeamMismatch { team, best_score } => write!(
                f,
                "ambiguous best score {:.3} and no candidate on team {}",
                best_score, team
            ),
        }
    }
}

/// A successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch<'a> {
    pub entity: &'a Entity,
    pub score: f64,
    pub confidence: MatchConfidence,
}

/// Result of matching one query against the index
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a> {
    Matched(EntityMatch<'a>),
    NoMatch(NoMatchReason),
}

impl<'a> MatchResult<'a> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    pub fn entity(&self) -> Option<&'a Entity> {
        match self {
            MatchResult::Matched(m) => Some(m.entity),
            MatchResult::NoMatch(_) => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            MatchResult::Matched(m) => Some(m.score),
            MatchResult::NoMatch(_) => None,
        }
    }

    /// Require a match, turning "no match" into [`MatchError::NoMatchFound`].
    pub fn into_found(self, query_name: &str) -> Result<EntityMatch<'a>, MatchError> {
        match self {
            MatchResult::Matched(m) => Ok(m),
            MatchResult::NoMatch(reason) => Err(MatchError::NoMatchFound {
                name: query_name.to_string(),
                reason: reason.to_string(),
            }),
        }
    }
}

/// Matcher thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub accept_threshold: f64,
    pub disambiguation_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            accept_threshold: ACCEPT_THRESHOLD,
            disambiguation_threshold: DISAMBIGUATION_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    /// Both thresholds in [0, 1] and accept <= disambiguation.
    pub fn validate(&self) -> Result<(), MatchError> {
        let in_range = |t: f64| (0.0..=1.0).contains(&t);
        if !in_range(self.accept_threshold)
            || !in_range(self.disambiguation_threshold)
            || self.accept_threshold > self.disambiguation_threshold
        {
            return Err(MatchError::InvalidThreshold {
                accept: self.accept_threshold,
                disambiguation: self.disambiguation_threshold,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(MatchConfidence::Exact > MatchConfidence::High);
        assert!(MatchConfidence::High > MatchConfidence::TeamCorroborated);
        assert!(MatchConfidence::TeamCorroborated > MatchConfidence::Uncertain);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = MatcherConfig::default();
        assert_eq!(config.accept_threshold, 0.8);
        assert_eq!(config.disambiguation_threshold, 0.85);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = MatcherConfig {
            accept_threshold: 0.9,
            disambiguation_threshold: 0.85,
        };
        assert_eq!(
            config.validate(),
            Err(MatchError::InvalidThreshold {
                accept: 0.9,
                disambiguation: 0.85
            })
        );
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let config = MatcherConfig {
            accept_threshold: 0.8,
            disambiguation_threshold: 1.5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_match_into_found_is_error() {
        let result = MatchResult::NoMatch(NoMatchReason::BelowThreshold { best_score: 0.42 });
        assert!(!result.is_match());
        assert_eq!(result.score(), None);

        match result.into_found("Joe Nobody") {
            Err(MatchError::NoMatchFound { name, reason }) => {
                assert_eq!(name, "Joe Nobody");
                assert!(reason.contains("0.420"));
            }
            other => panic!("expected NoMatchFound, got {:?}", other),
        }
    }

    #[test]
    fn test_reason_kinds() {
        assert_eq!(
            NoMatchReason::NoCandidates { position: None }.kind(),
            "no_candidates"
        );
        assert_eq!(
            NoMatchReason::TeamMismatch {
                team: "DAL".to_string(),
                best_score: 0.81
            }
            .kind(),
            "team_mismatch"
        );
    }
}
