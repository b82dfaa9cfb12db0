//! Best-candidate search over an [`EntityIndex`].

use super::index::{EntityIndex, NameKey};
use super::{EntityMatch, MatchConfidence, MatchResult, MatcherConfig, NoMatchReason};
use crate::error::MatchError;
use crate::models::{MatchQuery, Position};
use crate::team_codes::TeamCodes;
use crate::utils::matching::{normalize_name, similarity, ParsedName};
use rayon::prelude::*;
use tracing::debug;

/// Matches reference-source names against a shared, read-only index.
#[derive(Debug, Clone, Copy)]
pub struct EntityMatcher<'a> {
    index: &'a EntityIndex,
    teams: &'a TeamCodes,
    config: MatcherConfig,
}

impl<'a> EntityMatcher<'a> {
    pub fn new(
        index: &'a EntityIndex,
        teams: &'a TeamCodes,
        config: MatcherConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            index,
            teams,
            config,
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Find the best entity for `query`.
    ///
    /// Returns `Err(MalformedName)` only when the query name is needed in abbreviated
    /// form (some candidate lacks a linked identity), cannot be split, and no other
    /// candidate reached the acceptance threshold.
    pub fn find(&self, query: &MatchQuery) -> Result<MatchResult<'a>, MatchError> {
        let position = query.position.as_deref().map(Position::standardize);
        let query_norm = normalize_name(&query.name);
        // Parsed lazily: a single-token query is fine against linked and bare names
        let mut query_parsed: Option<Result<ParsedName, MatchError>> = None;

        let entries = self.index.entries();
        let mut considered = 0usize;
        let mut best_seen = 0.0f64;
        let mut accepted: Vec<(usize, f64)> = Vec::new();

        for (i, entry) in entries.iter().enumerate() {
            if position.is_some_and(|p| entry.entity.position != p) {
                continue;
            }
            considered += 1;

            let score = match &entry.key {
                NameKey::Linked(name) => similarity(name, &query_norm),
                NameKey::Own(own) => {
                    match query_parsed.get_or_insert_with(|| ParsedName::parse(&query.name)) {
                        Ok(q) => own.score(q),
                        Err(_) => 0.0,
                    }
                }
                NameKey::Bare(name) => similarity(name, &query_norm),
            };

            best_seen = best_seen.max(score);
            if score >= self.config.accept_threshold {
                accepted.push((i, score));
            }
        }

        if considered == 0 {
            return Ok(self.no_match(query, NoMatchReason::NoCandidates { position }));
        }

        let Some((mut best, mut score)) = best_of(&accepted) else {
            if let Some(Err(e)) = query_parsed {
                return Err(e);
            }
            return Ok(self.no_match(
                query,
                NoMatchReason::BelowThreshold {
                    best_score: best_seen,
                },
            ));
        };

        let mut confidence = if score >= 1.0 {
            MatchConfidence::Exact
        } else if score >= self.config.disambiguation_threshold {
            MatchConfidence::High
        } else {
            MatchConfidence::Uncertain
        };

        // Ambiguous band: let the team hint decide among the survivors
        if confidence == MatchConfidence::Uncertain {
            if let Some(team) = &query.team {
                let hinted = self.teams.standardize(team);
                let on_team: Vec<(usize, f64)> = accepted
                    .iter()
                    .copied()
                    .filter(|&(i, _)| self.teams.standardize(&entries[i].entity.team) == hinted)
                    .collect();

                match best_of(&on_team) {
                    Some((i, s)) => {
                        best = i;
                        score = s;
                        confidence = MatchConfidence::TeamCorroborated;
                    }
                    None => {
                        return Ok(self.no_match(
                            query,
                            NoMatchReason::TeamMismatch {
                                team: hinted,
                                best_score: score,
                            },
                        ));
                    }
                }
            }
        }

        let entity = &entries[best].entity;
        debug!(
            "Matched '{}' -> {} ({}) score {:.3} [{}]",
            query.name, entity.id, entity.name, score, confidence
        );

        Ok(MatchResult::Matched(EntityMatch {
            entity,
            score,
            confidence,
        }))
    }

    /// Match many queries in parallel. Results keep the order of `queries`.
    pub fn find_batch(&self, queries: &[MatchQuery]) -> Vec<Result<MatchResult<'a>, MatchError>> {
        queries.par_iter().map(|q| self.find(q)).collect()
    }

    fn no_match(&self, query: &MatchQuery, reason: NoMatchReason) -> MatchResult<'a> {
        debug!("No match for '{}': {}", query.name, reason);
        MatchResult::NoMatch(reason)
    }
}

/// Highest score; the earliest candidate wins ties.
fn best_of(candidates: &[(usize, f64)]) -> Option<(usize, f64)> {
    candidates
        .iter()
        .copied()
        .fold(None, |best, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        })
}
