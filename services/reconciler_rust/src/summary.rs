use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use statline_rust_core::team_codes::TeamCodeStats;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::driver::RowOutcome;

/// Counts for one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub candidates: usize,
    /// candidate ids whose own name could not be abbreviated
    pub malformed_candidates: Vec<String>,
    pub reference_rows: usize,
    pub matched: usize,
    /// no-match reason kind -> rows
    pub unmatched: BTreeMap<String, usize>,
    pub malformed: usize,
    /// confidence band -> rows
    pub confidence: BTreeMap<String, usize>,
    /// entities claimed by more than one reference row
    pub duplicate_matches: usize,
    pub fields_compared: usize,
    pub discrepancies: usize,
    pub report_lines: usize,
    pub team_codes: TeamCodeStats,
}

impl RunSummary {
    pub fn new(candidates: usize, team_codes: TeamCodeStats) -> Self {
        Self {
            generated_at: Utc::now(),
            candidates,
            malformed_candidates: Vec::new(),
            reference_rows: 0,
            matched: 0,
            unmatched: BTreeMap::new(),
            malformed: 0,
            confidence: BTreeMap::new(),
            duplicate_matches: 0,
            fields_compared: 0,
            discrepancies: 0,
            report_lines: 0,
            team_codes,
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome<'_>, tolerance: f64) {
        self.reference_rows += 1;
        match outcome {
            RowOutcome::Reconciled { matched, diffs } => {
                self.matched += 1;
                *self
                    .confidence
                    .entry(matched.confidence.as_str().to_string())
                    .or_default() += 1;
                self.fields_compared += diffs.len();
                self.discrepancies += diffs.iter().filter(|d| d.is_discrepancy(tolerance)).count();
            }
            RowOutcome::Unmatched(reason) => {
                *self.unmatched.entry(reason.kind().to_string()).or_default() += 1;
            }
            RowOutcome::Malformed(_) => self.malformed += 1,
        }
    }

    pub fn unmatched_total(&self) -> usize {
        self.unmatched.values().sum()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statline_rust_core::{
        Entity, EntityMatch, FieldDifference, MatchConfidence, MatchError, NoMatchReason,
        Position, TeamCodes,
    };

    #[test]
    fn test_record_outcomes() {
        let entity = Entity::new("1", "T.Brady", "TB", Position::QB);
        let mut summary = RunSummary::new(1, TeamCodeStats::from(&TeamCodes::builtin()));

        summary.record(
            &RowOutcome::Reconciled {
                matched: EntityMatch {
                    entity: &entity,
                    score: 0.9,
                    confidence: MatchConfidence::High,
                },
                diffs: vec![
                    FieldDifference {
                        field: "pass_yds".to_string(),
                        computed_field: "passing_yards".to_string(),
                        reference: Some(10.0),
                        computed: Some(10.0),
                        difference: Some(0.0),
                    },
                    FieldDifference {
                        field: "pass_td".to_string(),
                        computed_field: "passing_tds".to_string(),
                        reference: Some(3.0),
                        computed: Some(2.0),
                        difference: Some(1.0),
                    },
                ],
            },
            1e-6,
        );
        summary.record(
            &RowOutcome::Unmatched(NoMatchReason::BelowThreshold { best_score: 0.3 }),
            1e-6,
        );
        summary.record(
            &RowOutcome::Malformed(MatchError::MalformedName("Cher".to_string())),
            1e-6,
        );

        assert_eq!(summary.reference_rows, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.unmatched.get("below_threshold"), Some(&1));
        assert_eq!(summary.unmatched_total(), 1);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.confidence.get("high"), Some(&1));
        assert_eq!(summary.fields_compared, 2);
        assert_eq!(summary.discrepancies, 1);
    }
}
