//! Reconciliation driver: match every reference row, diff the matched ones, emit.

use anyhow::{Context, Result};
use statline_rust_core::reconcile::reconcile_row;
use statline_rust_core::team_codes::TeamCodeStats;
use statline_rust_core::{
    Entity, EntityIndex, EntityMatch, EntityMatcher, FieldDifference, MatchError, MatchQuery,
    MatchResult, MatcherConfig, NoMatchReason, ReferenceRow, StatCategories, TeamCodes,
};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::Config;
use crate::report::ReportWriter;
use crate::sources::{read_candidates, read_reference};
use crate::summary::RunSummary;

/// What happened to one reference row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome<'a> {
    Reconciled {
        matched: EntityMatch<'a>,
        diffs: Vec<FieldDifference>,
    },
    Unmatched(NoMatchReason),
    Malformed(MatchError),
}

/// Owns the run's read-only state: index, team codes, category tables.
pub struct Reconciler {
    index: EntityIndex,
    teams: TeamCodes,
    categories: StatCategories,
    matcher: MatcherConfig,
    parallel: bool,
}

impl Reconciler {
    pub fn new(
        entities: Vec<Entity>,
        teams: TeamCodes,
        categories: StatCategories,
        matcher: MatcherConfig,
    ) -> Result<Self> {
        matcher.validate()?;
        let index = EntityIndex::build(entities).context("Failed to build entity index")?;
        Ok(Self {
            index,
            teams,
            categories,
            matcher,
            parallel: true,
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn teams(&self) -> &TeamCodes {
        &self.teams
    }

    /// Match and diff every row. Outcomes keep the order of `rows`.
    pub fn reconcile(&self, rows: &[ReferenceRow]) -> Result<Vec<RowOutcome<'_>>> {
        let matcher = EntityMatcher::new(&self.index, &self.teams, self.matcher)?;
        let queries: Vec<MatchQuery> = rows.iter().map(ReferenceRow::query).collect();

        let results = if self.parallel {
            matcher.find_batch(&queries)
        } else {
            queries.iter().map(|q| matcher.find(q)).collect()
        };

        let outcomes: Vec<RowOutcome<'_>> = rows
            .iter()
            .zip(results)
            .map(|(row, result)| match result {
                Ok(MatchResult::Matched(matched)) => {
                    let diffs = reconcile_row(row, matched.entity, &self.categories);
                    RowOutcome::Reconciled { matched, diffs }
                }
                Ok(MatchResult::NoMatch(reason)) => {
                    warn!("No match for '{}': {}", row.name, reason);
                    RowOutcome::Unmatched(reason)
                }
                Err(e) => {
                    warn!("Skipping '{}': {}", row.name, e);
                    RowOutcome::Malformed(e)
                }
            })
            .collect();

        Ok(outcomes)
    }
}

/// Entity ids matched by more than one reference row, with their row counts.
pub fn duplicate_matches(outcomes: &[RowOutcome<'_>]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for outcome in outcomes {
        if let RowOutcome::Reconciled { matched, .. } = outcome {
            *counts.entry(matched.entity.id.clone()).or_default() += 1;
        }
    }
    counts.retain(|_, n| *n > 1);
    counts
}

/// Full run: load inputs, reconcile, write the report and optional summary.
pub fn run(config: &Config) -> Result<RunSummary> {
    let teams = match &config.team_codes_path {
        Some(path) => TeamCodes::load(path).context("Failed to load team codes")?,
        None => TeamCodes::builtin(),
    };
    let categories = match &config.categories_path {
        Some(path) => StatCategories::load(path).context("Failed to load stat categories")?,
        None => StatCategories::builtin(),
    };

    let entities = read_candidates(&config.candidates_path)?;
    let rows = read_reference(&config.reference_path)?;

    let reconciler =
        Reconciler::new(entities, teams, categories, config.matcher)?.with_parallel(config.parallel);
    let outcomes = reconciler.reconcile(&rows)?;

    let mut summary = RunSummary::new(
        reconciler.index().len(),
        TeamCodeStats::from(reconciler.teams()),
    );
    summary.malformed_candidates = reconciler
        .index()
        .malformed()
        .map(|e| e.id.clone())
        .collect();
    let mut report = ReportWriter::create(&config.output_path)?;

    for (row, outcome) in rows.iter().zip(&outcomes) {
        summary.record(outcome, config.tolerance);
        if let RowOutcome::Reconciled { matched, diffs } = outcome {
            report.write_match(row, matched, diffs)?;
        }
    }

    for (id, count) in duplicate_matches(&outcomes) {
        warn!("Entity {} matched by {} reference rows", id, count);
        summary.duplicate_matches += 1;
    }

    summary.report_lines = report.lines_written();
    report.finish()?;
    info!(
        "Wrote {} report lines to {}",
        summary.report_lines,
        config.output_path.display()
    );

    if let Some(path) = &config.summary_path {
        summary.save(path)?;
    }

    Ok(summary)
}
