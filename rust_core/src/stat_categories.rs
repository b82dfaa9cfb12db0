//! Statistical category configuration per position.
//!
//! This module provides:
//! - Static reference-column -> computed-field tables for every position bucket
//! - JSON loading for season- or source-specific tables

use crate::error::{CoreResult, MatchError};
use crate::models::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One compared field.
#[derive(Debug, Clone, Copy)]
pub struct StatFieldConfig {
    /// Column name in the reference source
    pub reference_column: &'static str,
    /// Field name in the computed source
    pub computed_field: &'static str,
}

/// Compared fields for a single position bucket.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    pub position: Position,
    pub fields: &'static [StatFieldConfig],
}

const fn field(reference_column: &'static str, computed_field: &'static str) -> StatFieldConfig {
    StatFieldConfig {
        reference_column,
        computed_field,
    }
}

/// Static configuration for all position buckets.
pub static CATEGORY_CONFIGS: &[CategoryConfig] = &[
    CategoryConfig {
        position: Position::QB,
        fields: &[
            field("cmp", "completions"),
            field("att", "attempts"),
            field("pass_yds", "passing_yards"),
            field("pass_td", "passing_tds"),
            field("int", "interceptions"),
            field("rush_att", "carries"),
            field("rush_yds", "rushing_yards"),
            field("rush_td", "rushing_tds"),
        ],
    },
    CategoryConfig {
        position: Position::RB,
        fields: &[
            field("rush_att", "carries"),
            field("rush_yds", "rushing_yards"),
            field("rush_td", "rushing_tds"),
            field("tgt", "targets"),
            field("rec", "receptions"),
            field("rec_yds", "receiving_yards"),
            field("rec_td", "receiving_tds"),
        ],
    },
    CategoryConfig {
        position: Position::WR,
        fields: &[
            field("tgt", "targets"),
            field("rec", "receptions"),
            field("rec_yds", "receiving_yards"),
            field("rec_td", "receiving_tds"),
            field("rush_att", "carries"),
            field("rush_yds", "rushing_yards"),
        ],
    },
    CategoryConfig {
        position: Position::K,
        fields: &[
            field("fgm", "fg_made"),
            field("fga", "fg_att"),
            field("xpm", "pat_made"),
            field("xpa", "pat_att"),
        ],
    },
    CategoryConfig {
        position: Position::P,
        fields: &[field("pnt", "punts"), field("pnt_yds", "punt_yards")],
    },
    CategoryConfig {
        position: Position::DEF,
        fields: &[
            field("comb", "tackles"),
            field("sk", "sacks"),
            field("def_int", "def_interceptions"),
            field("ff", "def_fumbles_forced"),
        ],
    },
];

/// Owned (reference column, computed field) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    pub reference: String,
    pub computed: String,
}

impl From<&StatFieldConfig> for FieldPair {
    fn from(config: &StatFieldConfig) -> Self {
        Self {
            reference: config.reference_column.to_string(),
            computed: config.computed_field.to_string(),
        }
    }
}

/// Field tables keyed by position.
///
/// JSON format: `{ "QB": [{ "reference": "pass_yds", "computed": "passing_yards" }], ... }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatCategories {
    by_position: BTreeMap<Position, Vec<FieldPair>>,
}

impl StatCategories {
    /// Tables from [`CATEGORY_CONFIGS`].
    pub fn builtin() -> Self {
        let by_position = CATEGORY_CONFIGS
            .iter()
            .map(|c| (c.position, c.fields.iter().map(FieldPair::from).collect()))
            .collect();
        Self { by_position }
    }

    /// Load tables from JSON. Replaces the built-in tables entirely.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| MatchError::Mapping(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| MatchError::Mapping(format!("{}: {}", path.display(), e)))
    }

    /// Fields compared for `position`; empty when the position has no table.
    pub fn fields_for(&self, position: Position) -> &[FieldPair] {
        self.by_position
            .get(&position)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn positions(&self) -> Vec<Position> {
        self.by_position.keys().copied().collect()
    }

    /// Total number of configured fields across positions.
    pub fn len(&self) -> usize {
        self.by_position.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
