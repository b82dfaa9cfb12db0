// Shared models for statline services
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Position
// ============================================================================

/// Coarse position bucket used by the reference source.
///
/// The reference taxonomy is lossy: fullbacks are grouped with running backs,
/// tight ends with receivers, and every defensive or unknown position lands in `DEF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    K,
    P,
    DEF,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::K,
        Position::P,
        Position::DEF,
    ];

    /// Map a raw position label onto one of the six buckets.
    ///
    /// Total and idempotent: unknown labels map to `DEF` rather than failing.
    pub fn standardize(raw: &str) -> Position {
        match raw.trim().to_uppercase().as_str() {
            "QB" => Position::QB,
            "RB" | "FB" => Position::RB,
            "WR" | "TE" => Position::WR,
            "K" => Position::K,
            "P" => Position::P,
            _ => Position::DEF,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::K => "K",
            Position::P => "P",
            Position::DEF => "DEF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Verified identity attached to some entities. Its name is authoritative for matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedIdentity {
    pub full_name: String,
}

impl LinkedIdentity {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// A candidate athlete from the computed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Name as the computed source spells it; may be abbreviated ("T.Brady").
    pub name: String,
    #[serde(default)]
    pub linked_identity: Option<LinkedIdentity>,
    pub team: String,
    pub position: Position,
    /// Computed season stats keyed by field name.
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            linked_identity: None,
            team: team.into(),
            position,
            stats: BTreeMap::new(),
        }
    }

    pub fn with_linked_identity(mut self, full_name: impl Into<String>) -> Self {
        self.linked_identity = Some(LinkedIdentity::new(full_name));
        self
    }

    pub fn with_stat(mut self, field: impl Into<String>, value: f64) -> Self {
        self.stats.insert(field.into(), value);
        self
    }

    pub fn stat(&self, field: &str) -> Option<f64> {
        self.stats.get(field).copied()
    }
}

// ============================================================================
// Queries
// ============================================================================

/// A name lookup with optional team and position hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub name: String,
    pub team: Option<String>,
    pub position: Option<String>,
}

impl MatchQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }
}

// ============================================================================
// Reference rows
// ============================================================================

/// One row of the trusted reference source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

impl ReferenceRow {
    pub fn query(&self) -> MatchQuery {
        MatchQuery {
            name: self.name.clone(),
            team: self.team.clone(),
            position: self.position.clone(),
        }
    }

    /// Standardized position hint, if the row has one.
    pub fn position(&self) -> Option<Position> {
        self.position.as_deref().map(Position::standardize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_row_query() {
        let row = ReferenceRow {
            name: "Tom Brady".to_string(),
            team: Some("TAM".to_string()),
            position: Some("qb".to_string()),
            stats: BTreeMap::new(),
        };
        let query = row.query();
        assert_eq!(query, MatchQuery::new("Tom Brady").with_team("TAM").with_position("qb"));
        assert_eq!(row.position(), Some(Position::QB));
    }

    #[test]
    fn test_position_aliases() {
        assert_eq!(Position::standardize("qb"), Position::QB);
        assert_eq!(Position::standardize("FB"), Position::RB);
        assert_eq!(Position::standardize(" te "), Position::WR);
        assert_eq!(Position::standardize("K"), Position::K);
        assert_eq!(Position::standardize("p"), Position::P);
    }

    #[test]
    fn test_unknown_position_defaults_to_def() {
        assert_eq!(Position::standardize("LB"), Position::DEF);
        assert_eq!(Position::standardize("CB"), Position::DEF);
        assert_eq!(Position::standardize(""), Position::DEF);
        assert_eq!(Position::standardize("OL"), Position::DEF);
    }

    #[test]
    fn test_standardize_is_idempotent() {
        for raw in ["qb", "FB", "te", "WR", "k", "P", "ss", "DEF", "??"] {
            let once = Position::standardize(raw);
            assert_eq!(Position::standardize(once.as_str()), once, "raw = {raw}");
            assert!(Position::ALL.contains(&once));
        }
    }

    #[test]
    fn test_position_serde_uses_codes() {
        let json = serde_json::to_string(&Position::DEF).unwrap();
        assert_eq!(json, "\"DEF\"");
        let back: Position = serde_json::from_str("\"WR\"").unwrap();
        assert_eq!(back, Position::WR);
    }
}
