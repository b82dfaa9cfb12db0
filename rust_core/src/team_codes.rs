//! Team code standardization.
//!
//! This module provides:
//! - A built-in table mapping historical codes, PFR codes, cities and nicknames to
//!   the current NFL team code
//! - JSON persistence so a season-specific table can extend the defaults

use crate::error::{CoreResult, MatchError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Built-in aliases per current team code. All aliases are lowercase.
static NFL_TEAM_ALIASES: &[(&str, &[&str])] = &[
    ("ARI", &["arizona cardinals", "arizona", "cardinals", "crd"]),
    ("ATL", &["atlanta falcons", "atlanta", "falcons", "atl"]),
    ("BAL", &["baltimore ravens", "baltimore", "ravens", "rav"]),
    ("BUF", &["buffalo bills", "buffalo", "bills"]),
    ("CAR", &["carolina panthers", "carolina", "panthers"]),
    ("CHI", &["chicago bears", "chicago", "bears"]),
    ("CIN", &["cincinnati bengals", "cincinnati", "bengals"]),
    ("CLE", &["cleveland browns", "cleveland", "browns"]),
    ("DAL", &["dallas cowboys", "dallas", "cowboys"]),
    ("DEN", &["denver broncos", "denver", "broncos"]),
    ("DET", &["detroit lions", "detroit", "lions"]),
    ("GB", &["green bay packers", "green bay", "packers", "gnb"]),
    ("HOU", &["houston texans", "houston", "texans", "htx"]),
    ("IND", &["indianapolis colts", "indianapolis", "colts", "clt"]),
    ("JAX", &["jacksonville jaguars", "jacksonville", "jaguars", "jags", "jac"]),
    ("KC", &["kansas city chiefs", "kansas city", "chiefs", "kan"]),
    ("LAC", &["los angeles chargers", "la chargers", "chargers", "sdg", "sd"]),
    ("LAR", &["los angeles rams", "la rams", "rams", "ram", "stl", "la"]),
    ("LV", &["las vegas raiders", "las vegas", "raiders", "rai", "oak", "lvr"]),
    ("MIA", &["miami dolphins", "miami", "dolphins"]),
    ("MIN", &["minnesota vikings", "minnesota", "vikings"]),
    ("NE", &["new england patriots", "new england", "patriots", "pats", "nwe"]),
    ("NO", &["new orleans saints", "new orleans", "saints", "nor"]),
    ("NYG", &["new york giants", "ny giants", "giants"]),
    ("NYJ", &["new york jets", "ny jets", "jets"]),
    ("PHI", &["philadelphia eagles", "philadelphia", "eagles", "philly"]),
    ("PIT", &["pittsburgh steelers", "pittsburgh", "steelers"]),
    ("SEA", &["seattle seahawks", "seattle", "seahawks"]),
    ("SF", &["san francisco 49ers", "san francisco", "49ers", "niners", "sfo"]),
    ("TB", &["tampa bay buccaneers", "tampa bay", "buccaneers", "bucs", "tam"]),
    ("TEN", &["tennessee titans", "tennessee", "titans", "oti"]),
    ("WAS", &["washington commanders", "washington", "commanders", "wsh"]),
];

/// Alias table for team codes.
///
/// Lookups are case-insensitive. Unknown codes pass through uppercased, which keeps
/// standardization total: a team the table has never heard of still compares equal
/// to itself.
#[derive(Debug, Clone, Default)]
pub struct TeamCodes {
    /// lowercase alias -> standard code
    aliases: HashMap<String, String>,
}

impl TeamCodes {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Table preloaded with the current NFL teams.
    pub fn builtin() -> Self {
        let mut codes = Self::new();
        for (code, aliases) in NFL_TEAM_ALIASES {
            codes.insert(code, code);
            for alias in aliases.iter() {
                codes.insert(code, alias);
            }
        }
        codes
    }

    /// Load extra aliases from JSON and merge them over the built-in table.
    ///
    /// JSON format: `{ "LV": ["oak", "raiders"], ... }`
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| MatchError::Mapping(format!("{}: {}", path.display(), e)))?;
        let extra: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)
            .map_err(|e| MatchError::Mapping(format!("{}: {}", path.display(), e)))?;

        let mut codes = Self::builtin();
        for (code, aliases) in extra {
            codes.insert(&code, &code);
            for alias in aliases {
                codes.insert(&code, &alias);
            }
        }
        Ok(codes)
    }

    /// Save to JSON in the same shape `load` reads.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(&self.grouped())?;
        fs::write(path, content)
    }

    /// Register `alias` as another spelling of `code`.
    pub fn insert(&mut self, code: &str, alias: &str) {
        self.aliases
            .insert(alias.trim().to_lowercase(), code.trim().to_uppercase());
    }

    /// Standard code for a raw team label.
    pub fn standardize(&self, raw: &str) -> String {
        let key = raw.trim().to_lowercase();
        match self.aliases.get(&key) {
            Some(code) => code.clone(),
            None => key.to_uppercase(),
        }
    }

    /// Whether two raw labels refer to the same team.
    pub fn same_team(&self, a: &str, b: &str) -> bool {
        self.standardize(a) == self.standardize(b)
    }

    /// Get number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Check if table is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// All standard codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        self.grouped().into_keys().collect()
    }

    fn grouped(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (alias, code) in &self.aliases {
            grouped.entry(code.clone()).or_default().push(alias.clone());
        }
        for aliases in grouped.values_mut() {
            aliases.sort();
        }
        grouped
    }
}

/// Serializable view used by the service summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamCodeStats {
    pub codes: usize,
    pub aliases: usize,
}

impl From<&TeamCodes> for TeamCodeStats {
    fn from(codes: &TeamCodes) -> Self {
        Self {
            codes: codes.codes().len(),
            aliases: codes.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
