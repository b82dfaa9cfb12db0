//! CSV/TSV readers for the candidate pool and the reference source.
//!
//! Both files carry a header row. Identity columns are looked up by name
//! (case-insensitive); every other column is treated as a numeric stat.

use anyhow::{anyhow, Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use statline_rust_core::{Entity, LinkedIdentity, Position, ReferenceRow};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, info};

const CANDIDATE_COLUMNS: &[&str] = &["id", "name", "linked_name", "team", "position"];
const REFERENCE_COLUMNS: &[&str] = &["name", "team", "position"];

/// Tab for `.tsv` files, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn open(path: &Path) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Header lookup.
struct Columns {
    names: Vec<String>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        Self {
            names: headers.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| anyhow!("Missing required column '{}'", name))
    }

    /// Columns outside `identity`, as (index, name).
    fn stat_columns(&self, identity: &[&str]) -> Vec<(usize, String)> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, n)| !identity.contains(&n.as_str()))
            .map(|(i, n)| (i, n.clone()))
            .collect()
    }
}

fn optional_cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_stats(record: &StringRecord, columns: &[(usize, String)]) -> BTreeMap<String, f64> {
    let mut stats = BTreeMap::new();
    for (i, name) in columns {
        let Some(raw) = record.get(*i).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        match raw.parse::<f64>() {
            Ok(value) => {
                stats.insert(name.clone(), value);
            }
            Err(_) => debug!("Ignoring non-numeric {}={:?}", name, raw),
        }
    }
    stats
}

/// Read the computed candidate pool from a file.
pub fn read_candidates(path: &Path) -> Result<Vec<Entity>> {
    let entities = candidates_from_reader(open(path)?)
        .with_context(|| format!("Failed to read candidates from {}", path.display()))?;
    info!("Read {} candidates from {}", entities.len(), path.display());
    Ok(entities)
}

/// Columns: `id`, `name`, optional `linked_name`, `team`, `position`, then stats.
pub fn candidates_from_reader<R: io::Read>(mut reader: Reader<R>) -> Result<Vec<Entity>> {
    let columns = Columns::from_headers(reader.headers()?);
    let id_col = columns.require("id")?;
    let name_col = columns.require("name")?;
    let team_col = columns.require("team")?;
    let position_col = columns.require("position")?;
    let linked_col = columns.index_of("linked_name");
    let stat_cols = columns.stat_columns(CANDIDATE_COLUMNS);

    let mut entities = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad candidate record {}", line + 1))?;

        let id = optional_cell(&record, Some(id_col))
            .ok_or_else(|| anyhow!("Candidate record {} has no id", line + 1))?;
        let name = optional_cell(&record, Some(name_col)).unwrap_or_default();
        let team = optional_cell(&record, Some(team_col)).unwrap_or_default();
        let position = Position::standardize(record.get(position_col).unwrap_or(""));

        entities.push(Entity {
            id,
            name,
            linked_identity: optional_cell(&record, linked_col).map(LinkedIdentity::new),
            team,
            position,
            stats: parse_stats(&record, &stat_cols),
        });
    }
    Ok(entities)
}

/// Read the reference source from a file.
pub fn read_reference(path: &Path) -> Result<Vec<ReferenceRow>> {
    let rows = reference_from_reader(open(path)?)
        .with_context(|| format!("Failed to read reference rows from {}", path.display()))?;
    info!("Read {} reference rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Columns: `name`, optional `team`, optional `position`, then stats.
pub fn reference_from_reader<R: io::Read>(mut reader: Reader<R>) -> Result<Vec<ReferenceRow>> {
    let columns = Columns::from_headers(reader.headers()?);
    let name_col = columns.require("name")?;
    let team_col = columns.index_of("team");
    let position_col = columns.index_of("position");
    let stat_cols = columns.stat_columns(REFERENCE_COLUMNS);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad reference record {}", line + 1))?;

        rows.push(ReferenceRow {
            name: optional_cell(&record, Some(name_col)).unwrap_or_default(),
            team: optional_cell(&record, team_col),
            position: optional_cell(&record, position_col),
            stats: parse_stats(&record, &stat_cols),
        });
    }
    Ok(rows)
}
