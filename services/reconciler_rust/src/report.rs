//! Long-format reconciliation report: one line per (reference row, compared field).

use anyhow::{anyhow, Context, Result};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use statline_rust_core::{EntityMatch, FieldDifference, ReferenceRow};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::sources::delimiter_for;

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    name: &'a str,
    position: &'a str,
    team: &'a str,
    entity_id: &'a str,
    matched_name: &'a str,
    score: f64,
    confidence: &'a str,
    field: &'a str,
    reference: Option<f64>,
    computed: Option<f64>,
    difference: Option<f64>,
}

pub struct ReportWriter<W: io::Write> {
    writer: Writer<W>,
    lines: usize,
}

impl ReportWriter<File> {
    /// Create the report file; `.tsv` paths are tab separated.
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self::from_writer(file, delimiter_for(path)))
    }
}

impl<W: io::Write> ReportWriter<W> {
    pub fn from_writer(inner: W, delimiter: u8) -> Self {
        Self {
            writer: WriterBuilder::new().delimiter(delimiter).from_writer(inner),
            lines: 0,
        }
    }

    /// Write every field difference of one matched row.
    pub fn write_match(
        &mut self,
        row: &ReferenceRow,
        matched: &EntityMatch<'_>,
        diffs: &[FieldDifference],
    ) -> Result<()> {
        let entity = matched.entity;
        let team = row.team.as_deref().unwrap_or(&entity.team);
        let position = row
            .position()
            .unwrap_or(entity.position)
            .as_str();

        for diff in diffs {
            self.writer.serialize(ReportLine {
                name: &row.name,
                position,
                team,
                entity_id: &entity.id,
                matched_name: &entity.name,
                score: matched.score,
                confidence: matched.confidence.as_str(),
                field: &diff.field,
                reference: diff.reference,
                computed: diff.computed,
                difference: diff.difference,
            })?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush report: {}", e))
    }
}
