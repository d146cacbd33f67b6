//! CSV sink for cleaned records.
//!
//! Columns are written in source order. Date columns hold `YYYY-MM-DD` (empty
//! when unparseable), pesticide columns hold the normalized value, every
//! other column the original text. The derived columns follow. Source
//! columns that already carry a derived header are dropped, so cleaning an
//! exported file again does not duplicate them.

use crate::error::TableError;
use chrono::NaiveDate;
use palmscan_core::{CleanRecord, Column, Schema};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Headers of the columns appended after the source columns.
pub const DERIVED_HEADERS: [&str; 5] = ["canonical_pest", "severity", "year", "month", "iso_week"];

const BOM: &[u8] = "\u{feff}".as_bytes();

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    label: String,
}

impl CsvSink<File> {
    /// Create (or truncate) `path`, optionally starting it with a UTF-8 BOM.
    pub fn create(path: &Path, bom: bool) -> Result<Self, TableError> {
        let label = path.display().to_string();
        let file = File::create(path).map_err(|e| TableError::io(&label, e))?;
        Self::from_writer(file, label, bom)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(mut inner: W, label: impl Into<String>, bom: bool) -> Result<Self, TableError> {
        let label = label.into();
        if bom {
            inner.write_all(BOM).map_err(|e| TableError::io(&label, e))?;
        }
        Ok(Self {
            writer: csv::Writer::from_writer(inner),
            label,
        })
    }

    /// Write the header and one row per record. Returns the number of rows.
    pub fn write_records<'a, I>(&mut self, schema: &Schema, records: I) -> Result<usize, TableError>
    where
        I: IntoIterator<Item = &'a CleanRecord>,
    {
        let keep: Vec<bool> = schema
            .headers()
            .iter()
            .enumerate()
            .map(|(i, h)| schema.column_at(i).is_some() || !DERIVED_HEADERS.contains(&h.trim()))
            .collect();

        let header = schema
            .headers()
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(h, _)| h.as_str())
            .chain(DERIVED_HEADERS);
        self.writer
            .write_record(header)
            .map_err(|e| TableError::csv(&self.label, e))?;

        let mut written = 0;
        for record in records {
            let row = row_cells(schema, &keep, record);
            self.writer
                .write_record(&row)
                .map_err(|e| TableError::csv(&self.label, e))?;
            written += 1;
        }
        tracing::info!(sink = %self.label, rows = written, "table written");
        Ok(written)
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, TableError> {
        let label = self.label;
        self.writer
            .into_inner()
            .map_err(|e| TableError::io(&label, e.into_error()))
    }
}

fn row_cells(schema: &Schema, keep: &[bool], record: &CleanRecord) -> Vec<String> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let date = |d: Option<NaiveDate>| {
        d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    };
    let number = |n: Option<String>| n.unwrap_or_default();

    let mut extra = record.extra.iter();
    let mut cells = Vec::with_capacity(schema.len() + DERIVED_HEADERS.len());
    for (i, kept) in keep.iter().enumerate() {
        let cell = match schema.column_at(i) {
            Some(Column::InspectionDate) => date(record.inspection_date),
            Some(Column::TreatmentDate) => date(record.treatment_date),
            Some(Column::Sector) => text(&record.sector),
            Some(Column::SubArea) => text(&record.sub_area),
            Some(Column::PestDescription) => text(&record.pest_description),
            Some(Column::PestClass) => text(&record.pest_class),
            Some(Column::Notes) => text(&record.notes),
            Some(Column::Pesticide(slot)) => {
                record.pesticides.get(slot).cloned().unwrap_or_default()
            }
            None => extra.next().and_then(Clone::clone).unwrap_or_default(),
        };
        if *kept {
            cells.push(cell);
        }
    }

    cells.push(record.canonical_pest.as_str().to_string());
    cells.push(record.severity.as_str().to_string());
    cells.push(number(record.year().map(|y| y.to_string())));
    cells.push(number(record.month().map(|m| m.to_string())));
    cells.push(number(record.iso_week().map(|w| w.to_string())));
    cells
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
