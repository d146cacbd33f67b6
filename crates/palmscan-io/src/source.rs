//! CSV source.
//!
//! The first row is the header. Rows may be shorter or longer than the
//! header; missing cells read as `None`, surplus cells are dropped. Known
//! columns absent from the header are logged at `warn` and left `None` in
//! every record.

use crate::error::TableError;
use crate::{RecordSource, Table};
use csv::ReaderBuilder;
use palmscan_core::Schema;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BOM: char = '\u{feff}';

pub struct CsvSource<R> {
    reader: R,
    label: String,
    delimiter: u8,
}

impl CsvSource<File> {
    pub fn open(path: &Path) -> Result<Self, TableError> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| TableError::io(&label, e))?;
        Ok(Self::from_reader(file, label))
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, label: impl Into<String>) -> Self {
        Self {
            reader,
            label: label.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl<R: Read> RecordSource for CsvSource<R> {
    fn label(&self) -> &str {
        &self.label
    }

    fn read_table(&mut self) -> Result<Table, TableError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(&mut self.reader);

        let headers = rdr
            .headers()
            .map_err(|e| TableError::csv(&self.label, e))?
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { h.trim_start_matches(BOM) } else { h })
            .map(str::to_string)
            .collect::<Vec<_>>();
        let schema = Schema::from_headers(headers);

        let missing = schema.missing();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|c| c.header()).collect();
            tracing::warn!(source = %self.label, missing = ?names, "source table lacks known columns");
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TableError::csv(&self.label, e))?;
            rows.push(schema.record_from_cells(record.iter().map(Some)));
        }

        tracing::info!(source = %self.label, rows = rows.len(), columns = schema.len(), "table read");
        Ok(Table { schema, rows })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
