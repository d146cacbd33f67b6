//! Store — the cleaned inspection table held in memory.
//!
//! An [`InspectionStore`] is built once from raw rows and a [`Normalizer`],
//! then handed by reference to whatever reads it (CLI summaries, dashboard,
//! export). There is no process-wide cache; the caller owns the lifetime.

use crate::filter::Filter;
use crate::normalizer::Normalizer;
use crate::schema::Schema;
use crate::types::{CleanRecord, InspectionRecord};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct InspectionStore {
    schema: Schema,
    records: Vec<CleanRecord>,
}

impl InspectionStore {
    /// Clean `rows` with `normalizer` and keep the result.
    pub fn load(schema: Schema, rows: &[InspectionRecord], normalizer: &Normalizer) -> Self {
        let records = normalizer.clean_dataset(rows);
        tracing::info!(rows = records.len(), "inspection store loaded");
        Self { schema, records }
    }

    /// Wrap records that are already clean.
    pub fn from_clean(schema: Schema, records: Vec<CleanRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filtered(&self, filter: &Filter) -> Vec<&CleanRecord> {
        filter.apply(&self.records)
    }

    /// Distinct non-blank sectors, sorted.
    pub fn sectors(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.sector.as_deref()))
    }

    /// Distinct non-blank sub-areas, sorted. With a sector given, only the
    /// sub-areas inspected in that sector.
    pub fn sub_areas(&self, sector: Option<&str>) -> Vec<String> {
        let sector = sector.map(str::trim);
        distinct(
            self.records
                .iter()
                .filter(|r| sector.is_none() || r.sector.as_deref().map(str::trim) == sector)
                .map(|r| r.sub_area.as_deref()),
        )
    }

    /// Distinct canonical pest labels, sorted.
    pub fn pests(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.canonical_pest.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest inspection date, if any record is dated.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.inspection_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

fn distinct<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    cells
        .filter_map(|c| c.map(str::trim))
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
