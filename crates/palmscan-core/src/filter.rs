//! Record filters: sector, sub-area, canonical pest and an inclusive date
//! window.
//!
//! A `None` criterion means "all". As soon as either date bound is set,
//! records without an inspection date drop out, since they cannot be placed
//! inside any window.

use crate::types::CleanRecord;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub sector: Option<String>,
    pub sub_area: Option<String>,
    pub pest: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.sector.is_none()
            && self.sub_area.is_none()
            && self.pest.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn sub_area(mut self, sub_area: impl Into<String>) -> Self {
        self.sub_area = Some(sub_area.into());
        self
    }

    pub fn pest(mut self, pest: impl Into<String>) -> Self {
        self.pest = Some(pest.into());
        self
    }

    pub fn since(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn matches(&self, record: &CleanRecord) -> bool {
        if !cell_matches(self.sector.as_deref(), record.sector.as_deref())
            || !cell_matches(self.sub_area.as_deref(), record.sub_area.as_deref())
        {
            return false;
        }
        if let Some(pest) = &self.pest {
            if record.canonical_pest.as_str() != pest.trim() {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            let Some(date) = record.inspection_date else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }

    /// Apply to a slice, keeping order.
    pub fn apply<'a>(&self, records: &'a [CleanRecord]) -> Vec<&'a CleanRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// One-line human description, e.g. `sector=28 pest=دوباس from=2024-01-01`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "all records".to_string();
        }
        let mut parts = Vec::new();
        if let Some(s) = &self.sector {
            parts.push(format!("sector={s}"));
        }
        if let Some(s) = &self.sub_area {
            parts.push(format!("sub_area={s}"));
        }
        if let Some(p) = &self.pest {
            parts.push(format!("pest={p}"));
        }
        if let Some(d) = self.from {
            parts.push(format!("from={d}"));
        }
        if let Some(d) = self.to {
            parts.push(format!("to={d}"));
        }
        parts.join(" ")
    }
}

/// A free-text criterion matches the trimmed cell; a blank cell never
/// matches a set criterion.
fn cell_matches(criterion: Option<&str>, cell: Option<&str>) -> bool {
    match (criterion, cell) {
        (None, _) => true,
        (Some(want), Some(have)) => have.trim() == want.trim(),
        (Some(_), None) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
