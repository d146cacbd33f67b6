//! Normalizer — maps raw [`InspectionRecord`]s to [`CleanRecord`]s.
//!
//! Every operation is a pure function of its input and the [`RuleTable`]
//! the normalizer was built from. Malformed input never produces an error:
//! unparseable dates become `None`, missing descriptions become
//! [`PestCategory::Unspecified`], missing pesticide cells become the none
//! marker.

use crate::error::RulesError;
use crate::rules::{fold, Fallback, RuleTable};
use crate::types::{
    CalendarFields, CleanRecord, InspectionRecord, PestCategory, Severity, UNSPECIFIED,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::{NoExpand, Regex, RegexBuilder};

/// Date formats tried in order when none are configured. Month-first comes
/// before day-first so an ambiguous `03/05/2024` reads as March 5th.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// Record normalizer built from a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: RuleTable,
    /// Alternation of the none variants, longest first. `None` when the
    /// table lists no variants.
    none_pattern: Option<Regex>,
    date_formats: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(RuleTable::load_default()).expect("default rule table must compile")
    }
}

impl Normalizer {
    pub fn new(rules: RuleTable) -> Result<Self, RulesError> {
        let mut variants: Vec<&str> = rules.none_variants().iter().map(String::as_str).collect();
        variants.sort_by_key(|v| std::cmp::Reverse(v.chars().count()));

        let none_pattern = if variants.is_empty() {
            None
        } else {
            let alternation = variants
                .iter()
                .map(|v| regex::escape(v))
                .collect::<Vec<_>>()
                .join("|");
            Some(RegexBuilder::new(&alternation).case_insensitive(true).build()?)
        };

        Ok(Self {
            rules,
            none_pattern,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Replace the date formats tried by [`parse_date`](Self::parse_date).
    /// An empty list keeps the defaults.
    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        if !formats.is_empty() {
            self.date_formats = formats;
        }
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn none_marker(&self) -> &str {
        self.rules.none_marker()
    }

    // -----------------------------------------------------------------------
    // Field operations
    // -----------------------------------------------------------------------

    /// Map a free-text pest description to its canonical category.
    pub fn normalize_pest_name(&self, raw: Option<&str>) -> PestCategory {
        let trimmed = match raw.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return PestCategory::Unspecified,
        };
        let folded = fold(trimmed);
        if folded == UNSPECIFIED {
            return PestCategory::Unspecified;
        }

        if let Some(rule) = self.rules.classify_pest(&folded) {
            return PestCategory::Known(rule.label().to_string());
        }

        match self.rules.fallback() {
            Fallback::TitleCase => PestCategory::AdHoc(title_case(&folded)),
            Fallback::Tagged(tag) if trimmed.starts_with(tag.as_str()) => {
                PestCategory::AdHoc(trimmed.to_string())
            }
            Fallback::Tagged(tag) => PestCategory::AdHoc(format!("{tag}{trimmed}")),
        }
    }

    /// Infer the damage level from the inspector's notes.
    pub fn infer_severity(&self, notes: Option<&str>) -> Severity {
        notes
            .and_then(|n| self.rules.classify_severity(&fold(n)))
            .unwrap_or(Severity::Unspecified)
    }

    /// Replace a missing pesticide cell by the none marker and collapse the
    /// known misspellings of "none" onto it.
    pub fn normalize_pesticide_field(&self, raw: Option<&str>) -> String {
        let Some(text) = raw else {
            return self.rules.none_marker().to_string();
        };
        match &self.none_pattern {
            Some(re) => re
                .replace_all(text, NoExpand(self.rules.none_marker()))
                .into_owned(),
            None => text.to_string(),
        }
    }

    /// Parse free-text date input; anything unrecognised yields `None`.
    pub fn parse_date(&self, text: Option<&str>) -> Option<NaiveDate> {
        let text = text?.trim();
        if text.is_empty() {
            return None;
        }
        for format in &self.date_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(dt.date());
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Some(date);
            }
        }
        DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
    }

    // -----------------------------------------------------------------------
    // Record operations
    // -----------------------------------------------------------------------

    /// Normalise one record. Never fails and never touches `record`.
    pub fn clean_record(&self, record: &InspectionRecord) -> CleanRecord {
        let inspection_date = self.parse_date(record.inspection_date.as_deref());
        CleanRecord {
            inspection_date,
            treatment_date: self.parse_date(record.treatment_date.as_deref()),
            sector: record.sector.clone(),
            sub_area: record.sub_area.clone(),
            pest_description: record.pest_description.clone(),
            pest_class: record.pest_class.clone(),
            notes: record.notes.clone(),
            pesticides: record
                .pesticides
                .each_ref()
                .map(|p| self.normalize_pesticide_field(p.as_deref())),
            extra: record.extra.clone(),
            canonical_pest: self.normalize_pest_name(record.pest_description.as_deref()),
            severity: self.infer_severity(record.notes.as_deref()),
            calendar: inspection_date.map(CalendarFields::from_date),
        }
    }

    /// Normalise every row, preserving order and count.
    pub fn clean_dataset(&self, records: &[InspectionRecord]) -> Vec<CleanRecord> {
        let cleaned: Vec<CleanRecord> = records.iter().map(|r| self.clean_record(r)).collect();

        let undated = records
            .iter()
            .zip(&cleaned)
            .filter(|(raw, clean)| {
                raw.inspection_date.as_deref().is_some_and(|d| !d.trim().is_empty())
                    && clean.inspection_date.is_none()
            })
            .count();
        if undated > 0 {
            tracing::warn!(rows = undated, "inspection dates could not be parsed");
        }
        tracing::debug!(rows = cleaned.len(), "dataset cleaned");
        cleaned
    }
}

/// Capitalise the first letter of every alphabetic run and lower-case the
/// rest. Letters whose case mapping is not a single character (`ß` -> `SS`)
/// are kept as they are, so applying this twice changes nothing.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.push(single(c.to_lowercase()).unwrap_or(c));
            } else {
                out.push(single(c.to_uppercase()).unwrap_or(c));
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let c = mapped.next()?;
    mapped.next().is_none().then_some(c)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
