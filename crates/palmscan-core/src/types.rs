//! Core types for palmscan-core.
//!
//! [`InspectionRecord`] is a raw row as read from the source table;
//! [`CleanRecord`] is the normalised value produced from it. The derived
//! categories ([`PestCategory`], [`Severity`]) and the date-derived
//! [`CalendarFields`] live here as well.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Number of pesticide columns on an inspection row.
pub const PESTICIDE_SLOTS: usize = 5;

/// A single field inspection as read from the source table.
///
/// Every field is optional: inspection sheets are hand-entered and any cell
/// may be blank. Columns the schema does not recognise are kept in `extra`,
/// positionally aligned with [`Schema::extra_headers`](crate::Schema::extra_headers).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionRecord {
    pub inspection_date: Option<String>,
    pub treatment_date: Option<String>,
    pub sector: Option<String>,
    pub sub_area: Option<String>,
    /// Free-text pest description as typed by the inspector.
    pub pest_description: Option<String>,
    /// Pest classification column (insect, disease, …), passed through.
    pub pest_class: Option<String>,
    pub notes: Option<String>,
    pub pesticides: [Option<String>; PESTICIDE_SLOTS],
    pub extra: Vec<Option<String>>,
}

/// An inspection after normalisation.
///
/// Produced by [`Normalizer::clean_record`](crate::Normalizer::clean_record);
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRecord {
    pub inspection_date: Option<NaiveDate>,
    pub treatment_date: Option<NaiveDate>,
    pub sector: Option<String>,
    pub sub_area: Option<String>,
    /// The raw description, kept so the output table retains its columns.
    pub pest_description: Option<String>,
    pub pest_class: Option<String>,
    pub notes: Option<String>,
    /// Pesticide names or the none marker. Never empty of meaning: a missing
    /// cell has already been replaced by the marker.
    pub pesticides: [String; PESTICIDE_SLOTS],
    pub extra: Vec<Option<String>>,
    pub canonical_pest: PestCategory,
    pub severity: Severity,
    /// `None` exactly when `inspection_date` is `None`.
    pub calendar: Option<CalendarFields>,
}

impl CleanRecord {
    pub fn year(&self) -> Option<i32> {
        self.calendar.map(|c| c.year)
    }

    pub fn month(&self) -> Option<u32> {
        self.calendar.map(|c| c.month)
    }

    pub fn iso_week(&self) -> Option<u32> {
        self.calendar.map(|c| c.iso_week)
    }

    /// Re-express this record as a raw row, the way the cleaned spreadsheet
    /// stores it: the pest column holds the canonical label, dates are ISO
    /// formatted and pesticide cells hold their normalised text.
    ///
    /// Cleaning the result again yields the same derived values.
    pub fn to_raw(&self) -> InspectionRecord {
        InspectionRecord {
            inspection_date: self.inspection_date.map(|d| d.format("%Y-%m-%d").to_string()),
            treatment_date: self.treatment_date.map(|d| d.format("%Y-%m-%d").to_string()),
            sector: self.sector.clone(),
            sub_area: self.sub_area.clone(),
            pest_description: match &self.canonical_pest {
                PestCategory::Unspecified => None,
                other => Some(other.as_str().to_string()),
            },
            pest_class: self.pest_class.clone(),
            notes: self.notes.clone(),
            pesticides: self.pesticides.clone().map(Some),
            extra: self.extra.clone(),
        }
    }
}

/// Calendar fields derived from a single inspection date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    /// ISO-8601 week number (1–53).
    pub iso_week: u32,
}

impl CalendarFields {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            iso_week: date.iso_week().week(),
        }
    }
}

/// The canonical pest category assigned to a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PestCategory {
    /// A label from the rule table.
    Known(String),
    /// Text no rule recognised, rendered by the table's fallback policy.
    AdHoc(String),
    /// The description was missing or blank.
    Unspecified,
}

/// Label used for [`PestCategory::Unspecified`] unless the rule table
/// overrides it.
pub const UNSPECIFIED: &str = "unspecified";

impl PestCategory {
    pub fn as_str(&self) -> &str {
        match self {
            PestCategory::Known(label) | PestCategory::AdHoc(label) => label,
            PestCategory::Unspecified => UNSPECIFIED,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, PestCategory::Known(_))
    }
}

impl std::fmt::Display for PestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PestCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Coarse damage level inferred from the inspector's notes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Severe,
    Moderate,
    Mild,
    Unspecified,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Severe,
        Severity::Moderate,
        Severity::Mild,
        Severity::Unspecified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Severe => "severe",
            Severity::Moderate => "moderate",
            Severity::Mild => "mild",
            Severity::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
