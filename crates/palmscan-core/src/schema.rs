//! Source-table schema: which header is which inspection field.
//!
//! Headers are resolved through a compile-time alias map covering the
//! Arabic headers of the field-inspection spreadsheet and English
//! snake_case names. Headers that resolve to nothing are pass-through
//! columns and are carried verbatim in [`InspectionRecord::extra`].

use crate::types::{InspectionRecord, PESTICIDE_SLOTS};
use phf::phf_map;

/// A known inspection column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    InspectionDate,
    TreatmentDate,
    Sector,
    SubArea,
    PestDescription,
    PestClass,
    Notes,
    /// Zero-based pesticide slot (`المبيد 1` is slot 0).
    Pesticide(usize),
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::InspectionDate,
        Column::TreatmentDate,
        Column::Sector,
        Column::SubArea,
        Column::PestDescription,
        Column::PestClass,
        Column::Notes,
        Column::Pesticide(0),
        Column::Pesticide(1),
        Column::Pesticide(2),
        Column::Pesticide(3),
        Column::Pesticide(4),
    ];

    /// The header the inspection spreadsheet uses for this column.
    pub fn header(self) -> String {
        match self {
            Column::InspectionDate => "تاريخ الفحص".to_string(),
            Column::TreatmentDate => "تاريخ المعاملة".to_string(),
            Column::Sector => "القطاع".to_string(),
            Column::SubArea => "القطاع الفرعي".to_string(),
            Column::PestDescription => "وصف الافة".to_string(),
            Column::PestClass => "تصنيف الافة".to_string(),
            Column::Notes => "ملاحظات".to_string(),
            Column::Pesticide(slot) => format!("المبيد {}", slot + 1),
        }
    }

    /// Resolve a header through the alias map. Leading/trailing whitespace
    /// is ignored; English aliases match case-insensitively with spaces or
    /// dashes in place of underscores.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        HEADER_ALIASES.get(header).copied().or_else(|| {
            let key = header.to_lowercase().replace([' ', '-'], "_");
            HEADER_ALIASES.get(key.as_str()).copied()
        })
    }
}

static HEADER_ALIASES: phf::Map<&'static str, Column> = phf_map! {
    "تاريخ الفحص" => Column::InspectionDate,
    "تاريخ المعاملة" => Column::TreatmentDate,
    "القطاع" => Column::Sector,
    "القطاع الفرعي" => Column::SubArea,
    "المنطقة الفرعية" => Column::SubArea,
    "المحبس" => Column::SubArea,
    "وصف الافة" => Column::PestDescription,
    "وصف الآفة" => Column::PestDescription,
    "تصنيف الافة" => Column::PestClass,
    "تصنيف الآفة" => Column::PestClass,
    "ملاحظات" => Column::Notes,
    "المبيد 1" => Column::Pesticide(0),
    "المبيد 2" => Column::Pesticide(1),
    "المبيد 3" => Column::Pesticide(2),
    "المبيد 4" => Column::Pesticide(3),
    "المبيد 5" => Column::Pesticide(4),
    "inspection_date" => Column::InspectionDate,
    "treatment_date" => Column::TreatmentDate,
    "sector" => Column::Sector,
    "sub_area" => Column::SubArea,
    "pest_description" => Column::PestDescription,
    "raw_pest_description" => Column::PestDescription,
    "pest_class" => Column::PestClass,
    "notes" => Column::Notes,
    "pesticide_1" => Column::Pesticide(0),
    "pesticide_2" => Column::Pesticide(1),
    "pesticide_3" => Column::Pesticide(2),
    "pesticide_4" => Column::Pesticide(3),
    "pesticide_5" => Column::Pesticide(4),
};

/// Ordered headers of a source table and the column each one maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    headers: Vec<String>,
    columns: Vec<Option<Column>>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Schema {
    /// Build a schema from source headers. A header that repeats an
    /// already-mapped column is treated as pass-through.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut seen = Vec::new();
        let columns = headers
            .iter()
            .map(|h| match Column::from_header(h) {
                Some(col) if !seen.contains(&col) => {
                    seen.push(col);
                    Some(col)
                }
                _ => None,
            })
            .collect();
        Self { headers, columns }
    }

    /// Every known column under its spreadsheet header, no extras.
    pub fn canonical() -> Self {
        Self::from_headers(Column::ALL.iter().map(|c| c.header()))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn column_at(&self, index: usize) -> Option<Column> {
        self.columns.get(index).copied().flatten()
    }

    /// Headers of the pass-through columns, in source order.
    pub fn extra_headers(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .zip(&self.columns)
            .filter(|(_, c)| c.is_none())
            .map(|(h, _)| h.as_str())
    }

    /// Known columns the source table does not provide.
    pub fn missing(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.columns.contains(&Some(*c)))
            .collect()
    }

    /// Assemble a raw record from one row of cells. Blank cells are `None`;
    /// a row shorter than the header is padded with `None`.
    pub fn record_from_cells<'a, I>(&self, cells: I) -> InspectionRecord
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut record = InspectionRecord::default();
        let mut cells = cells.into_iter();
        for column in &self.columns {
            let value = cells
                .next()
                .flatten()
                .filter(|c| !c.trim().is_empty())
                .map(str::to_string);
            match column {
                Some(Column::InspectionDate) => record.inspection_date = value,
                Some(Column::TreatmentDate) => record.treatment_date = value,
                Some(Column::Sector) => record.sector = value,
                Some(Column::SubArea) => record.sub_area = value,
                Some(Column::PestDescription) => record.pest_description = value,
                Some(Column::PestClass) => record.pest_class = value,
                Some(Column::Notes) => record.notes = value,
                Some(Column::Pesticide(slot)) if *slot < PESTICIDE_SLOTS => {
                    record.pesticides[*slot] = value
                }
                Some(Column::Pesticide(_)) | None => record.extra.push(value),
            }
        }
        record
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arabic_and_english_headers_resolve() {
        assert_eq!(Column::from_header("تاريخ الفحص"), Some(Column::InspectionDate));
        assert_eq!(Column::from_header(" وصف الآفة "), Some(Column::PestDescription));
        assert_eq!(Column::from_header("Pesticide 3"), Some(Column::Pesticide(2)));
        assert_eq!(Column::from_header("Sub-Area"), Some(Column::SubArea));
        assert_eq!(Column::from_header("الفاحص"), None);
    }

    #[test]
    fn valve_header_reads_as_sub_area() {
        let schema = Schema::from_headers(["القطاع", "المحبس", "وصف الافة"]);
        assert!(schema.extra_headers().next().is_none());
        let record = schema.record_from_cells([Some("7"), Some("أ"), Some("دوباس")]);
        assert_eq!(record.sub_area.as_deref(), Some("أ"));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn canonical_schema_round_trips_headers() {
        let schema = Schema::canonical();
        assert_eq!(schema.len(), 12);
        assert!(schema.missing().is_empty());
        assert_eq!(schema.extra_headers().count(), 0);
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(schema.column_at(i), Some(*col));
        }
    }

    #[test]
    fn unknown_and_duplicate_headers_pass_through() {
        let schema = Schema::from_headers(["م", "القطاع", "sector", "ملاحظات"]);
        assert_eq!(schema.column_at(0), None);
        assert_eq!(schema.column_at(1), Some(Column::Sector));
        assert_eq!(schema.column_at(2), None);
        assert_eq!(schema.extra_headers().collect::<Vec<_>>(), vec!["م", "sector"]);
        assert!(schema.missing().contains(&Column::InspectionDate));
    }

    #[test]
    fn record_from_short_row_pads_with_none() {
        let schema = Schema::from_headers(["م", "القطاع", "المبيد 2", "ملاحظات"]);
        let record = schema.record_from_cells([Some("7"), Some(" 28 "), Some("  ")]);
        assert_eq!(record.extra, vec![Some("7".to_string())]);
        assert_eq!(record.sector.as_deref(), Some(" 28 "));
        assert_eq!(record.pesticides[1], None);
        assert_eq!(record.notes, None);
    }
}
