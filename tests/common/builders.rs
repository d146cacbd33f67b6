//! Test builders: ergonomic constructors for raw records and stores.
//!
//! These builders are for readable test setup, not production use.

use palmscan_core::{CleanRecord, InspectionRecord, InspectionStore, Normalizer, Schema};

// ---------------------------------------------------------------------------
// InspectionRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`InspectionRecord`] fixtures.
///
/// ```rust
/// let row = RecordBuilder::new()
///     .date("2024-05-01")
///     .sector("7")
///     .pest("اكاروس")
///     .notes("اصابة شديدة")
///     .build();
/// ```
#[derive(Default)]
pub struct RecordBuilder {
    record: InspectionRecord,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: &str) -> Self {
        self.record.inspection_date = Some(date.to_string());
        self
    }

    pub fn treated(mut self, date: &str) -> Self {
        self.record.treatment_date = Some(date.to_string());
        self
    }

    pub fn sector(mut self, sector: &str) -> Self {
        self.record.sector = Some(sector.to_string());
        self
    }

    pub fn sub_area(mut self, sub_area: &str) -> Self {
        self.record.sub_area = Some(sub_area.to_string());
        self
    }

    pub fn pest(mut self, description: &str) -> Self {
        self.record.pest_description = Some(description.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.record.pest_class = Some(class.to_string());
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.record.notes = Some(notes.to_string());
        self
    }

    /// Panics when `slot` is out of range.
    pub fn pesticide(mut self, slot: usize, name: &str) -> Self {
        self.record.pesticides[slot] = Some(name.to_string());
        self
    }

    pub fn build(self) -> InspectionRecord {
        self.record
    }
}

// ---------------------------------------------------------------------------
// Store helpers
// ---------------------------------------------------------------------------

/// Clean `rows` with the default vocabulary.
pub fn clean_all(rows: &[InspectionRecord]) -> Vec<CleanRecord> {
    Normalizer::default().clean_dataset(rows)
}

/// A store over `rows` with the canonical schema.
pub fn store_of(rows: &[InspectionRecord]) -> InspectionStore {
    InspectionStore::load(Schema::canonical(), rows, &Normalizer::default())
}

/// Shorthand for a dated row in a sector with a pest description.
pub fn visit(date: &str, sector: &str, pest: &str) -> InspectionRecord {
    RecordBuilder::new().date(date).sector(sector).pest(pest).build()
}
