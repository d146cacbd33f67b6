//! palmscan-io — inspection tables on disk.
//!
//! A [`RecordSource`] yields a [`Table`]: the source [`Schema`] plus one raw
//! [`InspectionRecord`] per data row, in file order. [`CsvSink`] writes
//! cleaned records back out in source-column order followed by the derived
//! columns.

pub mod error;
pub mod sink;
pub mod source;

pub use error::TableError;
pub use palmscan_core::schema::{Column, Schema};
pub use sink::{CsvSink, DERIVED_HEADERS};
pub use source::CsvSource;

use palmscan_core::InspectionRecord;

/// Raw rows read from a source table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub schema: Schema,
    pub rows: Vec<InspectionRecord>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything that can produce a [`Table`].
pub trait RecordSource {
    /// Human-readable name of the source, used in logs and errors.
    fn label(&self) -> &str;

    fn read_table(&mut self) -> Result<Table, TableError>;
}
