//! Domain-specific assertion macros for palmscan harnesses.
//!
//! These add context to failure messages so it is clear which record and
//! which derived field went wrong.

/// Assert the canonical pest label of a cleaned record.
///
/// ```rust
/// assert_pest!(records[0], "أكاروس");
/// ```
#[macro_export]
macro_rules! assert_pest {
    ($record:expr, $label:expr) => {{
        let record: &palmscan_core::CleanRecord = &$record;
        let expected: &str = $label;
        if record.canonical_pest.as_str() != expected {
            panic!(
                "assert_pest! failed:\n  description: {:?}\n  expected:    {:?}\n  actual:      {:?}",
                record.pest_description,
                expected,
                record.canonical_pest.as_str()
            );
        }
    }};
}

/// Assert the inferred severity of a cleaned record.
#[macro_export]
macro_rules! assert_severity {
    ($record:expr, $severity:expr) => {{
        let record: &palmscan_core::CleanRecord = &$record;
        let expected: palmscan_core::Severity = $severity;
        if record.severity != expected {
            panic!(
                "assert_severity! failed:\n  notes:    {:?}\n  expected: {}\n  actual:   {}",
                record.notes, expected, record.severity
            );
        }
    }};
}

/// Assert that a record carries no date and no calendar fields.
#[macro_export]
macro_rules! assert_undated {
    ($record:expr) => {{
        let record: &palmscan_core::CleanRecord = &$record;
        assert!(
            record.inspection_date.is_none()
                && record.year().is_none()
                && record.month().is_none()
                && record.iso_week().is_none(),
            "assert_undated! failed: record dated {:?} (calendar {:?})",
            record.inspection_date,
            record.calendar
        );
    }};
}
