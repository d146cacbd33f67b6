//! palmscan — pest-inspection record cleaner and dashboard.
//!
//! The binary is a thin shell over these helpers; integration tests import
//! them directly.
//!
//! # Architecture
//!
//! ```text
//! CSV ──► palmscan-io ──► Normalizer ──► InspectionStore ──► Filter
//!                                              │               │
//!                              CSV ◄── CsvSink ┘    Stats / Forecast ──► CLI, TUI
//! ```
//!
//! Everything is synchronous: a table is read, cleaned and analysed in one
//! pass on the calling thread.

pub use palmscan_core as core;
pub use palmscan_io as io;

use anyhow::Context;
use palmscan_core::config::Config;
use palmscan_core::forecast::{forecast_pest, Forecast};
use palmscan_core::stats::{self, Ranked, Summary, WeeklyCount};
use palmscan_core::{CleanRecord, Filter, InspectionStore, Normalizer, PestCategory, Severity};
use palmscan_io::{CsvSink, CsvSource, RecordSource, Table};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Build the normalizer the config describes (rule file, date formats).
pub fn normalizer_for(config: &Config) -> anyhow::Result<Normalizer> {
    let normalizer = config.normalizer.build().with_context(|| match &config.normalizer.rules_file {
        Some(path) => format!("loading rule table {}", path.display()),
        None => "loading built-in rule table".to_string(),
    })?;
    tracing::debug!(
        pests = normalizer.rules().pests().len(),
        severities = normalizer.rules().severities().len(),
        "normalizer ready"
    );
    Ok(normalizer)
}

/// Read a CSV table with the configured delimiter.
pub fn read_table(path: &Path, config: &Config) -> anyhow::Result<Table> {
    let delimiter = config.data.delimiter_byte()?;
    let table = CsvSource::open(path)?.with_delimiter(delimiter).read_table()?;
    Ok(table)
}

/// Read and clean a table into a store.
pub fn load_store(path: &Path, config: &Config, normalizer: &Normalizer) -> anyhow::Result<InspectionStore> {
    let table = read_table(path, config)?;
    Ok(InspectionStore::load(table.schema, &table.rows, normalizer))
}

/// `<stem>_clean.csv` beside `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "inspections".to_string());
    input.with_file_name(format!("{stem}_clean.csv"))
}

// ---------------------------------------------------------------------------
// Clean
// ---------------------------------------------------------------------------

/// Outcome of [`clean_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows: usize,
    /// Rows whose inspection date could not be parsed.
    pub undated: usize,
    /// Rows whose pest matched no rule (ad-hoc label).
    pub unmatched_pests: usize,
    pub output: PathBuf,
}

/// Read `input`, clean every row and write the result to `output`.
pub fn clean_file(
    input: &Path,
    output: &Path,
    config: &Config,
    normalizer: &Normalizer,
) -> anyhow::Result<CleanReport> {
    let store = load_store(input, config, normalizer)?;
    let mut sink = CsvSink::create(output, config.data.export_bom)?;
    let rows = sink.write_records(store.schema(), store.records())?;
    sink.into_inner()?;

    let undated = store.records().iter().filter(|r| r.inspection_date.is_none()).count();
    let unmatched_pests = store
        .records()
        .iter()
        .filter(|r| matches!(r.canonical_pest, PestCategory::AdHoc(_)))
        .count();
    tracing::info!(rows, undated, unmatched_pests, output = %output.display(), "clean complete");

    Ok(CleanReport {
        rows,
        undated,
        unmatched_pests,
        output: output.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Everything `palmscan summary` prints.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub filter: String,
    #[serde(flatten)]
    pub summary: Summary,
    pub top_pests: Vec<Ranked>,
    pub classes: Vec<Ranked>,
    pub top_pesticides: Vec<Ranked>,
    pub severity: Vec<SeverityCount>,
    pub weekly: Vec<WeeklyCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

pub fn summarize(store: &InspectionStore, filter: &Filter, none_marker: &str, top: usize) -> SummaryReport {
    let rows: Vec<&CleanRecord> = store.filtered(filter);
    SummaryReport {
        filter: filter.describe(),
        summary: stats::summary(rows.iter().copied()),
        top_pests: stats::top_pests(rows.iter().copied(), top),
        classes: stats::class_distribution(rows.iter().copied()),
        top_pesticides: stats::top_pesticides(rows.iter().copied(), none_marker, top),
        severity: stats::severity_breakdown(rows.iter().copied())
            .into_iter()
            .map(|(severity, count)| SeverityCount { severity, count })
            .collect(),
        weekly: stats::weekly_counts(rows.iter().copied()),
    }
}

/// Plain-text rendering of a [`SummaryReport`].
pub fn render_summary(report: &SummaryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "filter   {}", report.filter);
    let _ = writeln!(out, "records  {}", report.summary.records);
    let _ = writeln!(out, "pests    {}", report.summary.unique_pests);
    let _ = writeln!(out, "sectors  {}", report.summary.sectors);
    let _ = writeln!(out, "sub-areas {}", report.summary.sub_areas);

    let severity: Vec<String> = report
        .severity
        .iter()
        .map(|s| format!("{}={}", s.severity, s.count))
        .collect();
    let _ = writeln!(out, "severity {}", severity.join(" "));

    for (title, items) in [
        ("top pests", &report.top_pests),
        ("pest classes", &report.classes),
        ("top pesticides", &report.top_pesticides),
    ] {
        let _ = writeln!(out, "\n{title}");
        if items.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for r in items {
            let _ = writeln!(out, "  {:>5}  {}", r.count, r.label);
        }
    }

    let _ = writeln!(out, "\nweekly");
    if report.weekly.is_empty() {
        let _ = writeln!(out, "  (no dated records)");
    }
    for w in &report.weekly {
        let _ = writeln!(out, "  {}  {}", w.week_start, w.count);
    }
    out
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

/// Forecast `pest` over the records passing `filter`.
pub fn forecast(
    store: &InspectionStore,
    filter: &Filter,
    pest: &str,
    periods: usize,
) -> Option<Forecast> {
    forecast_pest(store.filtered(filter), pest, filter.sector.as_deref(), periods)
}

pub fn render_forecast(pest: &str, forecast: &Forecast) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{pest}: {} observed days, trend {:+.3}/day{}",
        forecast.history.len(),
        forecast.slope,
        if forecast.seasonal { ", weekly seasonality" } else { "" }
    );
    for p in &forecast.points {
        let _ = writeln!(out, "  {}  {:.2}", p.date, p.yhat);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
