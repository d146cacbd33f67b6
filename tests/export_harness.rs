#![allow(unused)]
//! Clean-and-export harness.
//!
//! # What this covers
//!
//! - **clean_file**: a spreadsheet CSV on disk is read, cleaned and written
//!   beside it with the five derived columns appended.
//! - **Re-cleaning**: cleaning an exported file again yields the same file.
//! - **Config**: delimiter and BOM settings are honoured.
//! - **Summary output**: the plain-text and JSON renderings of a summary.
//!
//! # Running
//!
//! ```sh
//! cargo test --test export_harness
//! # Update snapshots after intentional changes:
//! cargo insta review
//! ```

mod common;
use common::*;

use palmscan::core::{Config, Filter, Normalizer};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BOM: &str = "\u{feff}";

fn clean_fixture(dir: &TempDir, config: &Config) -> (palmscan::CleanReport, String) {
    let input = write_table(dir.path(), "inspections.csv", INSPECTIONS_CSV);
    let output = palmscan::default_output_path(&input);
    let report = palmscan::clean_file(&input, &output, config, &Normalizer::default()).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    (report, text)
}

// ---------------------------------------------------------------------------
// clean_file
// ---------------------------------------------------------------------------

#[test]
fn clean_file_appends_derived_columns() {
    let dir = TempDir::new().unwrap();
    let (report, text) = clean_fixture(&dir, &Config::defaults());

    assert_eq!(report.rows, INSPECTIONS_ROWS);
    assert_eq!(report.undated, 1);
    assert_eq!(report.unmatched_pests, 1);
    assert_eq!(report.output, dir.path().join("inspections_clean.csv"));

    let text = text.strip_prefix(BOM).expect("export starts with a BOM");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), INSPECTIONS_ROWS + 1);
    assert_eq!(
        lines[0],
        format!("{ARABIC_HEADER},canonical_pest,severity,year,month,iso_week")
    );
    assert_eq!(
        lines[1],
        "2024-05-01,2024-05-02,7,أ,اكروس,حشرات,اصابة شديدة,ابامكتين,لا يوجد,لا يوجد,لا يوجد,لا يوجد,أكاروس,severe,2024,5,18"
    );
    assert_eq!(
        lines[5],
        ",,28,ج,دوباس,حشرات,كثيف جدا,لا يوجد,لا يوجد,لا يوجد,لا يوجد,لا يوجد,دوباس,severe,,,"
    );
}

#[test]
fn recleaning_an_export_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let (_, first) = clean_fixture(&dir, &Config::defaults());

    let cleaned = dir.path().join("inspections_clean.csv");
    let again = dir.path().join("again.csv");
    palmscan::clean_file(&cleaned, &again, &Config::defaults(), &Normalizer::default()).unwrap();

    assert_eq!(std::fs::read_to_string(&again).unwrap(), first);
}

#[test]
fn config_controls_delimiter_and_bom() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_toml_str(
        r#"
        [data]
        delimiter  = ";"
        export_bom = false
        "#,
    )
    .unwrap();
    let input = write_table(
        dir.path(),
        "semi.csv",
        "inspection_date;sector;pest_description\n2024-05-01;7;اكاروس\n",
    );
    let output = dir.path().join("out.csv");
    palmscan::clean_file(&input, &output, &config, &Normalizer::default()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(!text.starts_with(BOM));
    assert_eq!(
        text,
        "inspection_date,sector,pest_description,canonical_pest,severity,year,month,iso_week\n\
         2024-05-01,7,اكاروس,أكاروس,unspecified,2024,5,18\n"
    );
}

#[test]
fn missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = palmscan::clean_file(
        &dir.path().join("absent.csv"),
        &dir.path().join("out.csv"),
        &Config::defaults(),
        &Normalizer::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("absent.csv"), "{err:#}");
}

// ---------------------------------------------------------------------------
// Summary output
// ---------------------------------------------------------------------------

#[test]
fn summary_text() {
    let dir = TempDir::new().unwrap();
    let input = write_table(dir.path(), "inspections.csv", INSPECTIONS_CSV);
    let config = Config::defaults();
    let store = palmscan::load_store(&input, &config, &Normalizer::default()).unwrap();
    let report = palmscan::summarize(&store, &Filter::default(), "لا يوجد", 3);

    insta::assert_snapshot!(palmscan::render_summary(&report), @r"
filter   all records
records  6
pests    5
sectors  3
sub-areas 3
severity severe=2 moderate=1 mild=1 unspecified=2

top pests
      2  أكاروس
      1  Red Scale
      1  unspecified

pest classes
      5  حشرات

top pesticides
      2  ابامكتين
      1  امداكلوبريد

weekly
  2024-04-29  2
  2024-05-06  2
  2024-05-20  1
");
}

#[test]
fn summary_json_is_flat() {
    let store = store_of(&[visit("2024-05-01", "7", "اكاروس")]);
    let report = palmscan::summarize(&store, &Filter::default(), "لا يوجد", 3);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["records"], 1);
    assert_eq!(json["filter"], "all records");
    assert_eq!(json["sub_areas"], 0);
    assert_eq!(json["top_pests"][0]["label"], "أكاروس");
    assert_eq!(json["severity"][3]["severity"], "unspecified");
    assert_eq!(json["severity"][3]["count"], 1);
    assert_eq!(json["weekly"][0]["week_start"], "2024-04-29");
}
