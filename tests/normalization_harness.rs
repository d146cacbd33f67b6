#![allow(unused)]
//! Normalizer integration harness.
//!
//! # What this covers
//!
//! - **Pest names**: spelling variants collapse onto one canonical label;
//!   blank descriptions read as `unspecified`; unknown text falls back to
//!   title case (or a tag, when the rule table asks for it).
//! - **Severity**: markers are tested in order severe, moderate, mild.
//! - **Pesticides**: missing cells and "none" misspellings become the one
//!   canonical marker; real product names pass through.
//! - **Dates**: unparseable dates null the date and every calendar field.
//! - **Dataset invariants** (proptest): count and order are preserved,
//!   derived categories are never empty, cleaning is idempotent and never
//!   touches the input.
//!
//! # Running
//!
//! ```sh
//! cargo test --test normalization_harness
//! ```

mod common;
use common::*;

use palmscan_core::rules::{Fallback, PestRule, RuleTable, SeverityRule};
use palmscan_core::{InspectionRecord, Normalizer, PestCategory, Severity, PESTICIDE_SLOTS};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

const NONE: &str = "لا يوجد";

fn normalizer() -> Normalizer {
    Normalizer::default()
}

// ---------------------------------------------------------------------------
// Pest names
// ---------------------------------------------------------------------------

#[rstest]
#[case::mite_spelling("اكاروس", "أكاروس")]
#[case::mite_short_spelling("اكروس", "أكاروس")]
#[case::mite_latin("Acaros", "أكاروس")]
#[case::mite_in_sentence("اكاروس على السعف", "أكاروس")]
#[case::canonical_label("أكاروس", "أكاروس")]
#[case::weevil("سوسة النخيل الحمراء", "سوسة النخيل الحمراء")]
#[case::weevil_short("سوسة حمراء", "سوسة النخيل الحمراء")]
#[case::dubas("دوباس", "دوباس")]
#[case::worms("دود", "ديدان")]
#[case::blight("قلب ناشف", "مرض اللفحة السوداء")]
#[case::spots("بقع بنيه غائره", "بقع بنية غائرة")]
#[case::inflorescence_rot("خياس", "خياس الطلع")]
#[case::sunburn("لسعة شمس", "لسعة شمس على الثمار")]
fn known_pests_collapse_to_their_label(#[case] raw: &str, #[case] label: &str) {
    assert_eq!(
        normalizer().normalize_pest_name(Some(raw)),
        PestCategory::Known(label.to_string())
    );
}

#[rstest]
#[case::missing(None)]
#[case::empty(Some(""))]
#[case::blank(Some("   "))]
#[case::literal(Some("Unspecified"))]
fn blank_descriptions_are_unspecified(#[case] raw: Option<&str>) {
    assert_eq!(normalizer().normalize_pest_name(raw), PestCategory::Unspecified);
}

/// A weevil term without a qualifier is not enough for the weevil rule.
#[test]
fn qualified_rule_needs_a_qualifier() {
    let category = normalizer().normalize_pest_name(Some("سوسة"));
    assert!(!category.is_known(), "got {category:?}");
}

#[rstest]
#[case("red scale", "Red Scale")]
#[case("  RED  scale ", "Red  Scale")]
#[case("leaf-miner", "Leaf-Miner")]
fn unknown_pests_are_title_cased(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(
        normalizer().normalize_pest_name(Some(raw)),
        PestCategory::AdHoc(expected.to_string())
    );
}

#[test]
fn tagged_fallback_prefixes_once() {
    let rules = RuleTable::load_default().with_fallback(Fallback::Tagged("other: ".to_string()));
    let n = Normalizer::new(rules).unwrap();
    let first = n.normalize_pest_name(Some("red scale"));
    assert_eq!(first, PestCategory::AdHoc("other: red scale".to_string()));
    assert_eq!(n.normalize_pest_name(Some(first.as_str())), first);
}

#[test]
fn rules_are_first_match_wins() {
    let rules = RuleTable::new(
        vec![
            PestRule::new("first", ["scale"], Vec::<&str>::new()),
            PestRule::new("second", ["red"], Vec::<&str>::new()),
        ],
        Vec::new(),
        NONE,
        Vec::new(),
        Fallback::TitleCase,
    )
    .unwrap();
    let n = Normalizer::new(rules).unwrap();
    assert_eq!(n.normalize_pest_name(Some("red scale")).as_str(), "first");
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[rstest]
#[case::severe(Some("اصابة شديدة"), Severity::Severe)]
#[case::dense(Some("كثيف جدا"), Severity::Severe)]
#[case::moderate(Some("اصابة متوسطة"), Severity::Moderate)]
#[case::mild(Some("خفيف"), Severity::Mild)]
#[case::severe_beats_mild(Some("خفيف ثم شديدة"), Severity::Severe)]
#[case::moderate_beats_mild(Some("متوسط الى خفيف"), Severity::Moderate)]
#[case::no_marker(Some("تمت المعاينة"), Severity::Unspecified)]
#[case::missing(None, Severity::Unspecified)]
fn severity_from_notes(#[case] notes: Option<&str>, #[case] expected: Severity) {
    assert_eq!(normalizer().infer_severity(notes), expected);
}

#[test]
fn severity_rules_come_from_the_table() {
    let rules = RuleTable::new(
        Vec::new(),
        vec![SeverityRule::new(Severity::Mild, ["light"])],
        NONE,
        Vec::new(),
        Fallback::TitleCase,
    )
    .unwrap();
    let n = Normalizer::new(rules).unwrap();
    assert_eq!(n.infer_severity(Some("LIGHT damage")), Severity::Mild);
    assert_eq!(n.infer_severity(Some("شديدة")), Severity::Unspecified);
}

// ---------------------------------------------------------------------------
// Pesticides
// ---------------------------------------------------------------------------

#[rstest]
#[case::missing(None, NONE)]
#[case::joined(Some("لايوجد"), NONE)]
#[case::truncated(Some("لايوج"), NONE)]
#[case::already_canonical(Some("لا يوجد"), NONE)]
#[case::product(Some("ابامكتين"), "ابامكتين")]
fn pesticide_field(#[case] raw: Option<&str>, #[case] expected: &str) {
    assert_eq!(normalizer().normalize_pesticide_field(raw), expected);
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[test]
fn record_gets_every_derived_field() {
    let raw = RecordBuilder::new()
        .date("2024-05-01")
        .sector("7")
        .pest("اكاروس")
        .notes("اصابة شديدة")
        .pesticide(0, "ابامكتين")
        .pesticide(1, "لايوجد")
        .build();
    let clean = normalizer().clean_record(&raw);

    assert_pest!(clean, "أكاروس");
    assert_severity!(clean, Severity::Severe);
    assert_eq!(clean.year(), Some(2024));
    assert_eq!(clean.month(), Some(5));
    assert_eq!(clean.iso_week(), Some(18));
    assert_eq!(clean.pesticides[0], "ابامكتين");
    assert_eq!(clean.pesticides[1], NONE);
    assert_eq!(clean.pesticides[PESTICIDE_SLOTS - 1], NONE);
    assert_eq!(clean.pest_description.as_deref(), Some("اكاروس"));
}

#[rstest]
#[case("not a date")]
#[case("2024-13-45")]
#[case("")]
fn bad_dates_null_the_calendar(#[case] date: &str) {
    let clean = normalizer().clean_record(&RecordBuilder::new().date(date).build());
    assert_undated!(clean);
}

#[rstest]
#[case("2024-05-01")]
#[case("2024/05/01")]
#[case("05/01/2024")]
#[case("2024-05-01 08:30:00")]
#[case("2024-05-01T08:30:00Z")]
fn common_date_spellings_parse(#[case] date: &str) {
    let clean = normalizer().clean_record(&RecordBuilder::new().date(date).build());
    assert_eq!(clean.inspection_date.map(|d| d.to_string()).as_deref(), Some("2024-05-01"));
}

#[test]
fn missing_pest_row_is_unspecified() {
    let clean = normalizer().clean_record(&RecordBuilder::new().date("2024-05-01").build());
    assert_eq!(clean.canonical_pest, PestCategory::Unspecified);
    assert_eq!(clean.severity, Severity::Unspecified);
}

#[test]
fn empty_dataset_cleans_to_empty() {
    assert!(normalizer().clean_dataset(&[]).is_empty());
}

// ---------------------------------------------------------------------------
// Dataset properties
// ---------------------------------------------------------------------------

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("اكاروس".to_string()),
        Just("دوباس".to_string()),
        Just("سوسة النخيل".to_string()),
        Just("شديدة".to_string()),
        Just("متوسط".to_string()),
        Just("خفيف".to_string()),
        Just("لايوجد".to_string()),
        Just("لايوج".to_string()),
        "[a-zA-Z ]{1,12}",
        "[ا-ي ]{1,12}",
    ]
}

fn cell() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop::collection::vec(fragment(), 1..3).prop_map(|f| f.join(" ")))
}

fn date_cell() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![
        (2020i32..2026, 1u32..13, 1u32..29).prop_map(|(y, m, d)| format!("{y}-{m:02}-{d:02}")),
        "[a-z0-9/ ]{0,10}",
    ])
}

fn raw_record() -> impl Strategy<Value = InspectionRecord> {
    (date_cell(), cell(), cell(), cell(), prop::array::uniform5(cell())).prop_map(
        |(date, sector, pest, notes, pesticides)| InspectionRecord {
            inspection_date: date,
            sector,
            pest_description: pest,
            notes,
            pesticides,
            ..InspectionRecord::default()
        },
    )
}

proptest! {
    #[test]
    fn dataset_keeps_count_and_order(rows in prop::collection::vec(raw_record(), 0..40)) {
        let before = rows.clone();
        let clean = normalizer().clean_dataset(&rows);
        prop_assert_eq!(&rows, &before);
        prop_assert_eq!(clean.len(), rows.len());
        for (raw, c) in rows.iter().zip(&clean) {
            prop_assert_eq!(&c.sector, &raw.sector);
            prop_assert_eq!(&c.pest_description, &raw.pest_description);
        }
    }

    #[test]
    fn derived_categories_are_never_empty(row in raw_record()) {
        let clean = normalizer().clean_record(&row);
        prop_assert!(!clean.canonical_pest.as_str().trim().is_empty());
        prop_assert!(clean.pesticides.iter().all(|p| !p.is_empty()));
        prop_assert_eq!(clean.calendar.is_some(), clean.inspection_date.is_some());
    }

    #[test]
    fn cleaning_is_idempotent(row in raw_record()) {
        let n = normalizer();
        let once = n.clean_record(&row);
        let twice = n.clean_record(&once.to_raw());
        prop_assert_eq!(&twice.canonical_pest, &once.canonical_pest);
        prop_assert_eq!(twice.severity, once.severity);
        prop_assert_eq!(&twice.pesticides, &once.pesticides);
        prop_assert_eq!(twice.inspection_date, once.inspection_date);
        prop_assert_eq!(twice.calendar, once.calendar);
    }
}
