#![allow(unused)]
//! Forecast harness.
//!
//! # What this covers
//!
//! - Daily history is built from dated records of one pest only, optionally
//!   narrowed to a sector.
//! - Predictions start the day after the last observation, one per period,
//!   and never go negative.
//! - No dated history means no forecast.
//!
//! # Running
//!
//! ```sh
//! cargo test --test forecast_harness
//! ```

mod common;
use common::*;

use chrono::NaiveDate;
use palmscan_core::Filter;
use pretty_assertions::assert_eq;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn history_counts_only_the_requested_pest() {
    let store = store_of(&[
        visit("2024-03-01", "7", "دوباس"),
        visit("2024-03-01", "7", "دوباس"),
        visit("2024-03-01", "7", "اكاروس"),
        visit("2024-03-03", "9", "دوباس"),
        visit("bad date", "7", "دوباس"),
    ]);
    let f = palmscan::forecast(&store, &Filter::default(), "دوباس", 2).unwrap();
    assert_eq!(f.history, vec![(ymd(2024, 3, 1), 2), (ymd(2024, 3, 3), 1)]);
    assert_eq!(
        f.points.iter().map(|p| p.date).collect::<Vec<_>>(),
        vec![ymd(2024, 3, 4), ymd(2024, 3, 5)]
    );
    assert!(!f.seasonal);
}

#[test]
fn sector_narrows_the_history() {
    let store = store_of(&[
        visit("2024-03-01", "7", "دوباس"),
        visit("2024-03-02", "9", "دوباس"),
    ]);
    let f = palmscan::forecast(&store, &Filter::default().sector("9"), "دوباس", 1).unwrap();
    assert_eq!(f.history, vec![(ymd(2024, 3, 2), 1)]);
}

#[test]
fn rising_counts_extrapolate_upwards() {
    let rows: Vec<_> = (1..=5u32)
        .flat_map(|day| (0..day).map(move |_| visit(&format!("2024-03-{day:02}"), "7", "دوباس")))
        .collect();
    let f = palmscan::forecast(&store_of(&rows), &Filter::default(), "دوباس", 3).unwrap();
    assert!((f.slope - 1.0).abs() < 1e-9);
    let yhat: Vec<f64> = f.points.iter().map(|p| p.yhat).collect();
    for (got, want) in yhat.iter().zip([6.0, 7.0, 8.0]) {
        assert!((got - want).abs() < 1e-9, "{yhat:?}");
    }
}

#[test]
fn falling_counts_are_clamped_at_zero() {
    let rows: Vec<_> = (1..=4u32)
        .flat_map(|day| (0..(5 - day)).map(move |_| visit(&format!("2024-03-{day:02}"), "7", "دوباس")))
        .collect();
    let f = palmscan::forecast(&store_of(&rows), &Filter::default(), "دوباس", 10).unwrap();
    assert!(f.slope < 0.0);
    assert!(f.points.iter().all(|p| p.yhat >= 0.0));
    assert_eq!(f.points.last().map(|p| p.yhat), Some(0.0));
}

#[test]
fn unknown_or_undated_pest_has_no_forecast() {
    let store = store_of(&[visit("bad", "7", "دوباس"), visit("2024-03-01", "7", "اكاروس")]);
    assert!(palmscan::forecast(&store, &Filter::default(), "دوباس", 7).is_none());
    assert!(palmscan::forecast(&store, &Filter::default(), "no such pest", 7).is_none());
}

#[test]
fn render_lists_each_predicted_day() {
    let store = store_of(&[visit("2024-03-01", "7", "دوباس"), visit("2024-03-02", "7", "دوباس")]);
    let f = palmscan::forecast(&store, &Filter::default(), "دوباس", 2).unwrap();
    let text = palmscan::render_forecast("دوباس", &f);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("دوباس: 2 observed days"), "{text}");
    assert_eq!(lines[1], "  2024-03-03  1.00");
    assert_eq!(lines[2], "  2024-03-04  1.00");
}
