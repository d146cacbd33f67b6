//! Aggregations behind the dashboard panels and `palmscan summary`.
//!
//! Every function takes any iterator of record references, so the same code
//! serves the full store and a filtered view. Ranked lists are ordered by
//! descending count, ties by label.

use crate::types::{CleanRecord, Severity};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Headline numbers for a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub unique_pests: usize,
    pub sectors: usize,
    pub sub_areas: usize,
}

/// One entry of a ranked count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub label: String,
    pub count: usize,
}

/// Inspections in the week starting on `week_start` (a Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyCount {
    pub week_start: NaiveDate,
    pub count: usize,
}

pub fn summary<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let mut total = 0;
    let mut pests = HashSet::new();
    let mut sectors = HashSet::new();
    let mut sub_areas = HashSet::new();
    for r in records {
        total += 1;
        pests.insert(r.canonical_pest.as_str());
        if let Some(s) = non_blank(&r.sector) {
            sectors.insert(s);
        }
        if let Some(s) = non_blank(&r.sub_area) {
            sub_areas.insert(s);
        }
    }
    Summary {
        records: total,
        unique_pests: pests.len(),
        sectors: sectors.len(),
        sub_areas: sub_areas.len(),
    }
}

/// Most frequent canonical pests.
pub fn top_pests<'a, I>(records: I, n: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    rank(records.into_iter().map(|r| r.canonical_pest.as_str()), n)
}

/// Counts of the pest-class column; blank classes are skipped.
pub fn class_distribution<'a, I>(records: I) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let classes = records
        .into_iter()
        .filter_map(|r| r.pest_class.as_deref().map(str::trim))
        .filter(|c| !c.is_empty());
    rank(classes, usize::MAX)
}

/// Most used pesticides across all five slots. Cells containing
/// `none_marker` anywhere (e.g. `لا يوجد - رش لاحق`) are not pesticides.
pub fn top_pesticides<'a, I>(records: I, none_marker: &str, n: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let names = records
        .into_iter()
        .flat_map(|r| r.pesticides.iter())
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && !p.contains(none_marker));
    rank(names, n)
}

/// Count per severity level, in [`Severity::ALL`] order, zeros included.
pub fn severity_breakdown<'a, I>(records: I) -> Vec<(Severity, usize)>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let mut counts: HashMap<Severity, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.severity).or_default() += 1;
    }
    Severity::ALL
        .into_iter()
        .map(|s| (s, counts.get(&s).copied().unwrap_or(0)))
        .collect()
}

/// Inspections per Monday-starting week, oldest first. Undated records are
/// skipped; weeks with no inspections are absent.
pub fn weekly_counts<'a, I>(records: I) -> Vec<WeeklyCount>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let mut weeks: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in records.into_iter().filter_map(|r| r.inspection_date) {
        *weeks.entry(week_start(date)).or_default() += 1;
    }
    weeks
        .into_iter()
        .map(|(week_start, count)| WeeklyCount { week_start, count })
        .collect()
}

fn non_blank(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn rank<'a, I>(labels: I, n: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranked: Vec<Ranked> = counts
        .into_iter()
        .map(|(label, count)| Ranked { label: label.to_string(), count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
