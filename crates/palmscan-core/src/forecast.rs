//! Per-pest inspection forecast.
//!
//! The history is the number of matching inspections per observed date. The
//! model is a least-squares linear trend, plus a day-of-week offset (mean
//! residual per weekday) once the history spans two weeks. Predictions are
//! daily, start the day after the last observation, and never go below zero.

use crate::filter::Filter;
use crate::types::CleanRecord;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum history span, in days, before weekly seasonality is fitted.
pub const SEASONALITY_MIN_SPAN_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub yhat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Observed (date, inspections) pairs the model was fitted on.
    pub history: Vec<(NaiveDate, usize)>,
    pub points: Vec<ForecastPoint>,
    /// Fitted trend, inspections per day.
    pub slope: f64,
    pub seasonal: bool,
}

/// Inspections per date, oldest first. Undated records are skipped.
pub fn daily_counts<'a, I>(records: I) -> Vec<(NaiveDate, usize)>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in records.into_iter().filter_map(|r| r.inspection_date) {
        *days.entry(date).or_default() += 1;
    }
    days.into_iter().collect()
}

/// Forecast daily inspections of `pest` (optionally within `sector`) for the
/// next `periods` days. `None` when no dated record matches.
pub fn forecast_pest<'a, I>(
    records: I,
    pest: &str,
    sector: Option<&str>,
    periods: usize,
) -> Option<Forecast>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let mut filter = Filter::default().pest(pest);
    if let Some(sector) = sector {
        filter = filter.sector(sector);
    }
    let history = daily_counts(records.into_iter().filter(|r| filter.matches(r)));
    let forecast = fit(history, periods)?;
    tracing::debug!(
        pest,
        sector,
        observations = forecast.history.len(),
        slope = forecast.slope,
        seasonal = forecast.seasonal,
        "forecast fitted"
    );
    Some(forecast)
}

/// Fit the trend + weekday model to `history` and extend it `periods` days.
pub fn fit(history: Vec<(NaiveDate, usize)>, periods: usize) -> Option<Forecast> {
    let (first, _) = *history.first()?;
    let (last, _) = *history.last()?;

    let xs: Vec<f64> = history.iter().map(|(d, _)| (*d - first).num_days() as f64).collect();
    let ys: Vec<f64> = history.iter().map(|(_, c)| *c as f64).collect();
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - x_mean) * (y - y_mean)).sum();
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    let intercept = y_mean - slope * x_mean;

    let seasonal = (last - first).num_days() >= SEASONALITY_MIN_SPAN_DAYS;
    let mut offsets = [0.0f64; 7];
    if seasonal {
        let mut sums = [0.0f64; 7];
        let mut counts = [0usize; 7];
        for ((date, _), (x, y)) in history.iter().zip(xs.iter().zip(&ys)) {
            let wd = date.weekday().num_days_from_monday() as usize;
            sums[wd] += y - (intercept + slope * x);
            counts[wd] += 1;
        }
        for wd in 0..7 {
            if counts[wd] > 0 {
                offsets[wd] = sums[wd] / counts[wd] as f64;
            }
        }
    }

    let points = (1..=periods as i64)
        .map(|ahead| {
            let date = last + Duration::days(ahead);
            let x = (date - first).num_days() as f64;
            let wd = date.weekday().num_days_from_monday() as usize;
            ForecastPoint {
                date,
                yhat: (intercept + slope * x + offsets[wd]).max(0.0),
            }
        })
        .collect();

    Some(Forecast { history, points, slope, seasonal })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
