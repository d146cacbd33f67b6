//! Derived dashboard data, recomputed whenever the filter changes.

use palmscan_core::forecast::Forecast;
use palmscan_core::stats::{self, Ranked, Summary, WeeklyCount};
use palmscan_core::types::UNSPECIFIED;
use palmscan_core::{CleanRecord, Filter, InspectionStore, Severity};

#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Indices into the store's records that pass the filter, in order.
    pub rows: Vec<usize>,
    pub summary: Summary,
    pub top_pests: Vec<Ranked>,
    pub classes: Vec<Ranked>,
    pub top_pesticides: Vec<Ranked>,
    pub severities: Vec<(Severity, usize)>,
    pub weekly: Vec<WeeklyCount>,
    /// Pest the forecast tab shows: the pest filter, else the most
    /// frequent classified pest in view.
    pub forecast_pest: Option<String>,
    pub forecast: Option<Forecast>,
}

impl DashboardView {
    pub fn compute(
        store: &InspectionStore,
        filter: &Filter,
        none_marker: &str,
        top_n: usize,
        periods: usize,
    ) -> Self {
        let records = store.records();
        let rows: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();
        let view: Vec<&CleanRecord> = rows.iter().map(|i| &records[*i]).collect();

        let top_pests = stats::top_pests(view.iter().copied(), top_n);
        let forecast_pest = filter.pest.clone().or_else(|| {
            top_pests
                .iter()
                .find(|r| r.label != UNSPECIFIED)
                .or(top_pests.first())
                .map(|r| r.label.clone())
        });
        let forecast = forecast_pest.as_deref().and_then(|pest| {
            palmscan_core::forecast::forecast_pest(view.iter().copied(), pest, filter.sector.as_deref(), periods)
        });

        Self {
            summary: stats::summary(view.iter().copied()),
            classes: stats::class_distribution(view.iter().copied()),
            top_pesticides: stats::top_pesticides(view.iter().copied(), none_marker, top_n),
            severities: stats::severity_breakdown(view.iter().copied()),
            weekly: stats::weekly_counts(view.iter().copied()),
            top_pests,
            forecast_pest,
            forecast,
            rows,
        }
    }
}
