//! palmscan TUI — ratatui dashboard over a cleaned inspection table.
//!
//! Three tabs mirror the inspection dashboard: an overview (headline
//! metrics, top pests and pesticides, pest classes, weekly trend), the
//! filtered records, and a per-pest forecast. Filters are driven by keys
//! (`s`, `p`, `r`) or by the `:` command bar.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod view;
pub mod widgets;

pub use app::{App, AppState};

use palmscan_core::{config::Config, InspectionStore};

/// Run the dashboard until the user quits.
///
/// `none_marker` is the canonical "no pesticide" value, excluded from the
/// pesticide ranking; `source` names the loaded table in the tab bar.
pub fn run(
    store: InspectionStore,
    config: Config,
    none_marker: &str,
    source: &str,
) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.dashboard.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.dashboard.theme, "unknown theme, using default");
        theme::Theme::load_default()
    });
    tracing::info!(rows = store.len(), source, "starting dashboard");
    App::new(AppState::new(store, config, theme, none_marker, source)).run()
}
