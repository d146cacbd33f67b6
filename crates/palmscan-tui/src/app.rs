//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. All state transitions
//! live on [`AppState`] so they can be exercised without a terminal.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, Step},
    theme::Theme,
    view::DashboardView,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        filter_bar::FilterBar,
        forecast::ForecastPanel,
        help::HelpPopup,
        ranked::RankedPanel,
        records_table::{RecordsTable, RecordsTableState},
        summary::SummaryCards,
        tab_bar::TabBar,
        trend::WeeklyTrend,
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use palmscan_core::{config::Config, CleanRecord, Filter, InspectionStore};
use palmscan_io::CsvSink;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};
use std::{io, path::Path, time::Duration};

// ---------------------------------------------------------------------------
// Tabs + mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Records,
    Forecast,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Records, Tab::Forecast];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Records => "records",
            Tab::Forecast => "forecast",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn step(self, step: Step) -> Tab {
        let n = Tab::ALL.len();
        let i = match step {
            Step::Forward => (self.index() + 1) % n,
            Step::Back => (self.index() + n - 1) % n,
        };
        Tab::ALL[i]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub store: InspectionStore,
    pub filter: Filter,
    pub view: DashboardView,
    pub records: RecordsTableState,
    pub active_tab: Tab,
    pub mode: Mode,
    pub theme: Theme,
    pub config: Config,
    pub forecast_periods: usize,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// Result of the last command that reports one (e.g. export).
    pub status: Option<String>,
    pub quit: bool,
    /// Name of the loaded table, shown in the tab bar.
    pub source: String,
    none_marker: String,
    sectors: Vec<String>,
    pests: Vec<String>,
}

impl AppState {
    pub fn new(
        store: InspectionStore,
        config: Config,
        theme: Theme,
        none_marker: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let none_marker = none_marker.into();
        let filter = Filter::default();
        let forecast_periods = config.forecast.periods;
        let view = DashboardView::compute(
            &store,
            &filter,
            &none_marker,
            config.dashboard.top_n,
            forecast_periods,
        );
        Self {
            sectors: store.sectors(),
            pests: store.pests(),
            store,
            filter,
            view,
            records: RecordsTableState::default(),
            active_tab: Tab::Overview,
            mode: Mode::Normal,
            theme,
            config,
            forecast_periods,
            show_help: false,
            command_bar: CommandBarState::default(),
            status: None,
            quit: false,
            source: source.into(),
            none_marker,
        }
    }

    /// Recompute every derived panel from the current filter.
    pub fn refresh(&mut self) {
        self.view = DashboardView::compute(
            &self.store,
            &self.filter,
            &self.none_marker,
            self.config.dashboard.top_n,
            self.forecast_periods,
        );
        self.records.reset();
        tracing::debug!(filter = %self.filter.describe(), rows = self.view.rows.len(), "view refreshed");
    }

    /// Records passing the current filter, in store order.
    pub fn visible_records(&self) -> Vec<&CleanRecord> {
        let all = self.store.records();
        self.view.rows.iter().map(|i| &all[*i]).collect()
    }

    /// Changing the sector drops a sub-area that the new sector lacks.
    pub fn set_sector(&mut self, sector: Option<String>) {
        self.filter.sector = sector.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        if let Some(sub) = &self.filter.sub_area {
            if !self.store.sub_areas(self.filter.sector.as_deref()).contains(sub) {
                self.filter.sub_area = None;
            }
        }
        self.refresh();
    }

    pub fn set_sub_area(&mut self, sub_area: Option<String>) {
        self.filter.sub_area = sub_area.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.refresh();
    }

    pub fn set_pest(&mut self, pest: Option<String>) {
        self.filter.pest = pest.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.filter = Filter::default();
        self.refresh();
    }

    fn cycle_sector(&mut self, step: Step) {
        let next = cycle(&self.sectors, self.filter.sector.as_deref(), step);
        self.set_sector(next);
    }

    /// Steps through the sub-areas of the selected sector, or of every
    /// sector when none is selected.
    fn cycle_sub_area(&mut self, step: Step) {
        let subs = self.store.sub_areas(self.filter.sector.as_deref());
        let next = cycle(&subs, self.filter.sub_area.as_deref(), step);
        self.set_sub_area(next);
    }

    fn cycle_pest(&mut self, step: Step) {
        let next = cycle(&self.pests, self.filter.pest.as_deref(), step);
        self.set_pest(next);
    }

    /// Write the filtered records to `path` as CSV. Returns the row count.
    pub fn export(&self, path: &Path) -> anyhow::Result<usize> {
        let mut sink = CsvSink::create(path, self.config.data.export_bom)?;
        let rows = sink.write_records(self.store.schema(), self.visible_records())?;
        sink.into_inner()?;
        Ok(rows)
    }

    /// Apply one semantic event.
    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return;
        }

        if self.mode == Mode::Command {
            self.handle_command_mode(event);
            return;
        }

        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!("entering command mode");
                self.command_bar.clear();
                self.mode = Mode::Command;
            }
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }
            AppEvent::NextTab => self.active_tab = self.active_tab.step(Step::Forward),
            AppEvent::PrevTab => self.active_tab = self.active_tab.step(Step::Back),
            AppEvent::SelectTab(i) => {
                if let Some(tab) = Tab::ALL.get(i) {
                    self.active_tab = *tab;
                }
            }
            AppEvent::CycleSector(step) => self.cycle_sector(step),
            AppEvent::CycleSubArea(step) => self.cycle_sub_area(step),
            AppEvent::CyclePest(step) => self.cycle_pest(step),
            AppEvent::ResetFilters => self.reset_filters(),
            AppEvent::Escape => self.status = None,
            AppEvent::Nav(_) | AppEvent::ScrollUp | AppEvent::ScrollDown => {
                if self.active_tab == Tab::Records {
                    let total = self.view.rows.len();
                    self.records.handle(&event, total);
                }
            }
            // Terminal resize is handled by ratatui on the next draw.
            AppEvent::Resize(_, _) => {}
            _ => {}
        }
    }

    fn handle_command_mode(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.mode = Mode::Normal;
            }
            AppEvent::Quit => self.quit = true,
            AppEvent::Enter => {
                let input = self.command_bar.input.clone();
                match Command::parse(&input) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        self.command_bar.clear();
                        self.mode = Mode::Normal;
                        if let Some(status) = execute_command(self, cmd) {
                            self.status = Some(status);
                        }
                    }
                    Err(msg) if msg.is_empty() => {
                        self.command_bar.clear();
                        self.mode = Mode::Normal;
                    }
                    Err(msg) => self.command_bar.error = Some(msg),
                }
            }
            other => self.command_bar.handle(&other),
        }
    }
}

/// Next value after `current` in `values`, wrapping through `None` ("all").
fn cycle(values: &[String], current: Option<&str>, step: Step) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let pos = current.and_then(|c| values.iter().position(|v| v == c));
    let next = match (step, pos) {
        (Step::Forward, None) => Some(0),
        (Step::Forward, Some(i)) if i + 1 < values.len() => Some(i + 1),
        (Step::Forward, Some(_)) => None,
        (Step::Back, None) => Some(values.len() - 1),
        (Step::Back, Some(0)) => None,
        (Step::Back, Some(i)) => Some(i - 1),
    };
    next.map(|i| values[i].clone())
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        App { state }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        let app_event = if self.state.mode == Mode::Command {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(mode = ?self.state.mode, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // 1-line tab bar | 3-line filter bar | body
    let [tabs_area, filter_area, body] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let theme = &state.theme;
    frame.render_widget(TabBar::new(state.active_tab, &state.source, theme), tabs_area);
    frame.render_widget(
        FilterBar::new(&state.filter, state.view.rows.len(), state.store.len(), theme)
            .status(state.status.as_deref()),
        filter_area,
    );

    match state.active_tab {
        Tab::Overview => draw_overview(frame, state, body),
        Tab::Records => {
            let rows = state.visible_records();
            frame.render_widget(
                RecordsTable::new(&rows, &state.records, &state.none_marker, theme),
                body,
            );
        }
        Tab::Forecast => frame.render_widget(
            ForecastPanel::new(
                state.view.forecast_pest.as_deref(),
                state.filter.sector.as_deref(),
                state.view.forecast.as_ref(),
                theme,
            ),
            body,
        ),
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.mode == Mode::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
    }
}

fn draw_overview(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = &state.theme;
    let view = &state.view;

    let [cards, middle, bottom] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(3),
        Constraint::Fill(2),
    ])
    .areas(area);
    let [pests, pesticides] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(middle);
    let [classes, trend] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(2)]).areas(bottom);

    frame.render_widget(SummaryCards::new(&view.summary, &view.severities, theme), cards);
    frame.render_widget(RankedPanel::new("top pests", &view.top_pests, theme), pests);
    frame.render_widget(
        RankedPanel::new("top pesticides", &view.top_pesticides, theme),
        pesticides,
    );
    frame.render_widget(
        RankedPanel::new("pest classes", &view.classes, theme).colour_by_label(),
        classes,
    );
    frame.render_widget(WeeklyTrend::new(&view.weekly, theme), trend);
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
