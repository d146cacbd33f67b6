//! Records table — the scrollable list of filtered, cleaned records.
//!
//! # Navigation
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Cursor up one row (scrolls the view if needed) |
//! | `↓` / `j` | Cursor down one row |
//! | `PageUp` / `Ctrl+u` | Up one page |
//! | `PageDown` / `Ctrl+d` | Down one page |
//!
//! `offset` is the index of the first visible row; `cursor` is an absolute
//! row index kept inside the visible window.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use palmscan_core::CleanRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{
        Block, Cell as TableCell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Table, Widget,
    },
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RecordsTableState {
    pub cursor: usize,
    pub offset: usize,
    /// Data rows visible at the last render, so `handle()` can page.
    last_height: Cell<usize>,
}

impl Default for RecordsTableState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            last_height: Cell::new(20),
        }
    }
}

impl RecordsTableState {
    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    /// Back to the first row, e.g. after the filter changed.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn handle(&mut self, event: &AppEvent, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        let last = total - 1;
        let page = self.height();

        self.cursor = match event {
            AppEvent::Nav(Direction::Up) => self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => (self.cursor + 1).min(last),
            AppEvent::ScrollUp => self.cursor.saturating_sub(page),
            AppEvent::ScrollDown => (self.cursor + page).min(last),
            _ => return,
        };

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
        tracing::trace!(cursor = self.cursor, offset = self.offset, "records: moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

const HEADERS: [&str; 7] = ["date", "sector", "sub-area", "pest", "severity", "pesticides", "notes"];

pub struct RecordsTable<'a> {
    records: &'a [&'a CleanRecord],
    state: &'a RecordsTableState,
    none_marker: &'a str,
    theme: &'a Theme,
}

impl<'a> RecordsTable<'a> {
    pub fn new(
        records: &'a [&'a CleanRecord],
        state: &'a RecordsTableState,
        none_marker: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self { records, state, none_marker, theme }
    }
}

impl Widget for RecordsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" records ({}) ", self.records.len()))
            .border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        // One row for the header.
        let height = (inner.height as usize).saturating_sub(1);
        self.state.last_height.set(height);

        let total = self.records.len();
        let start = self.state.offset.min(total);
        let end = (start + height).min(total);

        let rows: Vec<Row> = self.records[start..end]
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let row = Row::new(record_cells(r, self.none_marker, self.theme));
                if start + i == self.state.cursor {
                    row.style(self.theme.table_selected)
                } else {
                    row
                }
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(11),
            Constraint::Fill(2),
            Constraint::Fill(3),
        ];
        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        Widget::render(
            Table::new(rows, widths)
                .header(Row::new(HEADERS).style(self.theme.table_header))
                .column_spacing(1),
            text_area,
            buf,
        );

        if total > 0 {
            let sb_area = Rect {
                x: inner.right().saturating_sub(1),
                width: 1,
                ..inner
            };
            let mut sb_state = ScrollbarState::new(total)
                .position(start)
                .viewport_content_length(height);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                sb_area,
                buf,
                &mut sb_state,
            );
        }
    }
}

fn record_cells(r: &CleanRecord, none_marker: &str, theme: &Theme) -> Vec<TableCell<'static>> {
    let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
    let pesticides = r
        .pesticides
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && *p != none_marker)
        .collect::<Vec<_>>()
        .join(", ");
    let pest_style = if r.canonical_pest.is_known() {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::ITALIC)
    };

    vec![
        TableCell::from(r.inspection_date.map(|d| d.to_string()).unwrap_or_else(|| "—".into())),
        TableCell::from(text(&r.sector)),
        TableCell::from(text(&r.sub_area)),
        TableCell::from(Span::styled(r.canonical_pest.as_str().to_string(), pest_style)),
        TableCell::from(Span::styled(r.severity.as_str(), theme.severity_style(r.severity))),
        TableCell::from(pesticides),
        TableCell::from(text(&r.notes)),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn state(height: usize) -> RecordsTableState {
        let s = RecordsTableState::default();
        s.last_height.set(height);
        s
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut s = state(5);
        s.handle(&AppEvent::Nav(Direction::Up), 3);
        assert_eq!(s.cursor, 0);
        for _ in 0..10 {
            s.handle(&AppEvent::Nav(Direction::Down), 3);
        }
        assert_eq!(s.cursor, 2);
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn moving_past_the_window_scrolls() {
        let mut s = state(5);
        for _ in 0..7 {
            s.handle(&AppEvent::Nav(Direction::Down), 100);
        }
        assert_eq!(s.cursor, 7);
        assert_eq!(s.offset, 3);
        s.handle(&AppEvent::ScrollUp, 100);
        assert_eq!(s.cursor, 2);
        assert_eq!(s.offset, 2);
    }

    #[test]
    fn paging_clamps_at_the_end() {
        let mut s = state(10);
        s.handle(&AppEvent::ScrollDown, 15);
        s.handle(&AppEvent::ScrollDown, 15);
        assert_eq!(s.cursor, 14);
        assert_eq!(s.offset, 5);
    }

    #[test]
    fn empty_table_resets() {
        let mut s = state(10);
        s.cursor = 4;
        s.offset = 2;
        s.handle(&AppEvent::Nav(Direction::Down), 0);
        assert_eq!((s.cursor, s.offset), (0, 0));
    }
}
