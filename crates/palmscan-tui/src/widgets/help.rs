//! Help popup — centred floating overlay listing keybindings and commands.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit"),
    ("Tab / Shift+Tab", "Next / previous tab"),
    ("1  2  3", "Overview, records, forecast"),
    ("s  /  S", "Next / previous sector"),
    ("a  /  A", "Next / previous sub-area of the sector"),
    ("p  /  P", "Next / previous pest"),
    ("r", "Clear all filters"),
    ("↑ k  /  ↓ j", "Move the record cursor"),
    ("PageUp / Ctrl+u", "Page up"),
    ("PageDown / Ctrl+d", "Page down"),
    (":", "Open the command bar"),
    ("?", "Toggle this help popup"),
    ("", ""),
    (":sector [name|all]", "Filter by sector (all clears)"),
    (":sub [id|all]", "Filter by sub-area (all clears)"),
    (":pest [label|all]", "Filter by pest (all clears)"),
    (":from / :to [date|all]", "Date bounds, YYYY-MM-DD"),
    (":reset", "Clear all filters"),
    (":export <path>", "Write filtered rows as CSV"),
    (":forecast <days>", "Forecast horizon"),
    (":theme <name>", "default, gruvbox"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(72, BINDINGS.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" palmscan — keys (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<22}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
