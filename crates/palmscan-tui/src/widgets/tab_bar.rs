//! Tab bar widget — the strip of dashboard views at the top of the screen.

use crate::app::Tab;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the 1-line tab strip with keybinding hints right-aligned.
pub struct TabBar<'a> {
    active: Tab,
    source: &'a str,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(active: Tab, source: &'a str, theme: &'a Theme) -> Self {
        Self { active, source, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {}:{} ", i + 1, tab.title())))
            .collect();

        Tabs::new(labels)
            .select(self.active.index())
            .highlight_style(self.theme.filter_active)
            .divider("")
            .render(area, buf);

        let hint = format!(" {}  q:quit  ?:help ", self.source);
        let width = hint.chars().count() as u16;
        let hint_x = area.right().saturating_sub(width).max(area.x);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
