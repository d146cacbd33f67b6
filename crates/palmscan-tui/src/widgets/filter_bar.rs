//! Filter bar — active filters, row counts and the last status message.

use crate::theme::Theme;
use palmscan_core::Filter;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

pub struct FilterBar<'a> {
    filter: &'a Filter,
    shown: usize,
    total: usize,
    status: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(filter: &'a Filter, shown: usize, total: usize, theme: &'a Theme) -> Self {
        Self { filter, shown, total, status: None, theme }
    }

    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    fn chip(&self, name: &'static str, value: Option<String>) -> Vec<Span<'static>> {
        let (text, style) = match value {
            Some(v) => (format!(" {name}: {v} "), self.theme.filter_active),
            None => (format!(" {name}: all "), self.theme.filter_inactive),
        };
        vec![Span::styled(text, style), Span::raw(" ")]
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" filters ")
            .border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        block.render(area, buf);

        let window = match (self.filter.from, self.filter.to) {
            (None, None) => None,
            (from, to) => Some(format!(
                "{} → {}",
                from.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
                to.map(|d| d.to_string()).unwrap_or_else(|| "…".into()),
            )),
        };

        let mut spans = Vec::new();
        spans.extend(self.chip("sector", self.filter.sector.clone()));
        spans.extend(self.chip("sub-area", self.filter.sub_area.clone()));
        spans.extend(self.chip("pest", self.filter.pest.clone()));
        spans.extend(self.chip("dates", window));
        spans.push(Span::styled(
            format!("{} / {} records", self.shown, self.total),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if let Some(status) = self.status {
            spans.push(Span::styled(
                format!("   {status}"),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
