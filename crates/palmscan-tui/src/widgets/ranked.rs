//! Ranked-count panel: one row per label with a proportional bar.

use crate::theme::Theme;
use palmscan_core::stats::Ranked;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

const BAR: &str = "█";

pub struct RankedPanel<'a> {
    title: &'a str,
    items: &'a [Ranked],
    theme: &'a Theme,
    /// Colour each bar by its label through the class palette.
    by_label: bool,
}

impl<'a> RankedPanel<'a> {
    pub fn new(title: &'a str, items: &'a [Ranked], theme: &'a Theme) -> Self {
        Self { title, items, theme, by_label: false }
    }

    pub fn colour_by_label(mut self) -> Self {
        self.by_label = true;
        self
    }

    fn bar_style(&self, label: &str) -> Style {
        if self.by_label {
            self.theme.class_style(label)
        } else {
            self.theme.chart_bar
        }
    }
}

/// Length in cells of the bar for `count`, scaled so `max` fills `width`.
/// Non-zero counts always get at least one cell.
pub(crate) fn bar_len(count: usize, max: usize, width: usize) -> usize {
    if max == 0 || count == 0 || width == 0 {
        return 0;
    }
    (count * width / max).max(1)
}

impl Widget for RankedPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.items.is_empty() {
            Paragraph::new("no data").render(inner, buf);
            return;
        }

        let total_width = inner.width as usize;
        let label_width = self
            .items
            .iter()
            .map(|r| Span::raw(r.label.as_str()).width())
            .max()
            .unwrap_or(0)
            .min(total_width / 2);
        let max = self.items.iter().map(|r| r.count).max().unwrap_or(0);
        let count_width = max.to_string().len();
        let bar_width = total_width.saturating_sub(label_width + count_width + 2);

        let lines: Vec<Line> = self
            .items
            .iter()
            .take(inner.height as usize)
            .map(|r| {
                let pad = label_width.saturating_sub(Span::raw(r.label.as_str()).width());
                Line::from(vec![
                    Span::raw(format!("{}{} ", r.label, " ".repeat(pad))),
                    Span::styled(BAR.repeat(bar_len(r.count, max, bar_width)), self.bar_style(&r.label)),
                    Span::raw(format!(" {}", r.count)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
