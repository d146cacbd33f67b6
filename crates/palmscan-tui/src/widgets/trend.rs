//! Weekly inspection trend as a sparkline.

use crate::theme::Theme;
use palmscan_core::stats::WeeklyCount;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph, Sparkline, Widget},
};

pub struct WeeklyTrend<'a> {
    weeks: &'a [WeeklyCount],
    theme: &'a Theme,
}

impl<'a> WeeklyTrend<'a> {
    pub fn new(weeks: &'a [WeeklyCount], theme: &'a Theme) -> Self {
        Self { weeks, theme }
    }
}

impl Widget for WeeklyTrend<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" inspections per week ")
            .border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        block.render(area, buf);

        let (Some(first), Some(last)) = (self.weeks.first(), self.weeks.last()) else {
            Paragraph::new("no dated records").render(inner, buf);
            return;
        };

        let [chart, axis] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        // Most recent weeks win when there are more weeks than columns.
        let skip = self.weeks.len().saturating_sub(chart.width as usize);
        let data: Vec<u64> = self.weeks[skip..].iter().map(|w| w.count as u64).collect();
        Sparkline::default()
            .data(data)
            .style(self.theme.chart_trend)
            .render(chart, buf);

        let peak = self.weeks.iter().map(|w| w.count).max().unwrap_or(0);
        let start = self.weeks[skip].week_start;
        let label = format!(
            "{} … {}   peak {peak}/week   {} weeks since {}",
            start, last.week_start, self.weeks.len(), first.week_start
        );
        Paragraph::new(Line::styled(label, Style::default().add_modifier(Modifier::DIM)))
            .render(axis, buf);
    }
}
