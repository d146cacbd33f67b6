//! Headline metrics: record count, distinct pests, sectors and sub-areas,
//! and the severity breakdown.

use crate::theme::Theme;
use palmscan_core::stats::Summary;
use palmscan_core::Severity;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

pub struct SummaryCards<'a> {
    summary: &'a Summary,
    severities: &'a [(Severity, usize)],
    theme: &'a Theme,
}

impl<'a> SummaryCards<'a> {
    pub fn new(summary: &'a Summary, severities: &'a [(Severity, usize)], theme: &'a Theme) -> Self {
        Self { summary, severities, theme }
    }
}

impl Widget for SummaryCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(2),
        ])
        .split(area);

        let cards = [
            ("records", self.summary.records),
            ("pests", self.summary.unique_pests),
            ("sectors", self.summary.sectors),
            ("sub-areas", self.summary.sub_areas),
        ];
        for ((title, value), col) in cards.into_iter().zip(cols.iter()) {
            Paragraph::new(Line::from(Span::styled(
                value.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .centered()
            .block(
                Block::bordered()
                    .title(format!(" {title} "))
                    .border_style(self.theme.border_unfocused),
            )
            .render(*col, buf);
        }

        let spans: Vec<Span> = self
            .severities
            .iter()
            .flat_map(|(severity, count)| {
                [
                    Span::styled(format!("{severity} {count}"), self.theme.severity_style(*severity)),
                    Span::raw("  "),
                ]
            })
            .collect();
        Paragraph::new(Line::from(spans))
            .block(
                Block::bordered()
                    .title(" severity ")
                    .border_style(self.theme.border_unfocused),
            )
            .render(cols[4], buf);
    }
}
