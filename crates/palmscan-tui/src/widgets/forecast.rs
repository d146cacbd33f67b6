//! Forecast tab — daily history of one pest and the projected days ahead.

use crate::theme::Theme;
use palmscan_core::Forecast;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph, Widget},
};

pub struct ForecastPanel<'a> {
    pest: Option<&'a str>,
    sector: Option<&'a str>,
    forecast: Option<&'a Forecast>,
    theme: &'a Theme,
}

impl<'a> ForecastPanel<'a> {
    pub fn new(
        pest: Option<&'a str>,
        sector: Option<&'a str>,
        forecast: Option<&'a Forecast>,
        theme: &'a Theme,
    ) -> Self {
        Self { pest, sector, forecast, theme }
    }
}

/// Chart coordinates: x is days since the first observation.
pub(crate) fn series(forecast: &Forecast) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let Some((origin, _)) = forecast.history.first() else {
        return (Vec::new(), Vec::new());
    };
    let x = |d: chrono::NaiveDate| (d - *origin).num_days() as f64;
    let history = forecast
        .history
        .iter()
        .map(|(d, c)| (x(*d), *c as f64))
        .collect();
    let projected = forecast.points.iter().map(|p| (x(p.date), p.yhat)).collect();
    (history, projected)
}

impl Widget for ForecastPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match (self.pest, self.sector) {
            (Some(p), Some(s)) => format!(" forecast: {p} in sector {s} "),
            (Some(p), None) => format!(" forecast: {p} "),
            (None, _) => " forecast ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(forecast) = self.forecast else {
            let msg = if self.pest.is_none() {
                "no pest to forecast: pick one with p / :pest"
            } else {
                "no dated records for this pest"
            };
            Paragraph::new(msg).render(inner, buf);
            return;
        };

        let [chart_area, table_area] =
            Layout::horizontal([Constraint::Fill(3), Constraint::Length(24)]).areas(inner);

        let (history, projected) = series(forecast);
        let x_max = projected
            .last()
            .or(history.last())
            .map(|(x, _)| *x)
            .unwrap_or(0.0)
            .max(1.0);
        let y_max = history
            .iter()
            .chain(&projected)
            .map(|(_, y)| *y)
            .fold(1.0f64, f64::max)
            .ceil();

        let first = forecast.history.first().map(|(d, _)| d.to_string()).unwrap_or_default();
        let last = forecast
            .points
            .last()
            .map(|p| p.date)
            .or(forecast.history.last().map(|(d, _)| *d))
            .map(|d| d.to_string())
            .unwrap_or_default();

        let datasets = vec![
            Dataset::default()
                .name("observed")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(self.theme.chart_history)
                .data(&history),
            Dataset::default()
                .name("forecast")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(self.theme.chart_forecast)
                .data(&projected),
        ];
        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels([first, last])
                    .style(Style::default().add_modifier(Modifier::DIM)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(["0".to_string(), format!("{y_max}")])
                    .style(Style::default().add_modifier(Modifier::DIM)),
            )
            .render(chart_area, buf);

        let mut lines = vec![Line::styled(
            format!("trend {:+.2}/day{}", forecast.slope, if forecast.seasonal { " +weekly" } else { "" }),
            Style::default().add_modifier(Modifier::DIM),
        )];
        lines.extend(forecast.points.iter().map(|p| {
            Line::styled(format!("{}  {:>6.1}", p.date, p.yhat), self.theme.chart_forecast)
        }));
        Paragraph::new(lines)
            .block(Block::bordered().title(" next days ").border_style(self.theme.border_unfocused))
            .render(table_area, buf);
    }
}
