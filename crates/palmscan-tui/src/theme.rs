//! Colour theme for the palmscan dashboard.
//!
//! Themes are TOML files embedded in the binary via [`include_str!`], so the
//! dashboard works without any files on disk. [`Theme::by_name`] resolves the
//! `dashboard.theme` config value and the `:theme` command.
//!
//! # Colour assignment for pest classes
//!
//! Class labels are hashed to a stable index into the palette so the same
//! class always gets the same colour, whatever order the classes rank in.

use config::{Config, File, FileFormat};
use palmscan_core::Severity;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

/// Names accepted by [`Theme::by_name`].
pub const THEME_NAMES: &[&str] = &["default", "gruvbox"];

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        for (on, modifier) in [
            (self.bold, Modifier::BOLD),
            (self.dim, Modifier::DIM),
            (self.italic, Modifier::ITALIC),
            (self.underlined, Modifier::UNDERLINED),
        ] {
            if on {
                style = style.add_modifier(modifier);
            }
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawSeverity {
    severe: RawStyle,
    moderate: RawStyle,
    mild: RawStyle,
    unspecified: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    unfocused: RawStyle,
    command_bar: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawCharts {
    bar: RawStyle,
    trend: RawStyle,
    history: RawStyle,
    forecast: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    header: RawStyle,
    selected: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawFilters {
    active: RawStyle,
    inactive: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawClasses {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    severity: RawSeverity,
    borders: RawBorders,
    charts: RawCharts,
    table: RawTable,
    filters: RawFilters,
    classes: RawClasses,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Dashboard colour theme. All styles are resolved at load time.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub severity_severe: Style,
    pub severity_moderate: Style,
    pub severity_mild: Style,
    pub severity_unspecified: Style,

    pub border_focused: Style,
    pub border_unfocused: Style,
    pub border_command_bar: Style,

    pub chart_bar: Style,
    pub chart_trend: Style,
    pub chart_history: Style,
    pub chart_forecast: Style,

    pub table_header: Style,
    pub table_selected: Style,

    pub filter_active: Style,
    pub filter_inactive: Style,

    class_palette: Vec<Color>,
}

impl Theme {
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which the unit tests rule out.
    pub fn load_default() -> Self {
        Self::from_toml_str("default", DEFAULT_THEME_SRC)
            .expect("embedded default theme must be valid TOML")
    }

    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str("gruvbox", GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a theme name. Unknown names yield `None`.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::load_default()),
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Some(Self::load_gruvbox_dark()),
            _ => None,
        }
    }

    /// Parse a theme from a TOML string. Unknown keys are ignored.
    pub fn from_toml_str(name: &str, src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            name: name.to_string(),
            severity_severe: raw.severity.severe.into_style(),
            severity_moderate: raw.severity.moderate.into_style(),
            severity_mild: raw.severity.mild.into_style(),
            severity_unspecified: raw.severity.unspecified.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            chart_bar: raw.charts.bar.into_style(),
            chart_trend: raw.charts.trend.into_style(),
            chart_history: raw.charts.history.into_style(),
            chart_forecast: raw.charts.forecast.into_style(),
            table_header: raw.table.header.into_style(),
            table_selected: raw.table.selected.into_style(),
            filter_active: raw.filters.active.into_style(),
            filter_inactive: raw.filters.inactive.into_style(),
            class_palette: raw
                .classes
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
        })
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Severe => self.severity_severe,
            Severity::Moderate => self.severity_moderate,
            Severity::Mild => self.severity_mild,
            Severity::Unspecified => self.severity_unspecified,
        }
    }

    /// Stable colour for a pest-class label.
    pub fn class_style(&self, class: &str) -> Style {
        if self.class_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(class) % self.class_palette.len();
        Style::default().fg(self.class_palette[idx])
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2-style hash, stable across Rust versions and process restarts.
fn stable_hash(s: &str) -> usize {
    s.bytes()
        .fold(5381usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
}

/// Parse a colour name into a ratatui [`Color`].
///
/// Accepts named terminal colours (case-insensitive), `#rrggbb` and
/// `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "darkgray" | "dark_grey" | "darkgrey" => Some(Color::DarkGray),
        "light_red" => Some(Color::LightRed),
        "light_green" => Some(Color::LightGreen),
        "light_yellow" => Some(Color::LightYellow),
        "light_blue" => Some(Color::LightBlue),
        "light_magenta" => Some(Color::LightMagenta),
        "light_cyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::Indexed(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_themes_load() {
        for theme in [Theme::load_default(), Theme::load_gruvbox_dark()] {
            assert_ne!(theme.severity_severe, Style::default());
            assert_ne!(theme.border_focused, Style::default());
            assert_ne!(theme.chart_forecast, Style::default());
            assert_eq!(theme.class_palette.len(), 6);
        }
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in THEME_NAMES {
            assert!(Theme::by_name(name).is_some(), "{name} should resolve");
        }
        assert_eq!(Theme::by_name("Gruvbox-Dark").unwrap().name, "gruvbox");
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn severities_have_distinct_styles() {
        let theme = Theme::load_default();
        let styles: std::collections::HashSet<_> =
            Severity::ALL.iter().map(|s| theme.severity_style(*s)).collect();
        assert_eq!(styles.len(), 4);
    }

    #[test]
    fn class_style_is_stable() {
        let theme = Theme::load_default();
        assert_eq!(theme.class_style("حشرات"), theme.class_style("حشرات"));
    }

    #[test]
    fn parse_hex_and_indexed_colors() {
        assert_eq!(parse_color("#ff0080"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(parse_color("indexed:42"), Some(Color::Indexed(42)));
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn malformed_theme_is_an_error() {
        assert!(Theme::from_toml_str("broken", "[severity]\nsevere = 3\n").is_err());
    }
}
