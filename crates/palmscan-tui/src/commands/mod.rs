// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme};
use chrono::NaiveDate;
use std::path::PathBuf;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Theme(String),
    /// Restrict to a sector; `None` clears the restriction.
    Sector(Option<String>),
    /// Restrict to a sub-area; `None` clears the restriction.
    SubArea(Option<String>),
    /// Restrict to a canonical pest; `None` clears the restriction.
    Pest(Option<String>),
    From(Option<NaiveDate>),
    To(Option<NaiveDate>),
    Reset,
    /// Write the filtered records to a CSV file.
    Export(PathBuf),
    /// Change the forecast horizon in days.
    Forecast(usize),
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// An empty string returns `Err("")` as a sentinel meaning "close
    /// without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));
        let arg = (!rest.is_empty()).then(|| rest.to_string());
        // `all` clears a filter criterion.
        let criterion = arg.clone().filter(|a| !a.eq_ignore_ascii_case("all"));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "theme" => arg
                .map(Command::Theme)
                .ok_or_else(|| "usage: theme <default|gruvbox>".to_string()),
            "sector" => Ok(Command::Sector(criterion)),
            "sub" | "subarea" => Ok(Command::SubArea(criterion)),
            "pest" => Ok(Command::Pest(criterion)),
            "from" => parse_date_arg(rest).map(Command::From),
            "to" => parse_date_arg(rest).map(Command::To),
            "reset" => Ok(Command::Reset),
            "export" | "w" => arg
                .map(|p| Command::Export(PathBuf::from(p)))
                .ok_or_else(|| "usage: export <path.csv>".to_string()),
            "forecast" => match rest.parse::<usize>() {
                Ok(n) if (1..=365).contains(&n) => Ok(Command::Forecast(n)),
                Ok(_) => Err("forecast periods must be 1–365".to_string()),
                Err(_) => Err("usage: forecast <days>".to_string()),
            },
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn parse_date_arg(rest: &str) -> Result<Option<NaiveDate>, String> {
    if rest.is_empty() || rest.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(rest, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("expected YYYY-MM-DD, got {rest}"))
}

/// Execute a parsed [`Command`] against the application state. Returns a
/// status message for the filter bar, if the command produced one.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Option<String> {
    match cmd {
        Command::Quit => {
            s.quit = true;
            None
        }
        Command::Help => {
            s.show_help = !s.show_help;
            None
        }
        Command::Theme(name) => match Theme::by_name(&name) {
            Some(theme) => {
                s.theme = theme;
                None
            }
            None => Some(format!("unknown theme: {name}")),
        },
        Command::Sector(sector) => {
            s.set_sector(sector);
            None
        }
        Command::SubArea(sub_area) => {
            s.set_sub_area(sub_area);
            None
        }
        Command::Pest(pest) => {
            s.set_pest(pest);
            None
        }
        Command::From(date) => {
            s.filter.from = date;
            s.refresh();
            None
        }
        Command::To(date) => {
            s.filter.to = date;
            s.refresh();
            None
        }
        Command::Reset => {
            s.reset_filters();
            None
        }
        Command::Export(path) => Some(match s.export(&path) {
            Ok(rows) => format!("exported {rows} rows to {}", path.display()),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "export failed");
                format!("export failed: {e}")
            }
        }),
        Command::Forecast(periods) => {
            s.forecast_periods = periods;
            s.refresh();
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_and_help() {
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse("  quit  "), Ok(Command::Quit));
        assert_eq!(Command::parse("help"), Ok(Command::Help));
    }

    #[test]
    fn parse_theme() {
        assert_eq!(
            Command::parse("theme gruvbox"),
            Ok(Command::Theme("gruvbox".to_string()))
        );
        assert!(Command::parse("theme").is_err());
    }

    #[test]
    fn parse_filters_with_and_without_argument() {
        assert_eq!(
            Command::parse("sector 28"),
            Ok(Command::Sector(Some("28".to_string())))
        );
        assert_eq!(Command::parse("sector"), Ok(Command::Sector(None)));
        assert_eq!(
            Command::parse("pest سوسة النخيل الحمراء"),
            Ok(Command::Pest(Some("سوسة النخيل الحمراء".to_string())))
        );
        assert_eq!(Command::parse("pest"), Ok(Command::Pest(None)));
        assert_eq!(Command::parse("sector all"), Ok(Command::Sector(None)));
        assert_eq!(Command::parse("pest ALL"), Ok(Command::Pest(None)));
        assert_eq!(
            Command::parse("sub ج"),
            Ok(Command::SubArea(Some("ج".to_string())))
        );
        assert_eq!(Command::parse("subarea all"), Ok(Command::SubArea(None)));
    }

    #[test]
    fn parse_dates() {
        assert_eq!(
            Command::parse("from 2024-01-31"),
            Ok(Command::From(NaiveDate::from_ymd_opt(2024, 1, 31)))
        );
        assert_eq!(Command::parse("to"), Ok(Command::To(None)));
        assert_eq!(Command::parse("from all"), Ok(Command::From(None)));
        assert!(Command::parse("from 31/01/2024").is_err());
    }

    #[test]
    fn parse_export_and_forecast() {
        assert_eq!(
            Command::parse("export out.csv"),
            Ok(Command::Export(PathBuf::from("out.csv")))
        );
        assert!(Command::parse("export").is_err());
        assert_eq!(Command::parse("forecast 14"), Ok(Command::Forecast(14)));
        assert!(Command::parse("forecast 0").is_err());
        assert!(Command::parse("forecast soon").is_err());
    }

    #[test]
    fn parse_empty_returns_sentinel_err() {
        assert_eq!(Command::parse(""), Err(String::new()));
        assert_eq!(Command::parse("  "), Err(String::new()));
    }

    #[test]
    fn parse_unknown() {
        let err = Command::parse("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
    }
}
