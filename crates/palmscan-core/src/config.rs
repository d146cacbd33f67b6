//! Configuration types for palmscan.
//!
//! [`Config::load`] reads `$XDG_CONFIG_HOME/palmscan/config.toml`, creating
//! it with the built-in defaults if it does not yet exist. [`Config::load_from`]
//! reads an explicit file instead. Both layer `PALMSCAN_*` environment
//! variables on top (`PALMSCAN_DATA__INPUT`, `PALMSCAN_FORECAST__PERIODS`, ...).
//! [`Config::defaults`] returns the defaults without touching the filesystem
//! or the environment (useful in tests).

use crate::error::RulesError;
use crate::normalizer::Normalizer;
use crate::rules::RuleTable;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[data]
# input  = "inspections.csv"
# output = "inspections_clean.csv"
delimiter  = ","
export_bom = true

[normalizer]
# rules_file   = "~/.config/palmscan/rules.toml"
# date_formats = ["%d/%m/%Y", "%Y-%m-%d"]

[dashboard]
top_n = 10
theme = "default"

[forecast]
periods = 7
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

/// `[data]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Table read when no input path is given on the command line.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Where `palmscan clean` writes when no output path is given.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Prefix exported CSV files with a UTF-8 byte-order mark.
    #[serde(default = "default_export_bom")]
    pub export_bom: bool,
}

fn default_delimiter() -> String { ",".to_string() }
fn default_export_bom() -> bool { true }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            delimiter: default_delimiter(),
            export_bom: default_export_bom(),
        }
    }
}

impl DataConfig {
    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ if self.delimiter == "\\t" => Ok(b'\t'),
            _ => anyhow::bail!(
                "data.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }
}

/// `[normalizer]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizerConfig {
    /// Replacement rule table; the embedded table is used when unset.
    #[serde(default)]
    pub rules_file: Option<PathBuf>,
    /// Date formats tried in order; the built-in list is used when empty.
    #[serde(default)]
    pub date_formats: Vec<String>,
}

impl NormalizerConfig {
    /// Build the normalizer this section describes.
    pub fn build(&self) -> Result<Normalizer, RulesError> {
        let rules = match &self.rules_file {
            Some(path) => RuleTable::from_path(path)?,
            None => RuleTable::load_default(),
        };
        Ok(Normalizer::new(rules)?.with_date_formats(self.date_formats.clone()))
    }
}

/// `[dashboard]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Length of the ranked pest and pesticide panels.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_top_n() -> usize { 10 }
fn default_theme() -> String { "default".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            theme: default_theme(),
        }
    }
}

/// `[forecast]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Days predicted past the last observation.
    #[serde(default = "default_periods")]
    pub periods: usize,
}

fn default_periods() -> usize { 7 }

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { periods: default_periods() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `$XDG_CONFIG_HOME/palmscan/config.toml`, layered on top of
    /// the built-in defaults. Creates the file with defaults if it does not
    /// exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())
                .with_context(|| format!("writing default config to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        Self::layered(&path, false)
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Parse a config from TOML text layered over the defaults.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix("PALMSCAN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("reading config {}", path.display()))?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("palmscan")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.data.delimiter, ",");
        assert!(cfg.data.export_bom);
        assert!(cfg.data.input.is_none());
        assert!(cfg.normalizer.rules_file.is_none());
        assert!(cfg.normalizer.date_formats.is_empty());
        assert_eq!(cfg.dashboard.top_n, 10);
        assert_eq!(cfg.dashboard.theme, "default");
        assert_eq!(cfg.forecast.periods, 7);
    }

    #[test]
    fn user_values_override_defaults() {
        let cfg = Config::from_toml_str(
            "[forecast]\nperiods = 14\n[data]\ndelimiter = \";\"\n[normalizer]\ndate_formats = [\"%d/%m/%Y\"]\n",
        )
        .unwrap();
        assert_eq!(cfg.forecast.periods, 14);
        assert_eq!(cfg.data.delimiter_byte().unwrap(), b';');
        assert_eq!(cfg.dashboard.top_n, 10);
        assert_eq!(cfg.normalizer.date_formats, vec!["%d/%m/%Y".to_string()]);
    }

    #[test]
    fn delimiter_must_be_one_byte() {
        let mut data = DataConfig::default();
        assert_eq!(data.delimiter_byte().unwrap(), b',');
        data.delimiter = "\\t".to_string();
        assert_eq!(data.delimiter_byte().unwrap(), b'\t');
        data.delimiter = ";;".to_string();
        assert!(data.delimiter_byte().is_err());
    }

    #[test]
    fn default_normalizer_section_builds() {
        let n = Config::defaults().normalizer.build().unwrap();
        assert_eq!(n.none_marker(), "لا يوجد");
    }

    #[test]
    fn missing_rules_file_is_an_error() {
        let section = NormalizerConfig {
            rules_file: Some(PathBuf::from("/nonexistent/palmscan/rules.toml")),
            date_formats: vec![],
        };
        assert!(section.build().is_err());
    }
}
