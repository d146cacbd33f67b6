//! Errors raised while loading the rule table.
//!
//! Normalisation itself never fails; only the vocabulary it is built from
//! can be invalid.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("failed to read rule table: {0}")]
    Load(#[from] config::ConfigError),
    #[error("pest rule #{index} has an empty label")]
    EmptyLabel { index: usize },
    #[error("pest rule {label:?} has no match terms")]
    NoTerms { label: String },
    #[error("severity rule #{index} has an unknown level {level:?} (expected severe, moderate, mild or unspecified)")]
    UnknownSeverity { index: usize, level: String },
    #[error("severity rule {level:?} has no markers")]
    NoMarkers { level: String },
    #[error("unknown fallback mode {0:?} (expected title_case or tagged)")]
    UnknownFallback(String),
    #[error("pesticide none marker must not be empty")]
    EmptyNoneMarker,
    #[error("invalid pesticide none variant pattern: {0}")]
    Pattern(#[from] regex::Error),
}
