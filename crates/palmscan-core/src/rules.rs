//! The normalisation vocabulary as data.
//!
//! A [`RuleTable`] is an ordered list of pest rules (match predicate →
//! canonical label), an ordered list of severity rules, the pesticide
//! "none" marker with its known misspellings, and the fallback policy for
//! descriptions no rule recognises.
//!
//! The default table is embedded from `rules/default.toml`. A user table in
//! the same format replaces it wholesale; tables are never merged, so rule
//! order is always exactly what the file says.

use crate::error::RulesError;
use crate::types::Severity;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_RULES_SRC: &str = include_str!("rules/default.toml");

/// Tag prepended to unrecognised descriptions in [`Fallback::Tagged`] mode
/// when the table does not name one.
pub const DEFAULT_TAG: &str = "unclassified: ";

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawFallback {
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default = "default_tag")]
    tag: String,
}

fn default_mode() -> String { "title_case".to_string() }
fn default_tag() -> String { DEFAULT_TAG.to_string() }

impl Default for RawFallback {
    fn default() -> Self {
        Self { mode: default_mode(), tag: default_tag() }
    }
}

#[derive(Debug, Deserialize)]
struct RawPesticides {
    none_marker: String,
    #[serde(default)]
    none_variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPestRule {
    label: String,
    #[serde(default)]
    terms: Vec<String>,
    #[serde(default)]
    qualifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSeverityRule {
    level: String,
    #[serde(default)]
    markers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawRuleTable {
    #[serde(default)]
    fallback: RawFallback,
    pesticides: RawPesticides,
    #[serde(default)]
    pest: Vec<RawPestRule>,
    #[serde(default)]
    severity: Vec<RawSeverityRule>,
}

// ---------------------------------------------------------------------------
// Public rule types
// ---------------------------------------------------------------------------

/// Case-fold text for substring matching.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// One pest classification rule.
///
/// Matches when the folded description contains any `term` and, if the
/// rule has qualifiers, any `qualifier` as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PestRule {
    label: String,
    folded_label: String,
    terms: Vec<String>,
    qualifiers: Vec<String>,
}

impl PestRule {
    pub fn new<T, Q>(label: impl Into<String>, terms: T, qualifiers: Q) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        let label = label.into();
        Self {
            folded_label: fold(label.trim()),
            label,
            terms: terms.into_iter().map(|t| fold(t.as_ref())).collect(),
            qualifiers: qualifiers.into_iter().map(|q| fold(q.as_ref())).collect(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `folded` must already be case-folded.
    pub fn matches(&self, folded: &str) -> bool {
        let has_term = self.terms.iter().any(|t| folded.contains(t.as_str()));
        has_term
            && (self.qualifiers.is_empty()
                || self.qualifiers.iter().any(|q| folded.contains(q.as_str())))
    }

    fn is_label(&self, folded: &str) -> bool {
        self.folded_label == folded
    }
}

/// One severity rule: any marker present → `level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityRule {
    level: Severity,
    markers: Vec<String>,
}

impl SeverityRule {
    pub fn new<M>(level: Severity, markers: M) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Self {
            level,
            markers: markers.into_iter().map(|m| fold(m.as_ref())).collect(),
        }
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    /// `folded` must already be case-folded.
    pub fn matches(&self, folded: &str) -> bool {
        self.markers.iter().any(|m| folded.contains(m.as_str()))
    }
}

/// What to return for a description no pest rule recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Title-case the folded text.
    TitleCase,
    /// Prefix the trimmed original text with the given tag.
    Tagged(String),
}

/// The full normalisation vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    pests: Vec<PestRule>,
    severities: Vec<SeverityRule>,
    none_marker: String,
    none_variants: Vec<String>,
    fallback: Fallback,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::load_default()
    }
}

impl RuleTable {
    /// Assemble a table directly. Used by tests and by callers that build
    /// their vocabulary programmatically.
    pub fn new(
        pests: Vec<PestRule>,
        severities: Vec<SeverityRule>,
        none_marker: impl Into<String>,
        none_variants: Vec<String>,
        fallback: Fallback,
    ) -> Result<Self, RulesError> {
        let none_marker = none_marker.into();
        if none_marker.trim().is_empty() {
            return Err(RulesError::EmptyNoneMarker);
        }
        Ok(Self {
            pests,
            severities,
            none_marker,
            none_variants: none_variants.into_iter().filter(|v| !v.is_empty()).collect(),
            fallback,
        })
    }

    /// Load and parse the embedded default table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which the unit tests rule out.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_RULES_SRC).expect("embedded default rule table must be valid")
    }

    /// Parse a rule table from a TOML string.
    pub fn from_toml_str(src: &str) -> Result<Self, RulesError> {
        let raw: RawRuleTable = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Self::from_raw(raw)
    }

    /// Read a rule table from a TOML file on disk.
    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let raw: RawRuleTable = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), "rule table loaded");
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawRuleTable) -> Result<Self, RulesError> {
        let mut pests = Vec::with_capacity(raw.pest.len());
        for (index, rule) in raw.pest.into_iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(RulesError::EmptyLabel { index });
            }
            if rule.terms.iter().all(|t| t.is_empty()) {
                return Err(RulesError::NoTerms { label: rule.label });
            }
            let terms = rule.terms.into_iter().filter(|t| !t.is_empty());
            let qualifiers = rule.qualifiers.into_iter().filter(|q| !q.is_empty());
            pests.push(PestRule::new(rule.label, terms, qualifiers));
        }

        let mut severities = Vec::with_capacity(raw.severity.len());
        for (index, rule) in raw.severity.into_iter().enumerate() {
            let level = parse_severity(&rule.level)
                .ok_or_else(|| RulesError::UnknownSeverity { index, level: rule.level.clone() })?;
            if rule.markers.iter().all(|m| m.is_empty()) {
                return Err(RulesError::NoMarkers { level: rule.level });
            }
            let markers = rule.markers.into_iter().filter(|m| !m.is_empty());
            severities.push(SeverityRule::new(level, markers));
        }

        let fallback = match raw.fallback.mode.as_str() {
            "title_case" => Fallback::TitleCase,
            "tagged" => Fallback::Tagged(raw.fallback.tag),
            other => return Err(RulesError::UnknownFallback(other.to_string())),
        };

        Self::new(
            pests,
            severities,
            raw.pesticides.none_marker,
            raw.pesticides.none_variants,
            fallback,
        )
    }

    /// Return a copy of this table with a different fallback policy.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn pests(&self) -> &[PestRule] {
        &self.pests
    }

    pub fn severities(&self) -> &[SeverityRule] {
        &self.severities
    }

    pub fn none_marker(&self) -> &str {
        &self.none_marker
    }

    pub fn none_variants(&self) -> &[String] {
        &self.none_variants
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    /// First pest rule whose label equals `folded`, or failing that, the
    /// first rule whose predicate matches it.
    pub fn classify_pest(&self, folded: &str) -> Option<&PestRule> {
        self.pests
            .iter()
            .find(|r| r.is_label(folded))
            .or_else(|| self.pests.iter().find(|r| r.matches(folded)))
    }

    /// First severity rule matching `folded`.
    pub fn classify_severity(&self, folded: &str) -> Option<Severity> {
        self.severities.iter().find(|r| r.matches(folded)).map(|r| r.level)
    }
}

fn parse_severity(level: &str) -> Option<Severity> {
    match level.trim().to_ascii_lowercase().as_str() {
        "severe" => Some(Severity::Severe),
        "moderate" => Some(Severity::Moderate),
        "mild" => Some(Severity::Mild),
        "unspecified" => Some(Severity::Unspecified),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
