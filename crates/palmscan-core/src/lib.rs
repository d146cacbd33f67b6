//! palmscan-core — pest-inspection record normalizer and analysis layers.
//!
//! This crate owns everything that does not touch a terminal or a file
//! format: the record types, the data-driven rule table, the normalizer, the
//! in-memory store, filters, aggregations and the forecast.
//!
//! # Architecture
//!
//! ```text
//! Source rows ──► Normalizer ──► Store ──► Filter ──► Stats / Forecast
//!                    ▲
//!                RuleTable (TOML)
//! ```
//!
//! Normalization is a pure per-record transform; nothing in this crate holds
//! global state.

pub mod config;
pub mod error;
pub mod filter;
pub mod forecast;
pub mod normalizer;
pub mod rules;
pub mod schema;
pub mod stats;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::RulesError;
pub use filter::Filter;
pub use forecast::{Forecast, ForecastPoint};
pub use normalizer::Normalizer;
pub use rules::RuleTable;
pub use schema::{Column, Schema};
pub use store::InspectionStore;
pub use types::{
    CalendarFields, CleanRecord, InspectionRecord, PestCategory, Severity, PESTICIDE_SLOTS,
};
