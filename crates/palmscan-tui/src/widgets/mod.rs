//! Ratatui widgets for the palmscan dashboard.

pub mod command_bar;
pub mod filter_bar;
pub mod forecast;
pub mod help;
pub mod ranked;
pub mod records_table;
pub mod summary;
pub mod tab_bar;
pub mod trend;
