//! Bike sharing dashboard core.
//!
//! Loads a pre-aggregated daily bike-sharing dataset, filters it by an
//! inclusive date range and derives the tables shown on the dashboard:
//! daily totals, working-day and weather counts, and an RFM table.

pub mod config;
pub mod data;

pub use config::{Args, ColumnNames, DashboardConfig};
pub use data::error::DashboardError;
pub use data::filter::{DateRange, filter_by_date};
pub use data::loader::load_file;
pub use data::model::{DayRecord, DayTable};
pub use data::report::Dashboard;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, DashboardError>;
