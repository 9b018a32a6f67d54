//! Runtime configuration: column mapping, data location and display settings.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;

use crate::data::error::DashboardError;

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Names of the source columns. Defaults match the daily bike-sharing file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub index: String,
    pub date: String,
    pub working_day: String,
    pub weather: String,
    pub casual: String,
    pub registered: String,
    pub total: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            index: "instant".to_string(),
            date: "dteday".to_string(),
            working_day: "workingday".to_string(),
            weather: "weathersit".to_string(),
            casual: "casual".to_string(),
            registered: "registered".to_string(),
            total: "cnt".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub data_path: PathBuf,
    pub columns: ColumnNames,
    /// Prefix used when formatting the average monetary value.
    pub currency_symbol: String,
    /// Number of entries in each RFM ranking chart.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("day_data.csv"),
            columns: ColumnNames::default(),
            currency_symbol: "AU$".to_string(),
            top_n: 5,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, DashboardError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Resolve the effective configuration from command-line arguments.
    pub fn from_args(args: &Args) -> Result<Self, DashboardError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(path) = &args.data {
            config.data_path = path.clone();
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Interactive bike sharing dashboard
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset to open (.csv, .json or .parquet); overrides the config file
    pub data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial start of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Initial end of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "currency_symbol": "$", "columns": {{ "total": "count" }} }}"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.columns.total, "count");
        assert_eq!(config.columns.date, "dteday");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.data_path, PathBuf::from("day_data.csv"));
    }

    #[test]
    fn data_argument_overrides_config() {
        let args = Args::parse_from(["bikeshare-dashboard", "other.csv", "--start", "2011-02-01"]);
        assert_eq!(args.start, Some(NaiveDate::from_ymd_opt(2011, 2, 1).unwrap()));

        let config = DashboardConfig::from_args(&args).unwrap();
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(DashboardError::Json(_))
        ));
    }
}
