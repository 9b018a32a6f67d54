use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can go wrong between opening a file and building a dashboard.
///
/// Load-time variants abort the whole load; nothing downstream of a
/// successful load returns an error except [`DashboardError::EmptyRange`].
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("row {row}: column '{column}' has invalid date '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: column '{column}' expects a non-negative integer, got '{value}'")]
    TypeInvariant {
        row: usize,
        column: String,
        value: String,
    },

    #[error("empty date range: start {start} is after end {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
