use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DashboardError;
use super::model::{DayRecord, DayTable};
use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a daily dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "instant": 1, "dteday": "2011-01-01", ... }, ...]`
/// * `.parquet` – one column per field (integers, strings or Date32)
///
/// The returned table is sorted by date with rows re-indexed `0..N-1`.
/// Any malformed cell aborts the load, as does a count column whose sum
/// over the file does not fit in a `u64`.
pub fn load_file(path: &Path, columns: &ColumnNames) -> Result<DayTable, DashboardError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(path, columns)?,
        "json" => read_json(path, columns)?,
        "parquet" | "pq" => read_parquet(path, columns)?,
        other => return Err(DashboardError::UnsupportedFormat(other.to_string())),
    };

    let table = build_table(raw, columns)?;
    info!("Loaded {} daily records from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Raw text cells shared by every format
// ---------------------------------------------------------------------------

/// One source row before typing, in [`ColumnNames`] field order.
#[derive(Debug)]
struct RawRow {
    index: String,
    date: String,
    working_day: String,
    weather: String,
    casual: String,
    registered: String,
    total: String,
}

fn column_list(columns: &ColumnNames) -> [&str; 7] {
    [
        columns.index.as_str(),
        columns.date.as_str(),
        columns.working_day.as_str(),
        columns.weather.as_str(),
        columns.casual.as_str(),
        columns.registered.as_str(),
        columns.total.as_str(),
    ]
}

impl RawRow {
    fn from_cells(cells: [String; 7]) -> Self {
        let [index, date, working_day, weather, casual, registered, total] = cells;
        RawRow {
            index,
            date,
            working_day,
            weather,
            casual,
            registered,
            total,
        }
    }
}

/// Type every raw row and sort the result.
fn build_table(raw: Vec<RawRow>, columns: &ColumnNames) -> Result<DayTable, DashboardError> {
    let mut records = Vec::with_capacity(raw.len());
    let mut inconsistent = 0usize;
    // Running column sums; every aggregate is bounded by these.
    let mut sums = [0u64; 3];

    for (row, cells) in raw.iter().enumerate() {
        let record = DayRecord {
            row,
            index: parse_code(&cells.index)
                .ok_or_else(|| type_error(row, &columns.index, &cells.index))?,
            date: parse_date(&cells.date).ok_or_else(|| DashboardError::Parse {
                row,
                column: columns.date.clone(),
                value: cells.date.clone(),
            })?,
            working_day: parse_code(&cells.working_day)
                .ok_or_else(|| type_error(row, &columns.working_day, &cells.working_day))?,
            weather: parse_code(&cells.weather)
                .ok_or_else(|| type_error(row, &columns.weather, &cells.weather))?,
            casual: parse_count(&cells.casual)
                .ok_or_else(|| type_error(row, &columns.casual, &cells.casual))?,
            registered: parse_count(&cells.registered)
                .ok_or_else(|| type_error(row, &columns.registered, &cells.registered))?,
            total: parse_count(&cells.total)
                .ok_or_else(|| type_error(row, &columns.total, &cells.total))?,
        };

        let counts = [
            (record.casual, &columns.casual, &cells.casual),
            (record.registered, &columns.registered, &cells.registered),
            (record.total, &columns.total, &cells.total),
        ];
        for (sum, (value, column, text)) in sums.iter_mut().zip(counts) {
            *sum = sum
                .checked_add(value)
                .ok_or_else(|| type_error(row, column, text))?;
        }

        if !record.is_consistent() {
            inconsistent += 1;
            warn!(
                "Row {row} ({}): {} = {} but {} + {} = {} + {}",
                record.date,
                columns.total,
                record.total,
                columns.casual,
                columns.registered,
                record.casual,
                record.registered
            );
        }
        records.push(record);
    }

    if inconsistent > 0 {
        warn!("{inconsistent} rows break total = casual + registered");
    }

    Ok(DayTable::from_records(records))
}

fn type_error(row: usize, column: &str, value: &str) -> DashboardError {
    DashboardError::TypeInvariant {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a calendar date. Datetime text keeps only its date part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Parse a non-negative count. Integral floats such as `"12.0"` are accepted.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Parse an integer code (row identifier or category). Booleans map to 0/1.
pub fn parse_code(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    match s.to_ascii_lowercase().as_str() {
        "true" => return Some(1),
        "false" => return Some(0),
        _ => {}
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns are ignored.
fn read_csv(path: &Path, columns: &ColumnNames) -> Result<Vec<RawRow>, DashboardError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut positions = [0usize; 7];
    for (slot, name) in positions.iter_mut().zip(column_list(columns)) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))?;
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells = positions.map(|idx| record.get(idx).unwrap_or("").to_string());
        rows.push(RawRow::from_cells(cells));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "instant": 1, "dteday": "2011-01-01", "workingday": 0, "weathersit": 2,
///     "casual": 331, "registered": 654, "cnt": 985 },
///   ...
/// ]
/// ```
fn read_json(path: &Path, columns: &ColumnNames) -> Result<Vec<RawRow>, DashboardError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DashboardError::InvalidData("expected a top-level JSON array".into()))?;

    let names = column_list(columns);
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DashboardError::InvalidData(format!("row {i} is not a JSON object")))?;

        let mut cells: [String; 7] = Default::default();
        for (cell, name) in cells.iter_mut().zip(names) {
            let value = obj
                .get(name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))?;
            *cell = json_to_text(value);
        }
        rows.push(RawRow::from_cells(cells));
    }

    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas or Polars. Columns are located by
/// name in every record batch and rendered to text before typing, so Date32,
/// timestamp, integer and string columns are all accepted.
fn read_parquet(path: &Path, columns: &ColumnNames) -> Result<Vec<RawRow>, DashboardError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    // Checked against the file schema so an empty file with the wrong
    // columns still fails.
    let schema = builder.schema().clone();
    let mut positions = [0usize; 7];
    for (slot, name) in positions.iter_mut().zip(column_list(columns)) {
        *slot = schema
            .index_of(name)
            .map_err(|_| DashboardError::MissingColumn(name.to_string()))?;
    }

    let reader = builder.build()?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        for row in 0..batch.num_rows() {
            let mut cells: [String; 7] = Default::default();
            for (cell, &idx) in cells.iter_mut().zip(&positions) {
                let col = batch.column(idx);
                if !col.is_null(row) {
                    *cell = array_value_to_string(col, row)?;
                }
            }
            rows.push(RawRow::from_cells(cells));
        }
    }

    Ok(rows)
}
