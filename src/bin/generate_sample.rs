use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate, Weekday};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row, named after the columns of the daily bike-sharing file.
#[derive(Debug, Serialize)]
struct DayRow {
    instant: i64,
    dteday: NaiveDate,
    workingday: i64,
    weathersit: i64,
    casual: i64,
    registered: i64,
    cnt: i64,
}

fn weather_code(rng: &mut SimpleRng) -> i64 {
    match rng.next_f64() {
        p if p < 0.63 => 1,
        p if p < 0.96 => 2,
        p if p < 0.995 => 3,
        _ => 4,
    }
}

fn generate_rows(first: NaiveDate, days: u64, rng: &mut SimpleRng) -> Vec<DayRow> {
    first
        .iter_days()
        .take(days as usize)
        .enumerate()
        .map(|(i, date)| {
            let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            let holiday = !weekend && rng.next_f64() < 0.03;
            let workingday = i64::from(!weekend && !holiday);
            let weathersit = weather_code(rng);

            // Seasonal curve peaking mid-year, with growth in the second year.
            let season = (2.0 * std::f64::consts::PI * (date.ordinal() as f64 - 100.0) / 365.0).sin();
            let growth = 1.0 + 0.6 * (i as f64 / days as f64);
            let weather_factor = match weathersit {
                1 => 1.0,
                2 => 0.85,
                3 => 0.45,
                _ => 0.2,
            };

            let base_registered = if workingday == 1 { 3800.0 } else { 2900.0 };
            let base_casual = if workingday == 1 { 600.0 } else { 1400.0 };

            let registered = ((base_registered + 1200.0 * season) * growth * weather_factor
                + rng.gauss(0.0, 250.0))
            .max(20.0)
            .round() as i64;
            let casual = ((base_casual + 500.0 * season) * growth * weather_factor
                + rng.gauss(0.0, 120.0))
            .max(2.0)
            .round() as i64;

            DayRow {
                instant: i as i64 + 1,
                dteday: date,
                workingday,
                weathersit,
                casual,
                registered,
                cnt: casual + registered,
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[DayRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[DayRow]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;
    let int_column = |f: fn(&DayRow) -> i64| Int64Array::from(rows.iter().map(f).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("instant", DataType::Int64, false),
        Field::new("dteday", DataType::Date32, false),
        Field::new("workingday", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("casual", DataType::Int64, false),
        Field::new("registered", DataType::Int64, false),
        Field::new("cnt", DataType::Int64, false),
        Field::new("source", DataType::Utf8, false),
    ]));

    let dates = Date32Array::from(
        rows.iter()
            .map(|r| (r.dteday - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let source = StringArray::from(vec!["synthetic"; rows.len()]);

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(int_column(|r| r.instant)),
            Arc::new(dates),
            Arc::new(int_column(|r| r.workingday)),
            Arc::new(int_column(|r| r.weathersit)),
            Arc::new(int_column(|r| r.casual)),
            Arc::new(int_column(|r| r.registered)),
            Arc::new(int_column(|r| r.cnt)),
            Arc::new(source),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let first = NaiveDate::from_ymd_opt(2011, 1, 1).context("start date")?;
    let rows = generate_rows(first, 731, &mut rng);

    write_csv("day_data.csv", &rows)?;
    write_parquet("day_data.parquet", &rows)?;

    log::info!("Wrote {} days to day_data.csv and day_data.parquet", rows.len());
    println!(
        "Wrote {} days ({} to {}) to day_data.csv and day_data.parquet",
        rows.len(),
        rows.first().map(|r| r.dteday).unwrap_or(first),
        rows.last().map(|r| r.dteday).unwrap_or(first)
    );
    Ok(())
}
