//! Integration tests for the load → filter → dashboard pipeline

use std::io::Write;
use std::sync::Arc;

use arrow::array::{Date32Array, Int32Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bikeshare_dashboard::data::aggregation::category_counts;
use bikeshare_dashboard::data::model::CategoryColumn;
use bikeshare_dashboard::{
    ColumnNames, Dashboard, DashboardError, DateRange, filter_by_date, load_file,
};
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use tempfile::NamedTempFile;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Three days, written out of order, with the usual extra columns.
fn create_test_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        file,
        "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,casual,registered,cnt"
    )
    .unwrap();
    writeln!(file, "2,2011-01-02,1,0,1,0,0,0,2,0.36,2,18,20").unwrap();
    writeln!(file, "1,2011-01-01,1,0,1,0,6,0,2,0.34,1,9,10").unwrap();
    writeln!(file, "3,2011-01-03,1,0,1,0,1,1,1,0.19,3,27,30").unwrap();
    file
}

/// Sixty days with a deterministic pattern.
fn create_long_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "instant,dteday,workingday,weathersit,casual,registered,cnt").unwrap();
    let first = date("2011-03-01");
    for i in 0..60u64 {
        let d = first + chrono::Days::new(i);
        let casual = 100 + (i * 7) % 50;
        let registered = 1000 + (i * 13) % 300;
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            i + 1,
            d,
            u64::from(i % 7 < 5),
            1 + i % 3,
            casual,
            registered,
            casual + registered
        )
        .unwrap();
    }
    file
}

#[test]
fn test_end_to_end_pipeline() {
    let file = create_test_csv();
    let table = load_file(file.path(), &ColumnNames::default()).unwrap();
    assert_eq!(table.len(), 3);

    let range = DateRange::full(&table).unwrap();
    assert_eq!(range, DateRange::new(date("2011-01-01"), date("2011-01-03")));

    let filtered = filter_by_date(&table, range.start, range.end).unwrap();
    let dashboard = Dashboard::build(&filtered, 5);

    let totals: Vec<u64> = dashboard.daily.iter().map(|d| d.sharing_total).collect();
    assert_eq!(totals, vec![10, 20, 30]);
    assert_eq!(dashboard.summary.total_sharing, 60);
    assert_eq!(dashboard.summary.total_casual, 6);
    assert_eq!(dashboard.summary.total_registered, 54);

    let first = dashboard.rfm.iter().find(|r| r.index == 1).unwrap();
    assert_eq!(first.recency, 2);
    assert_eq!(first.frequency, 1);
    assert_eq!(first.monetary, 10);

    // two non-working days, one working day
    let by_working: Vec<(i64, usize)> = dashboard
        .by_working_day
        .iter()
        .map(|c| (c.category, c.count))
        .collect();
    assert_eq!(by_working, vec![(0, 2), (1, 1)]);
}

#[test]
fn test_filtered_row_count_matches_source() {
    let file = create_long_csv();
    let table = load_file(file.path(), &ColumnNames::default()).unwrap();
    assert_eq!(table.len(), 60);

    let ranges = [
        ("2011-03-01", "2011-04-29"),
        ("2011-03-10", "2011-03-20"),
        ("2011-02-01", "2011-03-05"),
        ("2011-04-29", "2011-06-01"),
    ];
    for (start, end) in ranges {
        let (start, end) = (date(start), date(end));
        let filtered = filter_by_date(&table, start, end).unwrap();
        let expected = table
            .records()
            .iter()
            .filter(|r| start <= r.date && r.date <= end)
            .count();
        assert_eq!(filtered.len(), expected, "{start}..={end}");

        let dashboard = Dashboard::build(&filtered, 5);
        for day in &dashboard.daily {
            assert_eq!(day.sharing_total, day.casual_total + day.registered_total);
        }
        assert_eq!(dashboard, Dashboard::build(&filtered, 5));
    }
}

#[test]
fn test_single_day_range() {
    let file = create_long_csv();
    let table = load_file(file.path(), &ColumnNames::default()).unwrap();

    let day = date("2011-03-15");
    let filtered = filter_by_date(&table, day, day).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.records()[0].date, day);

    let dashboard = Dashboard::build(&filtered, 5);
    assert_eq!(dashboard.daily.len(), 1);
    assert_eq!(dashboard.rfm[0].recency, 0);
}

#[test]
fn test_range_without_data() {
    let file = create_long_csv();
    let table = load_file(file.path(), &ColumnNames::default()).unwrap();

    let filtered = filter_by_date(&table, date("2015-01-01"), date("2015-12-31")).unwrap();
    assert!(filtered.is_empty());

    let dashboard = Dashboard::build(&filtered, 5);
    assert!(dashboard.daily.is_empty());
    assert!(dashboard.by_working_day.is_empty());
    assert!(dashboard.by_weather.is_empty());
    assert!(dashboard.rfm.is_empty());
    assert_eq!(dashboard.summary.total_sharing, 0);
    assert_eq!(dashboard.summary.avg_monetary, 0.0);
}

#[test]
fn test_reversed_range() {
    let file = create_test_csv();
    let table = load_file(file.path(), &ColumnNames::default()).unwrap();
    let err = filter_by_date(&table, date("2011-01-03"), date("2011-01-01")).unwrap_err();
    assert!(matches!(err, DashboardError::EmptyRange { .. }));
}

#[test]
fn test_load_failure_is_whole() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "instant,dteday,workingday,weathersit,casual,registered,cnt").unwrap();
    writeln!(file, "1,2011-01-01,1,1,1,9,10").unwrap();
    writeln!(file, "2,not-a-date,1,1,2,18,20").unwrap();

    let err = load_file(file.path(), &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, DashboardError::Parse { row: 1, .. }));
    assert!(err.to_string().contains("not-a-date"));
}

#[test]
fn test_counts_too_large_to_sum_fail_the_load() {
    let big = u64::MAX / 2 + 1;
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "instant,dteday,workingday,weathersit,casual,registered,cnt").unwrap();
    writeln!(file, "1,2011-01-01,1,1,0,{big},{big}").unwrap();
    writeln!(file, "2,2011-01-02,1,1,0,{big},{big}").unwrap();

    let err = load_file(file.path(), &ColumnNames::default()).unwrap_err();
    assert!(matches!(err, DashboardError::TypeInvariant { row: 1, .. }), "{err}");
}

#[test]
fn test_parquet_dataset() {
    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();

    let schema = Arc::new(Schema::new(vec![
        Field::new("instant", DataType::Int64, false),
        Field::new("dteday", DataType::Date32, false),
        Field::new("workingday", DataType::Int32, false),
        Field::new("weathersit", DataType::Int32, false),
        Field::new("casual", DataType::Int64, false),
        Field::new("registered", DataType::Int64, false),
        Field::new("cnt", DataType::Int64, false),
    ]));
    // 2011-01-01 is day 14975 since the Unix epoch
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![2, 1])),
            Arc::new(Date32Array::from(vec![14976, 14975])),
            Arc::new(Int32Array::from(vec![0, 1])),
            Arc::new(Int32Array::from(vec![3, 1])),
            Arc::new(Int64Array::from(vec![5, 1])),
            Arc::new(Int64Array::from(vec![15, 9])),
            Arc::new(Int64Array::from(vec![20, 10])),
        ],
    )
    .unwrap();

    let mut writer = ArrowWriter::try_new(std::fs::File::create(file.path()).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let table = load_file(file.path(), &ColumnNames::default()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records()[0].date, date("2011-01-01"));
    assert_eq!(table.records()[0].index, 1);
    assert_eq!(table.records()[1].weather, 3);

    let weather = category_counts(&table, CategoryColumn::Weather);
    assert_eq!(weather.len(), 2);
}
