use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use super::model::{CategoryColumn, DayTable};

// ---------------------------------------------------------------------------
// Derived rows
// ---------------------------------------------------------------------------

/// Totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub sharing_total: u64,
    pub casual_total: u64,
    pub registered_total: u64,
}

/// Number of distinct `total` values seen for one category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: i64,
    pub count: usize,
}

/// Recency / frequency / monetary values for one source index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RfmRow {
    pub index: i64,
    /// Days between the latest date in the table and this index's latest date.
    pub recency: i64,
    /// Distinct `casual` values in the group.
    pub frequency: usize,
    /// Sum of `total` in the group.
    pub monetary: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfmMetric {
    Recency,
    Frequency,
    Monetary,
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Resample to calendar days.
///
/// Emits one row for every day from the first to the last date in the
/// table. Days without records are zero-filled and records sharing a date
/// are summed.
pub fn daily_totals(table: &DayTable) -> Vec<DailyTotal> {
    let Some((first, last)) = table.date_span() else {
        return Vec::new();
    };

    let mut by_date: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
    for r in table.records() {
        let day = by_date.entry(r.date).or_insert_with(|| DailyTotal::zero(r.date));
        day.sharing_total += r.total;
        day.casual_total += r.casual;
        day.registered_total += r.registered;
    }

    let daily: Vec<DailyTotal> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|d| by_date.get(&d).copied().unwrap_or_else(|| DailyTotal::zero(d)))
        .collect();

    debug!("Daily totals: {} days from {} records", daily.len(), table.len());
    daily
}

impl DailyTotal {
    fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            sharing_total: 0,
            casual_total: 0,
            registered_total: 0,
        }
    }
}

/// Group by a category column and count the distinct `total` values per group.
///
/// This counts distinct values rather than rows: two days in the same
/// category with an identical total contribute one. Output is ordered by
/// category code.
pub fn category_counts(table: &DayTable, column: CategoryColumn) -> Vec<CategoryCount> {
    let mut groups: BTreeMap<i64, BTreeSet<u64>> = BTreeMap::new();
    for r in table.records() {
        groups.entry(r.category(column)).or_default().insert(r.total);
    }

    groups
        .into_iter()
        .map(|(category, totals)| CategoryCount {
            category,
            count: totals.len(),
        })
        .collect()
}

/// Build the RFM table, one row per source index ordered by index.
///
/// Indices are unique after loading, so every group normally holds a
/// single record: frequency is 1 and monetary is that day's total.
pub fn rfm_table(table: &DayTable) -> Vec<RfmRow> {
    let Some(recent) = table.max_date() else {
        return Vec::new();
    };

    struct Group {
        last_date: NaiveDate,
        casual: BTreeSet<u64>,
        monetary: u64,
    }

    let mut groups: BTreeMap<i64, Group> = BTreeMap::new();
    for r in table.records() {
        let g = groups.entry(r.index).or_insert_with(|| Group {
            last_date: r.date,
            casual: BTreeSet::new(),
            monetary: 0,
        });
        g.last_date = g.last_date.max(r.date);
        g.casual.insert(r.casual);
        g.monetary += r.total;
    }

    groups
        .into_iter()
        .map(|(index, g)| RfmRow {
            index,
            recency: (recent - g.last_date).num_days(),
            frequency: g.casual.len(),
            monetary: g.monetary,
        })
        .collect()
}

/// Best `n` rows for a metric: lowest recency, highest frequency or
/// highest monetary value. Ties keep index order.
pub fn top_rfm(rfm: &[RfmRow], metric: RfmMetric, n: usize) -> Vec<RfmRow> {
    let mut sorted = rfm.to_vec();
    match metric {
        RfmMetric::Recency => sorted.sort_by_key(|r| r.recency),
        RfmMetric::Frequency => sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency)),
        RfmMetric::Monetary => sorted.sort_by(|a, b| b.monetary.cmp(&a.monetary)),
    }
    sorted.truncate(n);
    sorted
}
