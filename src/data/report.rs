use log::debug;
use serde::Serialize;

use super::aggregation::{
    CategoryCount, DailyTotal, RfmMetric, RfmRow, category_counts, daily_totals, rfm_table, top_rfm,
};
use super::model::{CategoryColumn, DayTable};

// ---------------------------------------------------------------------------
// Summary scalars
// ---------------------------------------------------------------------------

/// Headline numbers shown above the charts. All zero for an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub total_sharing: u64,
    pub total_registered: u64,
    pub total_casual: u64,
    pub avg_recency: f64,
    pub avg_frequency: f64,
    pub avg_monetary: f64,
}

impl Summary {
    fn compute(daily: &[DailyTotal], rfm: &[RfmRow]) -> Self {
        let mean = |sum: f64| {
            if rfm.is_empty() {
                0.0
            } else {
                sum / rfm.len() as f64
            }
        };
        Summary {
            total_sharing: daily.iter().map(|d| d.sharing_total).sum(),
            total_registered: daily.iter().map(|d| d.registered_total).sum(),
            total_casual: daily.iter().map(|d| d.casual_total).sum(),
            avg_recency: mean(rfm.iter().map(|r| r.recency as f64).sum()),
            avg_frequency: mean(rfm.iter().map(|r| r.frequency as f64).sum()),
            avg_monetary: mean(rfm.iter().map(|r| r.monetary as f64).sum()),
        }
    }

    /// Average recency rounded to one decimal.
    pub fn recency_label(&self) -> String {
        format!("{:.1}", self.avg_recency)
    }

    /// Average frequency rounded to two decimals.
    pub fn frequency_label(&self) -> String {
        format!("{:.2}", self.avg_frequency)
    }

    pub fn monetary_label(&self, symbol: &str) -> String {
        format_currency(self.avg_monetary, symbol)
    }
}

// ---------------------------------------------------------------------------
// Dashboard – everything the reporting surface needs for one range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Records in the filtered table.
    pub rows: usize,
    pub daily: Vec<DailyTotal>,
    /// Ordered by category code.
    pub by_working_day: Vec<CategoryCount>,
    /// Ordered by category code.
    pub by_weather: Vec<CategoryCount>,
    /// Ordered by index.
    pub rfm: Vec<RfmRow>,
    pub summary: Summary,
    pub top_recency: Vec<RfmRow>,
    pub top_frequency: Vec<RfmRow>,
    pub top_monetary: Vec<RfmRow>,
}

impl Dashboard {
    /// Run every transform over an already filtered table.
    pub fn build(filtered: &DayTable, top_n: usize) -> Self {
        let daily = daily_totals(filtered);
        let by_working_day = category_counts(filtered, CategoryColumn::WorkingDay);
        let by_weather = category_counts(filtered, CategoryColumn::Weather);
        let rfm = rfm_table(filtered);
        let summary = Summary::compute(&daily, &rfm);

        debug!(
            "Dashboard: {} days, {} RFM rows, total {}",
            daily.len(),
            rfm.len(),
            summary.total_sharing
        );

        Dashboard {
            rows: filtered.len(),
            top_recency: top_rfm(&rfm, RfmMetric::Recency, top_n),
            top_frequency: top_rfm(&rfm, RfmMetric::Frequency, top_n),
            top_monetary: top_rfm(&rfm, RfmMetric::Monetary, top_n),
            daily,
            by_working_day,
            by_weather,
            rfm,
            summary,
        }
    }

    /// Category rows for charting, largest count first.
    pub fn ranked_categories(&self, column: CategoryColumn) -> Vec<CategoryCount> {
        let mut rows = match column {
            CategoryColumn::WorkingDay => self.by_working_day.clone(),
            CategoryColumn::Weather => self.by_weather.clone(),
        };
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Currency formatting
// ---------------------------------------------------------------------------

/// Format an amount the Colombian-Spanish way: `AU$ 1.234,56`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol} {grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DayRecord;

    fn table() -> DayTable {
        let days = [("2011-01-01", 1, 9), ("2011-01-02", 2, 18), ("2011-01-03", 3, 27)];
        DayTable::from_records(
            days.iter()
                .enumerate()
                .map(|(i, &(d, casual, registered))| DayRecord {
                    row: 0,
                    index: i as i64 + 1,
                    date: d.parse().unwrap(),
                    working_day: (i % 2) as i64,
                    weather: 1,
                    casual,
                    registered,
                    total: casual + registered,
                })
                .collect(),
        )
    }

    #[test]
    fn summary_scalars() {
        let dashboard = Dashboard::build(&table(), 5);
        let s = dashboard.summary;
        assert_eq!(s.total_sharing, 60);
        assert_eq!(s.total_registered, 54);
        assert_eq!(s.total_casual, 6);
        assert!((s.avg_recency - 1.0).abs() < 1e-9);
        assert!((s.avg_frequency - 1.0).abs() < 1e-9);
        assert!((s.avg_monetary - 20.0).abs() < 1e-9);
        assert_eq!(s.recency_label(), "1.0");
        assert_eq!(s.frequency_label(), "1.00");
        assert_eq!(s.monetary_label("AU$"), "AU$ 20,00");
    }

    #[test]
    fn empty_table_gives_zero_summary() {
        let dashboard = Dashboard::build(&DayTable::default(), 5);
        assert!(dashboard.is_empty());
        assert!(dashboard.rfm.is_empty());
        assert!(dashboard.top_monetary.is_empty());
        assert_eq!(dashboard.summary, Summary::default());
    }

    #[test]
    fn build_is_pure() {
        let t = table();
        assert_eq!(Dashboard::build(&t, 5), Dashboard::build(&t, 5));
    }

    #[test]
    fn ranked_categories_largest_first() {
        let dashboard = Dashboard::build(&table(), 5);
        let ranked = dashboard.ranked_categories(CategoryColumn::WorkingDay);
        assert_eq!(ranked[0].category, 0);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(dashboard.by_working_day[0].category, 0);
    }

    #[test]
    fn row_count_includes_repeated_indices() {
        let mut records = table().records().to_vec();
        records[1].index = 1;
        let dashboard = Dashboard::build(&DayTable::from_records(records), 5);
        assert_eq!(dashboard.rows, 3);
        assert_eq!(dashboard.rfm.len(), 2);
        assert_eq!(Dashboard::build(&DayTable::default(), 5).rows, 0);
    }

    #[test]
    fn top_n_limits_rankings() {
        let dashboard = Dashboard::build(&table(), 2);
        assert_eq!(dashboard.top_recency.len(), 2);
        assert_eq!(dashboard.top_recency[0].index, 3);
        assert_eq!(dashboard.top_monetary[0].monetary, 30);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0, "AU$"), "AU$ 0,00");
        assert_eq!(format_currency(999.5, "AU$"), "AU$ 999,50");
        assert_eq!(format_currency(4504.3489, "AU$"), "AU$ 4.504,35");
        assert_eq!(format_currency(1234567.0, "$"), "$ 1.234.567,00");
        assert_eq!(format_currency(-12.0, "$"), "-$ 12,00");
    }
}
