use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DayRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single day of bike-sharing activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    /// Position after the chronological sort (`0..N-1` over the full table).
    pub row: usize,
    /// Row identifier carried by the source file.
    pub index: i64,
    pub date: NaiveDate,
    pub working_day: i64,
    pub weather: i64,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
}

impl DayRecord {
    /// `total == casual + registered`.
    pub fn is_consistent(&self) -> bool {
        self.casual.checked_add(self.registered) == Some(self.total)
    }

    /// Value of the given categorical column.
    pub fn category(&self, column: CategoryColumn) -> i64 {
        match column {
            CategoryColumn::WorkingDay => self.working_day,
            CategoryColumn::Weather => self.weather,
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryColumn – the two categorical dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    WorkingDay,
    Weather,
}

impl CategoryColumn {
    /// Human readable label for a category code.
    pub fn label(self, code: i64) -> String {
        let known = match (self, code) {
            (CategoryColumn::WorkingDay, 0) => Some("Weekend / holiday"),
            (CategoryColumn::WorkingDay, 1) => Some("Working day"),
            (CategoryColumn::Weather, 1) => Some("Clear"),
            (CategoryColumn::Weather, 2) => Some("Mist / cloudy"),
            (CategoryColumn::Weather, 3) => Some("Light snow / rain"),
            (CategoryColumn::Weather, 4) => Some("Heavy rain / storm"),
            _ => None,
        };
        known.map(str::to_string).unwrap_or_else(|| code.to_string())
    }

    pub fn title(self) -> &'static str {
        match self {
            CategoryColumn::WorkingDay => "Working day",
            CategoryColumn::Weather => "Weather",
        }
    }
}

// ---------------------------------------------------------------------------
// DayTable – an owned, date-sorted collection of records
// ---------------------------------------------------------------------------

/// The loaded (or filtered) table. Records are always sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTable {
    records: Vec<DayRecord>,
}

impl DayTable {
    /// Sort records chronologically and assign `row` positions.
    ///
    /// The sort is stable so records sharing a date keep their file order.
    pub fn from_records(mut records: Vec<DayRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        for (row, record) in records.iter_mut().enumerate() {
            record.row = row;
        }
        DayTable { records }
    }

    /// Wrap records that are already sorted, keeping their `row` values.
    pub(crate) fn from_sorted(records: Vec<DayRecord>) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
        DayTable { records }
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last date, `None` for an empty table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }

    /// Latest date in the table.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}
