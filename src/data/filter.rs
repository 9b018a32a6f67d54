use chrono::NaiveDate;
use log::debug;

use super::error::DashboardError;
use super::model::DayTable;

// ---------------------------------------------------------------------------
// Date range selection
// ---------------------------------------------------------------------------

/// Inclusive date bounds chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The default selection: the whole span of the table.
    pub fn full(table: &DayTable) -> Option<Self> {
        table.date_span().map(|(start, end)| Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamp both bounds into `span`, keeping the user's order.
    pub fn clamp_to(&self, span: &DateRange) -> Self {
        Self {
            start: self.start.clamp(span.start, span.end),
            end: self.end.clamp(span.start, span.end),
        }
    }
}

/// Return a new table with the records dated within `[start, end]`.
///
/// A range that matches nothing yields an empty table; a range whose start
/// is after its end is rejected with [`DashboardError::EmptyRange`].
pub fn filter_by_date(
    table: &DayTable,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DayTable, DashboardError> {
    if start > end {
        return Err(DashboardError::EmptyRange { start, end });
    }
    let range = DateRange::new(start, end);

    let records: Vec<_> = table
        .records()
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect();

    debug!(
        "Filter {start}..={end}: {} of {} records",
        records.len(),
        table.len()
    );
    Ok(DayTable::from_sorted(records))
}
