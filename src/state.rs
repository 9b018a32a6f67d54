use std::path::Path;

use bikeshare_dashboard::data::filter::{DateRange, filter_by_date};
use bikeshare_dashboard::data::loader::load_file;
use bikeshare_dashboard::data::model::DayTable;
use bikeshare_dashboard::data::report::Dashboard;
use bikeshare_dashboard::DashboardConfig;
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads). Never mutated afterwards.
    pub dataset: Option<DayTable>,

    /// Full date span of the dataset, bounds for the date pickers.
    pub span: Option<DateRange>,

    /// Currently selected inclusive range.
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Range requested before any data was loaded (from the command line).
    requested: (Option<NaiveDate>, Option<NaiveDate>),

    /// Derived tables for the current range (rebuilt on every change).
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        // Replaced by the data span once a dataset loads.
        let placeholder = NaiveDate::default();
        Self {
            config,
            dataset: None,
            span: None,
            start: start.unwrap_or(placeholder),
            end: end.unwrap_or(placeholder),
            requested: (start, end),
            dashboard: None,
            status_message: None,
        }
    }

    /// Load a file and make it the current dataset; failures end up in
    /// `status_message` and leave the previous dataset in place.
    pub fn open_path(&mut self, path: &Path) {
        match load_file(path, &self.config.columns) {
            Ok(table) => self.set_dataset(table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and select its full span (or the
    /// requested range, clamped into the span).
    pub fn set_dataset(&mut self, dataset: DayTable) {
        self.span = DateRange::full(&dataset);
        if let Some(span) = self.span {
            let (start, end) = self.requested;
            let wanted = DateRange::new(start.unwrap_or(span.start), end.unwrap_or(span.end));
            let selected = wanted.clamp_to(&span);
            self.start = selected.start;
            self.end = selected.end;
        }
        self.requested = (None, None);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Change the selected range and rebuild the dashboard.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start = start;
        self.end = end;
        self.recompute();
    }

    /// Select the full span again.
    pub fn reset_range(&mut self) {
        if let Some(span) = self.span {
            self.set_range(span.start, span.end);
        }
    }

    /// Filter the dataset and rebuild every derived table from scratch.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.dashboard = None;
            return;
        };
        match filter_by_date(ds, self.start, self.end) {
            Ok(filtered) => {
                self.dashboard = Some(Dashboard::build(&filtered, self.config.top_n));
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.dashboard = None;
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Number of records in the loaded dataset.
    pub fn dataset_len(&self) -> usize {
        self.dataset.as_ref().map_or(0, DayTable::len)
    }
}
