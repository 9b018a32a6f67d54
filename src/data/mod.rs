/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → DayTable (sorted by date)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive [start, end] → new DayTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ aggregation  │  daily totals, category counts, RFM
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  report   │  Dashboard: derived tables + summary scalars
///   └──────────┘
/// ```

pub mod aggregation;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
