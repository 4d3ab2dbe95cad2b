/// Data layer: core types, loading, filtering and chart aggregation.
///
/// Architecture:
/// ```text
///  scores.csv        topics.csv
///        │                │
///        ▼                ▼
///   ┌──────────────────────────┐
///   │  loader                   │  parse rows, normalize dates,
///   └──────────────────────────┘  inner join on (ticker, date)
///        │
///        ▼
///   ┌──────────────┐
///   │  EsgDataset   │  Vec<FilingRecord>, dominant topic per year
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │  filter   │ ───▶ │  charts     │  aggregate → per-panel data
///   └──────────┘      └────────────┘
/// ```

pub mod aggregate;
pub mod charts;
pub mod filter;
pub mod loader;
pub mod model;
