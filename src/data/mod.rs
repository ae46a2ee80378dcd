/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        bundled sample
///        │                              │
///        ▼                              ▼
///   ┌──────────┐   parse   ┌──────────────────┐
///   │  loader   │ ───────▶ │   SalesDataset    │  Vec<SalesRecord>, dedup,
///   └──────────┘           └──────────────────┘  category/region/year index
///                                  │
///                                  ▼
///   ┌──────────┐         ┌─────────────────┐
///   │  filter   │ ──────▶ │    aggregate     │  time series / group sum /
///   └──────────┘         └─────────────────┘  hierarchy → ChartResult
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
pub mod sample;
