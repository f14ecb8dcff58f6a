/// Data layer: core types, loading, caching, and queries.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PredictionTable (column roles resolved)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<PredictionTable> keyed by path + mtime + length
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  summarize / lookup / sample
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod query;
