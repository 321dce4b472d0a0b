/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (fails with LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Vec<Record>, place index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  place names, year options, chart filter
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
