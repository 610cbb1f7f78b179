/// Data layer: core types, loading, cleaning and aggregation.
///
/// Architecture:
/// ```text
///  googleplaystore.csv / AppleStore.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (header resolved to Columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  defect → dedup → English → free, each a new Dataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  frequency / grouped-average tables  (numeric: "1,000+" → 1000)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod numeric;
