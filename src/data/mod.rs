/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MaintenanceDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ MaintenanceDataset  │  Vec<Observation>, failure-type index
///   └────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  type equality + sensor ranges → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  counts, correlation, distributions, means
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
