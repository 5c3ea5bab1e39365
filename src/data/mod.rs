/// Data layer: core types, loading, generation, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet      synthetic::generate
///        │                             │
///        ▼                             │
///   ┌──────────┐                       │
///   │  loader   │  parse file → Dataset│
///   └──────────┘                       │
///        │◄────────────────────────────┘
///        ▼
///   ┌──────────────┐
///   │   Dataset     │  Schema + Vec<Record>, immutable
///   └──────────────┘
///        │                    │
///        ▼                    ▼
///   ┌──────────┐        ┌──────────┐
///   │  filter   │        │  export   │  csv / parquet
///   └──────────┘        └──────────┘
///        │
///        ▼
///   filtered view (Vec<&Record>) → stats
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod synthetic;
