/// Data layer: record types, catalog access, loading and normalization.
///
/// Architecture:
/// ```text
///  <data_dir>/sentiment140/<split>.{parquet,csv,json}
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  (name, split) → file → loader → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ sentiment140  │  stable sort on raw polarity (optional)
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop neutral, relabel, decode → Vec<NormalizedRecord>
///   └──────────┘
/// ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sentiment140;
