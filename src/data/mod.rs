/// Data layer: core types, loading, normalization and export.
///
/// Architecture:
/// ```text
///  satellite export (.csv / .tsv, `#` comments)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header lookup → Vec<Observation>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  timestamp → date, K → °C  → SstSeries
///   └───────────┘
///        │
///        ├──────────────► export   (Dates,SST_Kelvin,SST_Celsius)
///        ▼
///   ┌──────────┐
///   │ cadence   │  optional one-record-per-day check
///   └──────────┘
/// ```

pub mod cadence;
pub mod export;
pub mod loader;
pub mod model;
pub mod normalize;
