/// Data layer: core types, header normalization, and loading.
///
/// Architecture:
/// ```text
///  intcal20.14c / upload.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse delimited text → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  messy headers → cal_bp / c14_age / sigma …
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ CalibrationDataset │  finite rows, sorted view by c14_age
///   └────────────────────┘
/// ```

pub mod columns;
pub mod loader;
pub mod model;
