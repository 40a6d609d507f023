/// Data layer: core types, loading, inspection and cleaning.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV, infer column types → DataTable (raw)
///   └──────────┘
///        │
///        ├──────────────► schema    shape, dtypes, missing counts, head
///        ▼
///   ┌──────────┐
///   │ cleaning  │  NoOp / DropRows / FillMeanNumeric → DataTable (cleaned)
///   └──────────┘
///        │
///        ▼
///   ColumnClassification   numeric vs categorical → stats, profile, charts
/// ```

pub mod cleaning;
pub mod loader;
pub mod model;
pub mod schema;
