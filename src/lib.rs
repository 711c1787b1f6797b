/// solmon_service: solar plant performance monitoring and query engine.
///
/// # Module structure
///
/// ```text
/// solmon_service
/// ├── model     — shared data types (Reading, Status, Dataset, IngestError, …)
/// ├── classify  — performance status rule (PR floor + energy-vs-expected)
/// ├── config    — service configuration loader (solmon.toml)
/// ├── ingest
/// │   ├── report   — estate report CSV: header resolution + row parsing
/// │   └── fixtures (test only) — representative report payloads
/// ├── query     — date-range/site filtering, status counts, flagged rows
/// └── endpoint  — JSON query API for chart/table front-ends
/// ```

/// Public modules
pub mod classify;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod query;
