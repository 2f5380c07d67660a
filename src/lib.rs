/// meetbout_export: Amsterdam meetbouten subsidence spreadsheet exporter.
///
/// # Module structure
///
/// ```text
/// meetbout_export
/// ├── model    — shared data types (MeasurementRow, MeetboutError)
/// ├── config   — TOML runtime configuration (API, output path)
/// ├── ingest
/// │   └── meetbouten — Amsterdam Data API: URL construction, JSON
/// │                    parsing, record flattening
/// ├── analysis
/// │   └── zakking — address grouping, chronological ordering, derived
/// │                 recent-rate computation
/// ├── export   — presentation columns, blank group separators,
/// │              semicolon CSV writing
/// └── logging  — leveled console/file logger
/// ```

pub mod analysis;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
