/// Data ingestion for the meetbouten export pipeline.
///
/// Submodules:
/// - `meetbouten` — Amsterdam Data API: URL construction, JSON parsing,
///   and flattening of nested records into `MeasurementRow`s.

pub mod meetbouten;
