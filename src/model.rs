/// Core data types for the meetbouten export pipeline.
///
/// This module defines the shared domain model imported by all other
/// modules. It contains no logic, no I/O, and no external dependencies
/// beyond chrono — only types.

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A single subsidence reading, flattened from the nested API response.
///
/// One row corresponds to one entry in the `_embedded.metingen` array of a
/// measurement-series response, enriched with address and status metadata
/// from the owning meetbout (the physical measurement bolt).
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// Street + house-number label (`nabijNummeraanduiding`); grouping key.
    pub address: String,
    /// Absolute height in meters relative to NAP, rounded to 3 decimals.
    pub height_above_nap: f64,
    /// Identifier of the physical measurement bolt.
    pub device_id: String,
    /// Status descriptor of the bolt (`statusOmschrijving`); constant
    /// across all rows of the same device within one run.
    pub device_status: String,
    /// Cumulative settlement since installation, rounded to 1 decimal.
    pub cumulative_subsidence: f64,
    /// Settlement since the previous reading, rounded to 2 decimals.
    /// `f64::INFINITY` for a device's first reading (no prior baseline).
    pub subsidence: f64,
    /// Externally supplied settlement rate, rounded to 1 decimal.
    /// A zero or absent upstream value is `None`.
    pub supplied_rate: Option<f64>,
    /// Raw measurement date string, retained verbatim for output.
    pub datum: String,
    /// Parsed measurement date; `None` when `datum` is malformed.
    /// Rows without a parseable date fall into the zero-interval branch
    /// of the rate calculator.
    pub date: Option<NaiveDate>,
    /// Ordinal count of this measurement for the device.
    pub measurement_index: i64,
    /// Most recent settlement rate per year, computed by
    /// `analysis::zakking::compute_recent_rates`. Zero until assigned;
    /// defined for every row after processing.
    pub recent_rate: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching, processing, or exporting
/// meetbouten data. There is no retry and no partial recovery anywhere:
/// the first error aborts the run and no output file is produced.
#[derive(Debug)]
pub enum MeetboutError {
    /// The requested street yielded zero meetbouten from the API.
    StreetNotFound(String),
    /// Non-2xx HTTP response from the Amsterdam Data API.
    HttpError(u16),
    /// The request itself failed (network error, timeout).
    Transport(String),
    /// The response body could not be deserialized, or a required field
    /// was absent from a record.
    ParseError(String),
    /// The output file could not be written.
    Io(String),
}

impl std::fmt::Display for MeetboutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetboutError::StreetNotFound(street) => {
                write!(f, "Straat niet gevonden (Controleer spaties): {}", street)
            }
            MeetboutError::HttpError(code) => write!(f, "HTTP error: {}", code),
            MeetboutError::Transport(msg) => write!(f, "Request failed: {}", msg),
            MeetboutError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            MeetboutError::Io(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for MeetboutError {}
