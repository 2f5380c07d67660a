/// Amsterdam Data API client for meetbouten
///
/// Retrieves meetbout (subsidence measurement bolt) records and their
/// measurement series from the Amsterdam open-data platform, and flattens
/// them into `MeasurementRow`s for the analysis pipeline.
///
/// API documentation: https://api.data.amsterdam.nl/v1/docs/datasets/meetbouten.html
/// Endpoints used:
///   /meetbouten/meetbouten/ — bolts near an address (filtered by street)
///   /meetbouten/metingen/   — measurement series per bolt

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::Config;
use crate::model::{MeasurementRow, MeetboutError};

// ============================================================================
// API Response Structures
// ============================================================================

/// Device listing response (HAL envelope).
#[derive(Debug, Deserialize)]
pub struct MeetboutenResponse {
    #[serde(rename = "_embedded")]
    pub embedded: MeetboutenEmbedded,
}

#[derive(Debug, Deserialize)]
pub struct MeetboutenEmbedded {
    pub meetbouten: Vec<MeetboutEntry>,
}

/// One meetbout as returned by the listing endpoint.
///
/// Every field here is required: a record missing any of them fails
/// deserialization of the whole response, which aborts the run.
#[derive(Debug, Deserialize)]
pub struct MeetboutEntry {
    /// Street + house-number label the bolt sits nearest to.
    #[serde(rename = "nabijNummeraanduiding")]
    pub address: String,
    /// Free-text status of the bolt (e.g. "Actueel", "Vervallen").
    #[serde(rename = "statusOmschrijving")]
    pub status: String,
    #[serde(rename = "_links")]
    pub links: MeetboutLinks,
}

#[derive(Debug, Deserialize)]
pub struct MeetboutLinks {
    #[serde(rename = "self")]
    pub self_link: SelfLink,
}

#[derive(Debug, Deserialize)]
pub struct SelfLink {
    /// The link title carries the bolt's stable identifier.
    pub title: String,
}

impl MeetboutEntry {
    /// Stable identifier of the bolt, taken from its self-link title.
    pub fn device_id(&self) -> &str {
        &self.links.self_link.title
    }
}

/// Measurement series response (HAL envelope).
#[derive(Debug, Deserialize)]
pub struct MetingenResponse {
    #[serde(rename = "_embedded")]
    pub embedded: MetingenEmbedded,
}

#[derive(Debug, Deserialize)]
pub struct MetingenEmbedded {
    pub metingen: Vec<MetingEntry>,
}

/// One raw measurement for a meetbout.
#[derive(Debug, Deserialize)]
pub struct MetingEntry {
    /// Height relative to NAP, in meters.
    #[serde(rename = "hoogteTovNap")]
    pub height_above_nap: f64,
    /// Settlement since the previous reading. Absent for the device's
    /// first reading, which has no prior baseline.
    pub zakking: Option<f64>,
    /// Externally supplied settlement rate. Optional.
    #[serde(rename = "zakkingssnelheid")]
    pub supplied_rate: Option<f64>,
    /// Cumulative settlement since installation.
    #[serde(rename = "zakkingCumulatief")]
    pub cumulative_subsidence: f64,
    /// Measurement date, ISO-like string (e.g. "2021-06-14").
    pub datum: String,
    /// Ordinal count of this measurement for the device.
    #[serde(rename = "hoeveelsteMeting")]
    pub measurement_index: i64,
}

// ============================================================================
// URL Construction
// ============================================================================

/// Builds the listing URL for all meetbouten near a street.
///
/// The `like` filter matches labels starting with the street name followed
/// by a house number; spaces in the street name are encoded as `+`. The
/// page size must be large enough to return every bolt in one page.
pub fn build_meetbouten_url(base_url: &str, street: &str, page_size: u32) -> String {
    format!(
        "{}/meetbouten/?_pageSize={}&nabijNummeraanduiding[like]={}+*",
        base_url,
        page_size,
        street.replace(' ', "+")
    )
}

/// Builds the measurement-series URL for a single meetbout.
pub fn build_metingen_url(base_url: &str, device_id: &str) -> String {
    format!(
        "{}/metingen/?hoortBijMeetbout.identificatie={}",
        base_url, device_id
    )
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch all meetbouten for a street.
///
/// Returns `StreetNotFound` when the street resolves to zero bolts; the
/// caller must not proceed to compute anything in that case.
pub fn fetch_meetbouten(
    client: &reqwest::blocking::Client,
    config: &Config,
    street: &str,
) -> Result<Vec<MeetboutEntry>, MeetboutError> {
    let url = build_meetbouten_url(&config.api.base_url, street, config.api.page_size);
    let body = get_text(client, &url)?;
    meetbouten_for_street(&body, street)
}

/// Parses a listing body into the street's meetbouten.
///
/// An empty device list means the street does not exist in the dataset;
/// that is `StreetNotFound`, not an empty result.
pub fn meetbouten_for_street(
    body: &str,
    street: &str,
) -> Result<Vec<MeetboutEntry>, MeetboutError> {
    let entries = parse_meetbouten_response(body)?;
    if entries.is_empty() {
        return Err(MeetboutError::StreetNotFound(street.to_string()));
    }
    Ok(entries)
}

/// Fetch the measurement series for a single meetbout.
///
/// An empty series is not an error: the bolt simply contributes no rows.
pub fn fetch_metingen(
    client: &reqwest::blocking::Client,
    config: &Config,
    device_id: &str,
) -> Result<Vec<MetingEntry>, MeetboutError> {
    let url = build_metingen_url(&config.api.base_url, device_id);
    let body = get_text(client, &url)?;
    parse_metingen_response(&body)
}

fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, MeetboutError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| MeetboutError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(MeetboutError::HttpError(response.status().as_u16()));
    }

    response
        .text()
        .map_err(|e| MeetboutError::Transport(e.to_string()))
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Parse a meetbouten listing response body.
pub fn parse_meetbouten_response(body: &str) -> Result<Vec<MeetboutEntry>, MeetboutError> {
    let response: MeetboutenResponse =
        serde_json::from_str(body).map_err(|e| MeetboutError::ParseError(e.to_string()))?;
    Ok(response.embedded.meetbouten)
}

/// Parse a measurement-series response body.
pub fn parse_metingen_response(body: &str) -> Result<Vec<MetingEntry>, MeetboutError> {
    let response: MetingenResponse =
        serde_json::from_str(body).map_err(|e| MeetboutError::ParseError(e.to_string()))?;
    Ok(response.embedded.metingen)
}

// ============================================================================
// Record Normalization
// ============================================================================

/// Flattens a meetbout's measurement series into `MeasurementRow`s, in
/// the order the API returned them.
///
/// Rounding follows the presentation conventions of the dataset: height
/// to 3 decimals, settlement to 2, cumulative settlement and supplied
/// rate to 1. A missing `zakking` (first reading) becomes infinity so
/// the rate calculator can recognize and skip it. A supplied rate of
/// exactly zero is treated as absent.
pub fn flatten_readings(device: &MeetboutEntry, metingen: &[MetingEntry]) -> Vec<MeasurementRow> {
    metingen
        .iter()
        .map(|m| MeasurementRow {
            address: device.address.clone(),
            height_above_nap: round_to(m.height_above_nap, 3),
            device_id: device.device_id().to_string(),
            device_status: device.status.clone(),
            cumulative_subsidence: round_to(m.cumulative_subsidence, 1),
            subsidence: match m.zakking {
                Some(z) => round_to(z, 2),
                None => f64::INFINITY,
            },
            supplied_rate: m
                .supplied_rate
                .filter(|r| *r != 0.0)
                .map(|r| round_to(r, 1)),
            datum: m.datum.clone(),
            date: parse_datum(&m.datum),
            measurement_index: m.measurement_index,
            recent_rate: 0.0,
        })
        .collect()
}

/// Parses a `datum` string into a calendar date.
///
/// Accepts a plain `YYYY-MM-DD` or an ISO timestamp with a trailing time
/// component. Returns `None` on anything else; such rows stay in the
/// table but take the zero-interval branch of the rate calculation.
pub fn parse_datum(datum: &str) -> Option<NaiveDate> {
    let date_part = datum.get(..10).unwrap_or(datum);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Rounds `value` to `decimals` decimal places. Infinities pass through
/// unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// Tests
// ============================================================================
