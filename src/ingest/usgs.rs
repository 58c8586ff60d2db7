/// USGS NWIS Daily Values (DV) API client.
///
/// Handles URL construction and JSON response parsing for the USGS Water
/// Services DV endpoint:
///   https://waterservices.usgs.gov/nwis/dv/
///
/// The DV service returns WaterML rendered as JSON. See `fixtures.rs` for
/// annotated examples of the response structure. Daily values are used
/// rather than instantaneous values because the comparison axis is whole
/// days; one observation per calendar day is exactly the resolution the
/// aligner consumes.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{FlowError, Observation};

// ---------------------------------------------------------------------------
// Serde structures for WaterML JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DvResponse {
    value: ValueWrapper,
}

#[derive(Deserialize)]
struct ValueWrapper {
    #[serde(rename = "timeSeries")]
    time_series: Vec<TimeSeries>,
}

#[derive(Deserialize)]
struct TimeSeries {
    variable: Variable,
    values: Vec<Values>,
}

#[derive(Deserialize)]
struct Variable {
    #[serde(rename = "noDataValue")]
    no_data_value: f64,
}

#[derive(Deserialize)]
struct Values {
    value: Vec<ValueEntry>,
}

#[derive(Deserialize)]
struct ValueEntry {
    value: String, // USGS returns measurements as strings!
    #[serde(rename = "dateTime")]
    date_time: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const DV_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/dv/";

/// Builds a USGS DV API URL for one site, one parameter code, and an
/// inclusive date range. The returned URL always requests JSON format.
///
/// Unlike the IV API which uses ISO 8601 periods, the DV API takes
/// explicit start and end dates in YYYY-MM-DD format.
pub fn build_dv_url(site: &str, param_code: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}?sites={}&parameterCd={}&startDT={}&endDT={}&format=json",
        DV_BASE_URL,
        site,
        param_code,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a USGS DV API JSON response body into a list of daily
/// `Observation`s, one per valid daily value across all `timeSeries`
/// entries.
///
/// # Errors
/// - `FlowError::Parse` — malformed or unexpected JSON structure.
/// - `FlowError::NoData` — no `timeSeries` entries, or all entries had
///   either an empty `value` array or only the USGS sentinel value
///   (`-999999`).
pub fn parse_dv_response(json: &str) -> Result<Vec<Observation>, FlowError> {
    let response: DvResponse = serde_json::from_str(json)
        .map_err(|e| FlowError::Parse(format!("JSON deserialization failed: {}", e)))?;

    if response.value.time_series.is_empty() {
        return Err(FlowError::NoData("No timeSeries entries in response".to_string()));
    }

    let mut observations = Vec::new();

    for series in response.value.time_series {
        let no_data_value = series.variable.no_data_value;

        let values_wrapper = match series.values.first() {
            Some(w) => w,
            None => continue, // skip this series, try others
        };

        for entry in &values_wrapper.value {
            let value: f64 = match entry.value.parse() {
                Ok(v) => v,
                Err(e) => {
                    // Log but don't fail - skip bad values
                    log::warn!("skipping unparseable value '{}': {}", entry.value, e);
                    continue;
                }
            };

            // Skip sentinel values
            if (value - no_data_value).abs() < 0.1 {
                continue;
            }

            let date = parse_dv_date(&entry.date_time)?;

            observations.push(Observation { date, value });
        }
    }

    if observations.is_empty() {
        return Err(FlowError::NoData(
            "All timeSeries entries were empty or contained sentinel values".to_string(),
        ));
    }

    Ok(observations)
}

/// Extracts the calendar date from a DV `dateTime` field.
///
/// DV timestamps look like `"2024-05-01T00:00:00.000"`; only the date
/// portion carries information for daily values.
fn parse_dv_date(date_time: &str) -> Result<NaiveDate, FlowError> {
    if date_time.len() < 10 {
        return Err(FlowError::Parse(format!("dateTime too short: '{}'", date_time)));
    }
    NaiveDate::parse_from_str(&date_time[..10], "%Y-%m-%d")
        .map_err(|e| FlowError::Parse(format!("bad dateTime '{}': {}", date_time, e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
