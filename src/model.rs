/// Core data types for the streamflow comparison tool.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond chrono —
/// only types.

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Parameter codes
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

/// Unit code reported by USGS for discharge values.
pub const UNIT_DISCHARGE: &str = "ft3/s";

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single daily mean discharge measurement from a USGS gauge station.
///
/// Corresponds to one entry in the `values[].value[]` array of a USGS
/// DV API response. The value is always discharge in ft³/s; the tool
/// queries a single parameter for a single site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// All observations fetched for one calendar year's comparison window.
///
/// Produced by the fetch step and consumed (by value) by the aligner.
/// The year identifies which anchor date the observations were fetched
/// around; the observations themselves carry full calendar dates.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    pub year: i32,
    pub observations: Vec<Observation>,
}

impl YearSeries {
    pub fn new(year: i32, observations: Vec<Observation>) -> Self {
        YearSeries { year, observations }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while configuring, fetching, aligning, or
/// rendering a comparison run.
#[derive(Debug, PartialEq)]
pub enum FlowError {
    /// Malformed anchor date or sensor identifier supplied at the boundary.
    /// Always fatal, and always raised before any network activity.
    Config(String),
    /// Non-2xx HTTP response from the USGS API.
    Http(u16),
    /// The response body could not be deserialized.
    Parse(String),
    /// The requested site contained no usable data values
    /// (empty array or sentinel -999999).
    NoData(String),
    /// The current year has zero observations in the comparison window.
    /// Fatal: the run cannot proceed to plotting without it.
    DataGap(String),
    /// The plotting sink failed to produce output.
    Render(String),
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FlowError::Http(code) => write!(f, "HTTP error: {}", code),
            FlowError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FlowError::NoData(msg) => write!(f, "No data available: {}", msg),
            FlowError::DataGap(msg) => write!(f, "Data gap: {}", msg),
            FlowError::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for FlowError {}
