/// Data retrieval boundary.
///
/// `TimeSeriesFetcher` is the seam between the core and the upstream
/// water-data provider: the pipeline only ever sees a sensor identifier,
/// a date range, and a list of `Observation`s back. `NwisFetcher` is the
/// production implementation against the USGS NWIS DV API; tests supply
/// synthetic implementations instead.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod usgs;

use chrono::NaiveDate;

use crate::model::{FlowError, Observation, PARAM_DISCHARGE};

/// Fetches daily discharge observations for a sensor over a date range.
pub trait TimeSeriesFetcher {
    /// Returns one observation per calendar day with data, inclusive of
    /// both endpoints. Days the sensor did not report are simply absent.
    ///
    /// # Errors
    /// `FlowError::Http`, `FlowError::Parse`, or `FlowError::NoData`
    /// depending on how the upstream call failed. The fetcher never
    /// retries; recovery policy belongs to the caller.
    fn fetch_daily(
        &self,
        sensor: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, FlowError>;
}

/// Production fetcher backed by the USGS NWIS Daily Values API.
pub struct NwisFetcher {
    client: reqwest::blocking::Client,
}

impl NwisFetcher {
    pub fn new() -> Self {
        NwisFetcher {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for NwisFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSeriesFetcher for NwisFetcher {
    fn fetch_daily(
        &self,
        sensor: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, FlowError> {
        let url = usgs::build_dv_url(sensor, PARAM_DISCHARGE, start, end);
        log::info!("fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| FlowError::Parse(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FlowError::Http(response.status().as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FlowError::Parse(format!("failed to read response body: {}", e)))?;

        usgs::parse_dv_response(&body)
    }
}
