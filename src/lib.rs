//! flowcast: streamflow comparison chart for a USGS monitoring sensor.
//!
//! # Module structure
//!
//! ```text
//! flowcast
//! ├── model   — shared data types (Observation, YearSeries, FlowError)
//! ├── config  — CLI surface and the immutable per-run configuration
//! ├── ingest
//! │   ├── (mod) — TimeSeriesFetcher boundary + NWIS production fetcher
//! │   ├── usgs  — USGS NWIS DV API: URL construction + JSON parsing
//! │   └── fixtures (test only) — representative API response payloads
//! ├── align   — per-year anchor dates and the relative-day aligned table
//! ├── stats   — min/max/mean aggregates and notable-year detection
//! ├── plot    — ForecastPlotter boundary + plotters PNG renderer
//! └── run     — the sequential fetch → align → stats → render pipeline
//! ```

pub mod align;
pub mod config;
pub mod ingest;
pub mod model;
pub mod plot;
pub mod run;
pub mod stats;
