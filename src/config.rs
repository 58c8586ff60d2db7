/// Command-line configuration for a comparison run.
///
/// Everything the core needs is collected into an immutable `RunConfig`
/// built once at startup and passed explicitly into the pipeline — the
/// defaults below are the only place the Trinity River sensor is named.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::model::FlowError;

/// Default river display name (plot title only; does not affect data).
pub const DEFAULT_RIVER_NAME: &str = "Trinity River at Burnt Range Gorge";

/// Default USGS sensor number (Burnt Range Gorge).
pub const DEFAULT_SENSOR: &str = "11527000";

/// Streamflow comparison chart: current year vs. the past nine years.
#[derive(Parser, Debug)]
#[command(name = "flowcast", version, about = "Plots current-year streamflow against the historical range for a USGS sensor")]
pub struct Cli {
    /// Name of the desired river (plot title)
    #[arg(short = 'n', long = "name", default_value = DEFAULT_RIVER_NAME)]
    pub name: String,

    /// USGS sensor number to access
    #[arg(short = 's', long = "sensor", default_value = DEFAULT_SENSOR)]
    pub sensor: String,

    /// Anchor date to view, YYYY-MM-DD (defaults to today)
    #[arg(short = 'd', long = "date")]
    pub date: Option<String>,

    /// Output path for the rendered chart
    #[arg(short = 'o', long = "output", default_value = "streamflow.png")]
    pub output: PathBuf,
}

/// Tunables for alignment and notability detection.
///
/// The notability scoring thresholds are deliberately configuration rather
/// than constants; the rank cutoff and coverage threshold are policy, not
/// physics.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentConfig {
    /// Days before the anchor date included in the window.
    pub window_before: u32,
    /// Days after the anchor date included in the window.
    pub window_after: u32,
    /// Minimum fraction of the window a year must populate to count
    /// toward aggregate statistics.
    pub coverage_threshold: f64,
    /// A year ranking within the top N by either notability score is
    /// flagged as notable.
    pub notable_rank_cutoff: usize,
    /// Number of prior years fetched in addition to the current year.
    pub history_years: u32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        AlignmentConfig {
            window_before: 30,
            window_after: 7,
            coverage_threshold: 0.5,
            notable_rank_cutoff: 2,
            history_years: 9,
        }
    }
}

impl AlignmentConfig {
    /// Total number of day slots in the window, anchor day included.
    pub fn window_len(&self) -> usize {
        (self.window_before + self.window_after + 1) as usize
    }
}

/// Immutable configuration for one comparison run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub river_name: String,
    pub sensor: String,
    pub anchor: NaiveDate,
    pub output: PathBuf,
    pub alignment: AlignmentConfig,
}

impl RunConfig {
    /// Validates CLI input and builds the run configuration.
    ///
    /// `today` is passed in rather than read from the clock so that the
    /// default-date path is testable.
    ///
    /// # Errors
    /// `FlowError::Config` for a malformed anchor date or a sensor
    /// identifier that is not a USGS site number.
    pub fn from_cli(cli: Cli, today: NaiveDate) -> Result<Self, FlowError> {
        let anchor = match &cli.date {
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
                FlowError::Config(format!("invalid anchor date '{}': {} (expected YYYY-MM-DD)", text, e))
            })?,
            None => today,
        };

        validate_sensor(&cli.sensor)?;

        Ok(RunConfig {
            river_name: cli.name,
            sensor: cli.sensor,
            anchor,
            output: cli.output,
            alignment: AlignmentConfig::default(),
        })
    }
}

/// Checks that a sensor identifier looks like a USGS site number:
/// 8 to 15 decimal digits.
pub fn validate_sensor(sensor: &str) -> Result<(), FlowError> {
    let digits_only = !sensor.is_empty() && sensor.chars().all(|c| c.is_ascii_digit());
    if !digits_only || sensor.len() < 8 || sensor.len() > 15 {
        return Err(FlowError::Config(format!(
            "invalid sensor identifier '{}': expected 8-15 digit USGS site number",
            sensor
        )));
    }
    Ok(())
}
