/// The comparison pipeline: fetch, align, aggregate, render.
///
/// Ten sequential fetches (current year plus nine prior), one per year's
/// own window. Fetch failures for historical years are demoted to
/// warnings and the year is dropped; a current-year failure, a
/// current-year data gap, and a render failure are the only fatal paths.

use chrono::{Datelike, Duration};

use crate::align::{align_series, anchor_for_year, AlignedTable};
use crate::config::RunConfig;
use crate::ingest::TimeSeriesFetcher;
use crate::model::{FlowError, YearSeries};
use crate::plot::ForecastPlotter;
use crate::stats::{compute_statistics, YearStatistics};

/// What a run did, for the caller's closing summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub years_fetched: Vec<i32>,
    pub years_dropped: Vec<i32>,
    pub low_coverage_years: Vec<i32>,
    pub notable_years: Vec<(i32, String)>,
    pub output: std::path::PathBuf,
}

/// Executes one comparison run end to end.
///
/// # Errors
/// - `FlowError::Http` / `Parse` / `NoData` when the current year's fetch
///   fails (historical years are dropped with a warning instead).
/// - `FlowError::DataGap` when the current year has no data in the window.
/// - `FlowError::Render` when the plotting sink fails.
pub fn run(
    config: &RunConfig,
    fetcher: &dyn TimeSeriesFetcher,
    plotter: &dyn ForecastPlotter,
) -> Result<RunReport, FlowError> {
    let series = fetch_all_years(config, fetcher)?;
    let years_fetched: Vec<i32> = series.iter().map(|s| s.year).collect();

    let table = align_series(config.anchor, &config.alignment, series)?;
    let stats = compute_statistics(&table, &config.alignment);

    let low_coverage_years = warn_low_coverage(&table, config);

    let title = format!("{} ({})", config.river_name, config.sensor);
    plotter.render(&table, &stats, &title)?;

    let current_year = config.anchor.year();
    let all_years: Vec<i32> = (0..=config.alignment.history_years)
        .map(|i| current_year - i as i32)
        .collect();
    let years_dropped = all_years
        .into_iter()
        .filter(|y| !years_fetched.contains(y))
        .collect();

    Ok(RunReport {
        years_fetched,
        years_dropped,
        low_coverage_years,
        notable_years: notable_summary(&stats),
        output: config.output.clone(),
    })
}

/// Fetches the comparison window for each year, current year first.
///
/// The current year is fetched only up to the anchor date (the rest of
/// its window is the future); historical years get the full window. A
/// historical failure drops that year; a current-year failure is fatal.
fn fetch_all_years(
    config: &RunConfig,
    fetcher: &dyn TimeSeriesFetcher,
) -> Result<Vec<YearSeries>, FlowError> {
    let current_year = config.anchor.year();
    let alignment = &config.alignment;
    let mut series = Vec::new();

    for i in 0..=alignment.history_years {
        let year = current_year - i as i32;
        let year_anchor = anchor_for_year(config.anchor, year);
        let start = year_anchor - Duration::days(alignment.window_before as i64);
        let end = if year == current_year {
            year_anchor
        } else {
            year_anchor + Duration::days(alignment.window_after as i64)
        };

        match fetcher.fetch_daily(&config.sensor, start, end) {
            Ok(observations) => {
                log::info!("year {}: {} observations", year, observations.len());
                series.push(YearSeries::new(year, observations));
            }
            Err(err) if year == current_year => {
                // Cannot compare against a current year we don't have.
                return Err(err);
            }
            Err(err) => {
                log::warn!("dropping year {}: {}", year, err);
            }
        }
    }

    Ok(series)
}

fn warn_low_coverage(table: &AlignedTable, config: &RunConfig) -> Vec<i32> {
    let threshold = config.alignment.coverage_threshold;
    let mut low = Vec::new();
    for year in table.historical_years() {
        let coverage = table.coverage(year);
        if coverage < threshold {
            log::warn!(
                "year {} covers only {:.0}% of the window (threshold {:.0}%); \
                 plotted but excluded from aggregate statistics",
                year,
                coverage * 100.0,
                threshold * 100.0
            );
            low.push(year);
        }
    }
    low
}

fn notable_summary(stats: &YearStatistics) -> Vec<(i32, String)> {
    stats
        .notable_years
        .iter()
        .map(|n| (n.year, n.reason_label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlignmentConfig, RunConfig};
    use crate::model::Observation;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Fetcher that replays canned per-year results and records the ranges
    /// it was asked for.
    struct CannedFetcher {
        results: Vec<(i32, Result<Vec<Observation>, FlowError>)>,
        calls: RefCell<Vec<(NaiveDate, NaiveDate)>>,
    }

    impl TimeSeriesFetcher for CannedFetcher {
        fn fetch_daily(
            &self,
            _sensor: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<Observation>, FlowError> {
            self.calls.borrow_mut().push((start, end));
            let year = start.year();
            // Windows never span a year boundary in these tests.
            for (y, result) in &self.results {
                if *y == year {
                    return match result {
                        Ok(obs) => Ok(obs.clone()),
                        Err(FlowError::Http(code)) => Err(FlowError::Http(*code)),
                        Err(_) => Err(FlowError::NoData("canned".to_string())),
                    };
                }
            }
            Err(FlowError::NoData(format!("no canned data for {}", year)))
        }
    }

    struct CountingPlotter {
        calls: RefCell<usize>,
    }

    impl ForecastPlotter for CountingPlotter {
        fn render(
            &self,
            _table: &AlignedTable,
            _stats: &YearStatistics,
            _title: &str,
        ) -> Result<(), FlowError> {
            *self.calls.borrow_mut() += 1;
            Ok(())
        }
    }

    fn config_for(anchor: NaiveDate, history_years: u32) -> RunConfig {
        RunConfig {
            river_name: "Test River".to_string(),
            sensor: "11527000".to_string(),
            anchor,
            output: "out.png".into(),
            alignment: AlignmentConfig {
                window_before: 3,
                window_after: 2,
                history_years,
                ..AlignmentConfig::default()
            },
        }
    }

    fn days(year: i32, month: u32, first_day: u32, count: u32, value: f64) -> Vec<Observation> {
        (0..count)
            .map(|i| Observation {
                date: NaiveDate::from_ymd_opt(year, month, first_day + i).unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn test_current_year_window_stops_at_anchor() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let config = config_for(anchor, 1);
        let fetcher = CannedFetcher {
            results: vec![
                (2024, Ok(days(2024, 6, 12, 4, 100.0))),
                (2023, Ok(days(2023, 6, 12, 6, 200.0))),
            ],
            calls: RefCell::new(Vec::new()),
        };
        let plotter = CountingPlotter { calls: RefCell::new(0) };

        run(&config, &fetcher, &plotter).expect("run should succeed");

        let calls = fetcher.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            (
                NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
                anchor
            ),
            "current-year fetch must not extend past the anchor"
        );
        assert_eq!(
            calls[1],
            (
                NaiveDate::from_ymd_opt(2023, 6, 12).unwrap(),
                NaiveDate::from_ymd_opt(2023, 6, 17).unwrap()
            ),
            "historical fetch covers the full window"
        );
    }

    #[test]
    fn test_historical_failure_drops_year_and_continues() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let config = config_for(anchor, 2);
        let fetcher = CannedFetcher {
            results: vec![
                (2024, Ok(days(2024, 6, 12, 4, 100.0))),
                (2023, Err(FlowError::Http(503))),
                (2022, Ok(days(2022, 6, 12, 6, 200.0))),
            ],
            calls: RefCell::new(Vec::new()),
        };
        let plotter = CountingPlotter { calls: RefCell::new(0) };

        let report = run(&config, &fetcher, &plotter).expect("historical failure is non-fatal");
        assert_eq!(report.years_dropped, vec![2023]);
        assert_eq!(report.years_fetched, vec![2024, 2022]);
        assert_eq!(*plotter.calls.borrow(), 1, "render should still happen");
    }

    #[test]
    fn test_current_year_fetch_failure_is_fatal_and_skips_render() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let config = config_for(anchor, 1);
        let fetcher = CannedFetcher {
            results: vec![
                (2024, Err(FlowError::Http(500))),
                (2023, Ok(days(2023, 6, 12, 6, 200.0))),
            ],
            calls: RefCell::new(Vec::new()),
        };
        let plotter = CountingPlotter { calls: RefCell::new(0) };

        let result = run(&config, &fetcher, &plotter);
        assert!(matches!(result, Err(FlowError::Http(500))));
        assert_eq!(*plotter.calls.borrow(), 0, "no render call on the fatal path");
    }

    #[test]
    fn test_low_coverage_years_reported() {
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let config = config_for(anchor, 1);
        let fetcher = CannedFetcher {
            results: vec![
                (2024, Ok(days(2024, 6, 12, 4, 100.0))),
                // One day out of a six-day window: below the 50% threshold.
                (2023, Ok(days(2023, 6, 15, 1, 200.0))),
            ],
            calls: RefCell::new(Vec::new()),
        };
        let plotter = CountingPlotter { calls: RefCell::new(0) };

        let report = run(&config, &fetcher, &plotter).expect("low coverage is non-fatal");
        assert_eq!(report.low_coverage_years, vec![2023]);
        assert!(report.years_dropped.is_empty());
    }
}
