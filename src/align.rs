/// Multi-year series alignment.
///
/// Re-indexes each year's raw observations onto a shared relative-day
/// axis: offset 0 is that year's own anchor date (same month/day as the
/// requested anchor, leap-adjusted), negative offsets are days before it,
/// positive offsets days after. Because every year gets its own anchor
/// and offsets are computed by calendar arithmetic from there, years of
/// 365 and 366 days line up 1:1 with no drift across the window.
///
/// Cells with no exact-date observation stay missing — streamflow data
/// has sensor gaps, and interpolating across them would invent readings.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::AlignmentConfig;
use crate::model::{FlowError, YearSeries};

// ---------------------------------------------------------------------------
// Anchor computation
// ---------------------------------------------------------------------------

/// Maps the anchor date's month/day into the given year.
///
/// The only month/day that can be invalid in another year is Feb 29;
/// policy is to fall back to Feb 28 so that leap-year anchors still
/// produce a full window in non-leap years.
pub fn anchor_for_year(anchor: NaiveDate, year: i32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day()) {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(year, 2, 28).expect("Feb 28 exists in every year"),
    }
}

// ---------------------------------------------------------------------------
// Aligned table
// ---------------------------------------------------------------------------

/// One column per year, indexed by relative-day offset.
///
/// The offset domain is identical for every year; individual cells may be
/// missing. Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    pub current_year: i32,
    pub window_before: u32,
    pub window_after: u32,
    columns: BTreeMap<i32, BTreeMap<i32, f64>>,
}

impl AlignedTable {
    /// The shared relative-day axis, inclusive at both ends.
    pub fn offsets(&self) -> RangeInclusive<i32> {
        -(self.window_before as i32)..=(self.window_after as i32)
    }

    /// Number of day slots in the window, anchor day included.
    pub fn window_len(&self) -> usize {
        (self.window_before + self.window_after + 1) as usize
    }

    /// All years present in the table, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.columns.keys().copied()
    }

    /// Years other than the current year, ascending.
    pub fn historical_years(&self) -> impl Iterator<Item = i32> + '_ {
        let current = self.current_year;
        self.years().filter(move |&y| y != current)
    }

    /// The value for (year, offset), if that cell is populated.
    pub fn value(&self, year: i32, offset: i32) -> Option<f64> {
        self.columns.get(&year).and_then(|col| col.get(&offset).copied())
    }

    /// One year's populated cells in offset order.
    pub fn column(&self, year: i32) -> Option<&BTreeMap<i32, f64>> {
        self.columns.get(&year)
    }

    /// Fraction of the window this year has data for, in [0, 1].
    pub fn coverage(&self, year: i32) -> f64 {
        match self.columns.get(&year) {
            Some(col) => col.len() as f64 / self.window_len() as f64,
            None => 0.0,
        }
    }

    /// Historical years meeting the coverage threshold — the years that
    /// count toward aggregate statistics. Low-coverage years stay in the
    /// table for display but are excluded here.
    pub fn eligible_years(&self, coverage_threshold: f64) -> Vec<i32> {
        self.historical_years()
            .filter(|&y| self.coverage(y) >= coverage_threshold)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Aligns a set of per-year series onto the common relative-day axis.
///
/// Each input year contributes one column; a year whose observations all
/// fall outside the window still gets an (empty) column. Duplicate
/// observations for the same calendar date keep the last one seen.
///
/// # Errors
/// `FlowError::DataGap` when the current year (`anchor.year()`) has no
/// observations inside the window — the comparison is meaningless
/// without at least a partial current-year trace.
pub fn align_series(
    anchor: NaiveDate,
    alignment: &AlignmentConfig,
    series: Vec<YearSeries>,
) -> Result<AlignedTable, FlowError> {
    let current_year = anchor.year();
    let mut columns: BTreeMap<i32, BTreeMap<i32, f64>> = BTreeMap::new();

    for year_series in series {
        let year = year_series.year;
        let year_anchor = anchor_for_year(anchor, year);

        let by_date: BTreeMap<NaiveDate, f64> = year_series
            .observations
            .into_iter()
            .map(|obs| (obs.date, obs.value))
            .collect();

        let mut column = BTreeMap::new();
        for offset in -(alignment.window_before as i32)..=(alignment.window_after as i32) {
            let date = year_anchor + Duration::days(offset as i64);
            if let Some(&value) = by_date.get(&date) {
                column.insert(offset, value);
            }
        }

        columns.insert(year, column);
    }

    let current_populated = columns.get(&current_year).is_some_and(|col| !col.is_empty());
    if !current_populated {
        return Err(FlowError::DataGap(format!(
            "current year {} has no observations in the comparison window",
            current_year
        )));
    }

    Ok(AlignedTable {
        current_year,
        window_before: alignment.window_before,
        window_after: alignment.window_after,
        columns,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
