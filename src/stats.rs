/// Aggregate statistics and notable-year detection over an aligned table.
///
/// Two kinds of output feed the chart:
///
/// 1. **Per-offset aggregates** — min, max, arithmetic mean, and sample
///    standard deviation across the eligible historical years at each
///    relative-day offset. The current year and years below the coverage
///    threshold are excluded so partial data cannot skew the envelope.
///
/// 2. **Notable years** — historical years worth calling out by name.
///    Each eligible year gets two scores: how many offsets it holds the
///    table-wide min or max at, and its largest absolute day-over-day
///    first difference (discrete rate of change). Years ranking in the
///    top N by either score are flagged; ties resolve to the earlier
///    year so output is deterministic.
///
/// The current-year summary (instantaneous rate, window volume) mirrors
/// the figures printed in the chart subtitle.

use std::collections::BTreeMap;

use crate::align::AlignedTable;
use crate::config::AlignmentConfig;

/// Converts cubic feet to acre-feet.
const ACRE_FEET_PER_CUBIC_FOOT: f64 = 2.29568e-5;

/// Seconds in one day; daily mean CFS times this gives cubic feet per day.
const SECONDS_PER_DAY: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Aggregates across eligible historical years at one relative-day offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; 0.0 when fewer than two samples.
    pub std_dev: f64,
    pub sample_count: usize,
}

/// Why a historical year was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotabilityReason {
    RecordMaximum,
    RecordMinimum,
    FastestRise,
    FastestFall,
    /// Flagged by extreme-count rank without holding an outright record.
    FrequentExtremes,
    /// Flagged by derivative rank without holding the fastest rise or fall.
    SharpChange,
}

impl std::fmt::Display for NotabilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotabilityReason::RecordMaximum => write!(f, "record maximum"),
            NotabilityReason::RecordMinimum => write!(f, "record minimum"),
            NotabilityReason::FastestRise => write!(f, "fastest rise"),
            NotabilityReason::FastestFall => write!(f, "fastest fall"),
            NotabilityReason::FrequentExtremes => write!(f, "frequent record extremes"),
            NotabilityReason::SharpChange => write!(f, "sharp day-over-day change"),
        }
    }
}

/// A flagged historical year with every reason it earned, in title order.
#[derive(Debug, Clone, PartialEq)]
pub struct NotableYear {
    pub year: i32,
    pub reasons: Vec<NotabilityReason>,
}

impl NotableYear {
    /// Comma-joined reason list for labels, e.g. "record maximum, fastest rise".
    pub fn reason_label(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Summary figures for the current (partial) year's trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentSummary {
    /// Most recent daily mean in the window, CFS.
    pub latest_value: f64,
    /// Change between the last two observations, CFS per day.
    /// Positive = rising.
    pub rate_cfs_per_day: f64,
    /// Total flow volume over the populated window, acre-feet.
    pub volume_acre_feet: f64,
}

/// Everything the renderer needs beyond the raw aligned table.
#[derive(Debug, Clone, PartialEq)]
pub struct YearStatistics {
    pub per_offset: BTreeMap<i32, OffsetStats>,
    pub notable_years: Vec<NotableYear>,
    pub current: CurrentSummary,
}

// ---------------------------------------------------------------------------
// Statistics computation
// ---------------------------------------------------------------------------

/// Computes per-offset aggregates, notable years, and the current-year
/// summary from an aligned table.
///
/// Deterministic: same table and config always produce identical output.
/// An empty eligible set (every historical year dropped or below the
/// coverage threshold) yields empty aggregates rather than an error —
/// the current-year trace alone is still worth plotting.
pub fn compute_statistics(table: &AlignedTable, alignment: &AlignmentConfig) -> YearStatistics {
    let eligible = table.eligible_years(alignment.coverage_threshold);

    let per_offset = compute_per_offset(table, &eligible);
    let notable_years = detect_notable_years(table, &eligible, &per_offset, alignment.notable_rank_cutoff);
    let current = summarize_current_year(table);

    YearStatistics {
        per_offset,
        notable_years,
        current,
    }
}

fn compute_per_offset(table: &AlignedTable, eligible: &[i32]) -> BTreeMap<i32, OffsetStats> {
    let mut per_offset = BTreeMap::new();

    for offset in table.offsets() {
        let values: Vec<f64> = eligible
            .iter()
            .filter_map(|&year| table.value(year, offset))
            .collect();
        if values.is_empty() {
            continue;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let std_dev = if values.len() < 2 {
            0.0
        } else {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (values.len() - 1) as f64;
            variance.sqrt()
        };

        per_offset.insert(
            offset,
            OffsetStats {
                min,
                max,
                mean,
                std_dev,
                sample_count: values.len(),
            },
        );
    }

    per_offset
}

// ---------------------------------------------------------------------------
// Notability detection
// ---------------------------------------------------------------------------

/// Per-year raw scores feeding the notability ranking.
struct YearScores {
    year: i32,
    /// Offsets at which this year holds the table-wide min or max.
    extreme_count: usize,
    /// Largest positive day-over-day difference, if any.
    max_rise: Option<f64>,
    /// Most negative day-over-day difference, if any.
    max_fall: Option<f64>,
    /// Largest absolute day-over-day difference, if any.
    max_abs_diff: Option<f64>,
}

fn detect_notable_years(
    table: &AlignedTable,
    eligible: &[i32],
    per_offset: &BTreeMap<i32, OffsetStats>,
    rank_cutoff: usize,
) -> Vec<NotableYear> {
    let scores: Vec<YearScores> = eligible
        .iter()
        .map(|&year| score_year(table, year, per_offset))
        .collect();

    // Top-N by extreme count, then top-N by absolute derivative. Sorting is
    // (score desc, year asc) so ties always resolve to the earlier year.
    let mut by_extremes: Vec<&YearScores> =
        scores.iter().filter(|s| s.extreme_count > 0).collect();
    by_extremes.sort_by(|a, b| b.extreme_count.cmp(&a.extreme_count).then(a.year.cmp(&b.year)));
    let top_extremes: Vec<i32> = by_extremes.iter().take(rank_cutoff).map(|s| s.year).collect();

    let mut by_derivative: Vec<&YearScores> =
        scores.iter().filter(|s| s.max_abs_diff.is_some_and(|d| d > 0.0)).collect();
    by_derivative.sort_by(|a, b| {
        let da = a.max_abs_diff.unwrap_or(0.0);
        let db = b.max_abs_diff.unwrap_or(0.0);
        db.partial_cmp(&da)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.year.cmp(&b.year))
    });
    let top_derivative: Vec<i32> = by_derivative.iter().take(rank_cutoff).map(|s| s.year).collect();

    let flagged =
        |year: i32| top_extremes.contains(&year) || top_derivative.contains(&year);

    // Title holders, earliest year winning ties via strict comparison over
    // ascending years.
    let record_max_holder = holder_by(eligible, |year| table_wide_extreme(table, year, per_offset, true), f64::gt);
    let record_min_holder = holder_by(eligible, |year| table_wide_extreme(table, year, per_offset, false), f64::lt);
    let rise_holder = holder_by(
        eligible,
        |year| scores.iter().find(|s| s.year == year).and_then(|s| s.max_rise).filter(|&d| d > 0.0),
        f64::gt,
    );
    let fall_holder = holder_by(
        eligible,
        |year| scores.iter().find(|s| s.year == year).and_then(|s| s.max_fall).filter(|&d| d < 0.0),
        f64::lt,
    );

    // Assemble output: title holders first, in the fixed order, deduplicated
    // by accumulating reasons onto an existing entry.
    let mut notable: Vec<NotableYear> = Vec::new();
    let titles = [
        (record_max_holder, NotabilityReason::RecordMaximum),
        (record_min_holder, NotabilityReason::RecordMinimum),
        (rise_holder, NotabilityReason::FastestRise),
        (fall_holder, NotabilityReason::FastestFall),
    ];
    for (holder, reason) in titles {
        if let Some(year) = holder {
            if flagged(year) {
                push_reason(&mut notable, year, reason);
            }
        }
    }

    // Flagged years that hold no title still get reported, tagged by the
    // score that flagged them, after the title holders.
    for s in &scores {
        if flagged(s.year) && !notable.iter().any(|n| n.year == s.year) {
            let reason = if top_extremes.contains(&s.year) {
                NotabilityReason::FrequentExtremes
            } else {
                NotabilityReason::SharpChange
            };
            push_reason(&mut notable, s.year, reason);
        }
    }

    notable
}

fn score_year(table: &AlignedTable, year: i32, per_offset: &BTreeMap<i32, OffsetStats>) -> YearScores {
    let mut extreme_count = 0;
    for (&offset, stats) in per_offset {
        if let Some(value) = table.value(year, offset) {
            if value == stats.min || value == stats.max {
                extreme_count += 1;
            }
        }
    }

    let mut max_rise: Option<f64> = None;
    let mut max_fall: Option<f64> = None;
    let mut max_abs_diff: Option<f64> = None;
    // Discrete first difference over strictly consecutive offsets; a gap in
    // the data breaks the pair rather than spanning it.
    for offset in table.offsets() {
        let (Some(a), Some(b)) = (table.value(year, offset), table.value(year, offset + 1)) else {
            continue;
        };
        let diff = b - a;
        if diff > 0.0 {
            max_rise = Some(max_rise.map_or(diff, |m| m.max(diff)));
        }
        if diff < 0.0 {
            max_fall = Some(max_fall.map_or(diff, |m| m.min(diff)));
        }
        let abs = diff.abs();
        max_abs_diff = Some(max_abs_diff.map_or(abs, |m| m.max(abs)));
    }

    YearScores {
        year,
        extreme_count,
        max_rise,
        max_fall,
        max_abs_diff,
    }
}

/// The year's single most extreme value across the window, if it has any
/// data at aggregated offsets. `want_max` selects max vs. min; comparing
/// these across years identifies the table-wide record holder.
fn table_wide_extreme(
    table: &AlignedTable,
    year: i32,
    per_offset: &BTreeMap<i32, OffsetStats>,
    want_max: bool,
) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (&offset, _) in per_offset {
        if let Some(value) = table.value(year, offset) {
            best = Some(match best {
                Some(b) if want_max => b.max(value),
                Some(b) => b.min(value),
                None => value,
            });
        }
    }
    best
}

/// Picks the year whose score is strictly better than every earlier one.
/// Iterating in ascending year order with a strict comparison means ties
/// keep the earliest year.
fn holder_by(
    eligible: &[i32],
    score_of: impl Fn(i32) -> Option<f64>,
    better: impl Fn(&f64, &f64) -> bool,
) -> Option<i32> {
    let mut holder: Option<(i32, f64)> = None;
    for &year in eligible {
        if let Some(score) = score_of(year) {
            match holder {
                Some((_, best)) if !better(&score, &best) => {}
                _ => holder = Some((year, score)),
            }
        }
    }
    holder.map(|(year, _)| year)
}

fn push_reason(notable: &mut Vec<NotableYear>, year: i32, reason: NotabilityReason) {
    match notable.iter_mut().find(|n| n.year == year) {
        Some(entry) => {
            if !entry.reasons.contains(&reason) {
                entry.reasons.push(reason);
            }
        }
        None => notable.push(NotableYear { year, reasons: vec![reason] }),
    }
}

// ---------------------------------------------------------------------------
// Current-year summary
// ---------------------------------------------------------------------------

fn summarize_current_year(table: &AlignedTable) -> CurrentSummary {
    let empty = BTreeMap::new();
    let column = table.column(table.current_year).unwrap_or(&empty);

    let points: Vec<(i32, f64)> = column.iter().map(|(&k, &v)| (k, v)).collect();

    let latest_value = points.last().map_or(0.0, |&(_, v)| v);

    // Rate between the last two observations, normalized by the day gap
    // between them. Positive = rising.
    let rate_cfs_per_day = match points.len() {
        0 | 1 => 0.0,
        n => {
            let (k_prev, v_prev) = points[n - 2];
            let (k_last, v_last) = points[n - 1];
            (v_last - v_prev) / (k_last - k_prev) as f64
        }
    };

    CurrentSummary {
        latest_value,
        rate_cfs_per_day,
        volume_acre_feet: window_volume_acre_feet(&points),
    }
}

/// Total flow volume over the populated window, in acre-feet.
///
/// Midpoint Riemann sum: each adjacent pair of daily means contributes
/// the average of the two values times the elapsed seconds between them.
pub fn window_volume_acre_feet(points: &[(i32, f64)]) -> f64 {
    let mut cubic_feet = 0.0;
    for pair in points.windows(2) {
        let (k0, v0) = pair[0];
        let (k1, v1) = pair[1];
        let width_seconds = (k1 - k0) as f64 * SECONDS_PER_DAY;
        let midpoint = v0 + (v1 - v0) / 2.0;
        cubic_feet += width_seconds * midpoint;
    }
    cubic_feet * ACRE_FEET_PER_CUBIC_FOOT
}

/// Least-squares linear fit of value against offset, returning
/// (slope, intercept). `None` with fewer than two points or a degenerate
/// x spread.
pub fn linear_trend(points: &[(i32, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|&(k, _)| k as f64).sum();
    let sum_y: f64 = points.iter().map(|&(_, v)| v).sum();
    let sum_xy: f64 = points.iter().map(|&(k, v)| k as f64 * v).sum();
    let sum_x_sq: f64 = points.iter().map(|&(k, _)| (k as f64).powi(2)).sum();

    let denominator = n * sum_x_sq - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
