/// Chart rendering boundary.
///
/// `ForecastPlotter` is the seam between the core and whatever draws the
/// picture: it receives the aligned table, the computed statistics, and a
/// display title, and either produces an artifact or fails. `PngPlotter`
/// is the production implementation on the `plotters` bitmap backend;
/// tests substitute recording implementations to assert on call order.

use std::path::PathBuf;

use plotters::prelude::*;

use crate::align::AlignedTable;
use crate::model::FlowError;
use crate::stats::{linear_trend, YearStatistics};

/// Renders a comparison chart from the aligned table and statistics.
pub trait ForecastPlotter {
    /// # Errors
    /// `FlowError::Render` when the sink fails; no partial artifact is
    /// considered written.
    fn render(
        &self,
        table: &AlignedTable,
        stats: &YearStatistics,
        title: &str,
    ) -> Result<(), FlowError>;
}

/// Production plotter: a PNG written via the `plotters` bitmap backend.
pub struct PngPlotter {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl PngPlotter {
    pub fn new(output_path: PathBuf) -> Self {
        PngPlotter {
            output_path,
            width: 1280,
            height: 760,
        }
    }

    fn render_chart(
        &self,
        table: &AlignedTable,
        stats: &YearStatistics,
        title: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(&self.output_path, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(title, ("sans-serif", 28))?;

        let x_start = *table.offsets().start();
        let x_end = *table.offsets().end();
        let y_max = y_ceiling(table, stats);

        let mut chart = ChartBuilder::on(&root)
            .caption(subtitle(stats), ("sans-serif", 16))
            .margin(20i32)
            .x_label_area_size(40u32)
            .y_label_area_size(60u32)
            .build_cartesian_2d(x_start..x_end, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_labels(10usize)
            .x_desc("Days from anchor date")
            .y_desc("Discharge (ft3/s)")
            .draw()?;

        // Mean +/- one standard deviation band, mirroring the grey
        // fill_between in the historical comparison this replaces.
        let band_points: Vec<(i32, f64)> = stats
            .per_offset
            .iter()
            .map(|(&k, s)| (k, (s.mean + s.std_dev).min(y_max)))
            .chain(
                stats
                    .per_offset
                    .iter()
                    .rev()
                    .map(|(&k, s)| (k, (s.mean - s.std_dev).max(0.0))),
            )
            .collect();
        if band_points.len() >= 3 {
            chart.draw_series(std::iter::once(Polygon::new(
                band_points,
                RGBColor(120, 120, 120).mix(0.2).filled(),
            )))?;
        }

        if !stats.per_offset.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    stats.per_offset.iter().map(|(&k, s)| (k, s.max)),
                    &BLUE,
                ))?
                .label("Historical max")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
            chart
                .draw_series(LineSeries::new(
                    stats.per_offset.iter().map(|(&k, s)| (k, s.min)),
                    &RED,
                ))?
                .label("Historical min")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
            chart
                .draw_series(LineSeries::new(
                    stats.per_offset.iter().map(|(&k, s)| (k, s.mean)),
                    &BLACK,
                ))?
                .label("Historical mean")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
        }

        // Notable historical years, each with its reasons in the legend.
        for (idx, notable) in stats.notable_years.iter().enumerate() {
            let Some(column) = table.column(notable.year) else {
                continue;
            };
            let color = Palette99::pick(idx + 4);
            let label = format!("{} ({})", notable.year, notable.reason_label());
            chart
                .draw_series(LineSeries::new(
                    column.iter().map(|(&k, &v)| (k, v)),
                    &color,
                ))?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(idx + 4))
                });
        }

        // Current year: the highlighted trace.
        if let Some(column) = table.column(table.current_year) {
            let points: Vec<(i32, f64)> = column.iter().map(|(&k, &v)| (k, v)).collect();
            chart
                .draw_series(LineSeries::new(points.iter().copied(), GREEN.stroke_width(2)))?
                .label(format!("{} (current)", table.current_year))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

            // Least-squares projection of the current trace out to the
            // window edge, and a marker at the last observation.
            if let (Some(&(last_k, _)), Some((slope, intercept))) =
                (points.last(), linear_trend(&points))
            {
                if last_k < x_end {
                    let projected = |k: i32| (slope * k as f64 + intercept).clamp(0.0, y_max);
                    chart.draw_series(LineSeries::new(
                        vec![(last_k, projected(last_k)), (x_end, projected(x_end))],
                        GREEN.mix(0.5),
                    ))?;
                }
                chart.draw_series(LineSeries::new(
                    vec![(last_k, 0.0), (last_k, y_max)],
                    RED.mix(0.5),
                ))?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl ForecastPlotter for PngPlotter {
    fn render(
        &self,
        table: &AlignedTable,
        stats: &YearStatistics,
        title: &str,
    ) -> Result<(), FlowError> {
        self.render_chart(table, stats, title)
            .map_err(|e| FlowError::Render(e.to_string()))
    }
}

/// Subtitle mirroring the volume/rate line under the main title:
/// "12,345 acre-feet : rising 40.0 CFS/day".
fn subtitle(stats: &YearStatistics) -> String {
    let current = &stats.current;
    let trend = if current.rate_cfs_per_day > 0.0 {
        "rising"
    } else if current.rate_cfs_per_day < 0.0 {
        "dropping"
    } else {
        "stable at"
    };
    format!(
        "{:.0} acre-feet : {} {:.1} CFS/day",
        current.volume_acre_feet, trend, current.rate_cfs_per_day
    )
}

/// Y axis upper bound: 5% headroom over everything drawn.
fn y_ceiling(table: &AlignedTable, stats: &YearStatistics) -> f64 {
    let mut top = 0f64;
    for (_, s) in stats.per_offset.iter() {
        top = top.max(s.max);
    }
    for year in table.years().collect::<Vec<_>>() {
        if let Some(column) = table.column(year) {
            for (_, &v) in column.iter() {
                top = top.max(v);
            }
        }
    }
    (top * 1.05).max(1.0)
}
