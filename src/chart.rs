//! Bar-chart rendering for publication counts.
//!
//! One renderer covers every chart the pipeline produces: rows are counted
//! per group value (Year or Source) and drawn as a bar chart with
//! fine-granularity horizontal grid lines. Charts are purely observational
//! output; nothing downstream consumes them.

use std::path::Path;

use itertools::Itertools;
use plotters::prelude::*;
use tracing::info;

use crate::Record;
use crate::error::PipelineError;

const CHART_SIZE: (u32, u32) = (1024, 600);

/// Count records per publication year, ascending, with records lacking a
/// parseable year bucketed under "unknown" at the end.
pub fn count_by_year(records: &[Record]) -> Vec<(String, u32)> {
    let counts = records.iter().map(|r| r.year).counts();
    let mut years: Vec<Option<i32>> = counts.keys().copied().collect();
    years.sort_by_key(|y| (y.is_none(), *y));

    years
        .into_iter()
        .map(|year| {
            let label = year.map_or_else(|| "unknown".to_string(), |y| y.to_string());
            (label, counts[&year] as u32)
        })
        .collect()
}

/// Count records per source label, in encounter order.
pub fn count_by_source(records: &[Record]) -> Vec<(String, u32)> {
    let counts = records.iter().map(|r| r.source.as_str()).counts();
    records
        .iter()
        .map(|r| r.source.as_str())
        .unique()
        .map(|source| (source.to_string(), counts[source] as u32))
        .collect()
}

/// Render a bar chart of `bars` (label, count) to a PNG at `path`,
/// overwriting any existing file.
///
/// An empty `bars` slice produces a blank chart area rather than an error,
/// so a source with zero rows never aborts the run.
pub fn render_bar_chart(
    path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, u32)],
) -> Result<(), PipelineError> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    if bars.is_empty() {
        root.present().map_err(|e| chart_error(path, e))?;
        info!(path = %path.display(), "rendered empty chart (no rows)");
        return Ok(());
    }

    let max_count = bars.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let y_max = max_count + (max_count / 10).max(1);
    let n = bars.len() as i32;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(56)
        .y_label_area_size(56)
        .build_cartesian_2d((0..n).into_segmented(), 0u32..y_max)
        .map_err(|e| chart_error(path, e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_max_light_lines(5)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(bars.len())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()
        .map_err(|e| chart_error(path, e))?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, count))| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0u32),
                    (SegmentValue::Exact(i + 1), *count),
                ],
                BLUE.mix(0.6).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(|e| chart_error(path, e))?;

    root.present().map_err(|e| chart_error(path, e))?;
    info!(path = %path.display(), bars = bars.len(), "rendered bar chart");
    Ok(())
}

fn chart_error(path: &Path, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Chart {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
