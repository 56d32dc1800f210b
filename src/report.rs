//! Chart Rendering and Tabular Output
//!
//! Renders the two aggregate results as PNG bar charts with plotters. Labels
//! come straight from the group keys; values are read from whatever numeric
//! dtype the aggregate produced.

use crate::aggregate::COUNT_COLUMN;
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use polars::prelude::*;
use std::fs;
use std::path::Path;

/// Bar fill opacity shared by both charts
const BAR_OPACITY: f64 = 0.6;

/// Render the conservation-status aggregate as a bar chart
///
/// x = status label, y = distinct species count.
pub fn render_conservation_chart(conservation_counts: &DataFrame, out_path: &Path) -> Result<()> {
    let (labels, values) = labeled_counts(conservation_counts, "conservation_status", COUNT_COLUMN)?;
    render_bar_chart(
        out_path,
        "Conservation Status by Species",
        "conservation status",
        "number of species",
        (1000, 400),
        &labels,
        &values,
    )
}

/// Render the per-park sheep observation sums as a bar chart
///
/// x = park name, y = summed weekly observations. Wider canvas because park
/// names run long.
pub fn render_observation_chart(observations_by_park: &DataFrame, out_path: &Path) -> Result<()> {
    let (labels, values) = labeled_counts(observations_by_park, "park_name", "observations")?;
    render_bar_chart(
        out_path,
        "Observations of Sheep per Week",
        "park",
        "number of observations",
        (1600, 400),
        &labels,
        &values,
    )
}

/// Pull (label, value) pairs out of a two-column aggregate
///
/// The value column is cast to f64 so u32 distinct counts and i64 sums both
/// chart through the same path.
pub fn labeled_counts(
    df: &DataFrame,
    label_column: &str,
    value_column: &str,
) -> Result<(Vec<String>, Vec<f64>)> {
    let labels: Vec<String> = df
        .column(label_column)?
        .str()?
        .into_iter()
        .map(|label| label.unwrap_or("").to_string())
        .collect();

    let values: Vec<f64> = df
        .column(value_column)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect();

    Ok((labels, values))
}

fn render_bar_chart(
    out_path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    dimensions: (u32, u32),
    labels: &[String],
    values: &[f64],
) -> Result<()> {
    if labels.is_empty() {
        tracing::warn!(chart = caption, "nothing to chart; skipping");
        return Ok(());
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let y_max = values.iter().fold(0.0f64, |acc, v| acc.max(*v)).max(1.0);

    let root = BitMapBackend::new(out_path, dimensions).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..labels.len()).into_segmented(), 0.0f64..(y_max * 1.1))
        .map_err(|e| anyhow!("failed to build chart {:?}: {e}", out_path))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(idx) if *idx < labels.len() => labels[*idx].clone(),
            _ => String::new(),
        })
        .draw()
        .map_err(|e| anyhow!("failed to draw chart mesh: {e}"))?;

    chart
        .draw_series(values.iter().enumerate().map(|(idx, value)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(idx), 0.0),
                    (SegmentValue::Exact(idx + 1), *value),
                ],
                BLUE.mix(BAR_OPACITY).filled(),
            )
        }))
        .map_err(|e| anyhow!("failed to draw bars: {e}"))?;

    root.present()
        .map_err(|e| anyhow!("failed to write chart {:?}: {e}", out_path))?;

    tracing::info!(path = ?out_path, "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_labeled_counts_from_distinct_count_aggregate() {
        let df = df!(
            "conservation_status" => ["Endangered", "In Recovery"],
            COUNT_COLUMN => [16u32, 4],
        )
        .unwrap();

        let (labels, values) = labeled_counts(&df, "conservation_status", COUNT_COLUMN).unwrap();
        assert_eq!(labels, ["Endangered", "In Recovery"]);
        assert_relative_eq!(values[0], 16.0);
        assert_relative_eq!(values[1], 4.0);
    }

    #[test]
    fn test_labeled_counts_from_summed_aggregate() {
        let df = df!(
            "park_name" => ["Bryce National Park", "Yellowstone National Park"],
            "observations" => [250i64, 507],
        )
        .unwrap();

        let (labels, values) = labeled_counts(&df, "park_name", "observations").unwrap();
        assert_eq!(labels.len(), 2);
        assert_relative_eq!(values[0], 250.0);
        assert_relative_eq!(values[1], 507.0);
    }

    #[test]
    fn test_labeled_counts_missing_column_is_error() {
        let df = df!("park_name" => ["Bryce National Park"]).unwrap();
        assert!(labeled_counts(&df, "park_name", "observations").is_err());
    }
}
