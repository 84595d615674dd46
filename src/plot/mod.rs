use anyhow::{Context, Result};
use chrono::Duration;
use plotters::prelude::*;
use std::{fs, path::Path};
use tracing::{info, warn};

use crate::clean::{Metric, TrafficTable};

const PLOT_SIZE: (u32, u32) = (1000, 600);

/// Render the three diagnostic charts into `out_dir`, creating it if absent.
/// Rows missing a value on either axis are skipped.
pub fn render_all(table: &TrafficTable, out_dir: &Path) -> Result<()> {
    if table.is_empty() {
        warn!("no rows to plot, skipping charts");
        return Ok(());
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating graphs directory {}", out_dir.display()))?;

    ivt_trend(table, &out_dir.join("ivt_trend.png"))?;
    scatter(
        table,
        Metric::IdfaUaRatio,
        "Relationship between IDFA-UA Ratio and IVT",
        "IDFA-UA Ratio",
        &out_dir.join("idfa_ua_vs_ivt.png"),
    )?;
    scatter(
        table,
        Metric::RequestsPerIdfa,
        "Requests per IDFA vs IVT",
        "Requests per IDFA",
        &out_dir.join("requests_per_idfa_vs_ivt.png"),
    )?;

    info!(dir = %out_dir.display(), "graphs saved");
    Ok(())
}

fn pad_upper(max: f64) -> f64 {
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

/// IVT over time, line with point markers.
fn ivt_trend(table: &TrafficTable, path: &Path) -> Result<()> {
    let points: Vec<_> = table
        .records()
        .iter()
        .filter_map(|r| r.ivt.map(|v| (r.date, v)))
        .collect();
    if points.is_empty() {
        warn!("no IVT values to plot, skipping {}", path.display());
        return Ok(());
    }

    let first = points.first().map(|p| p.0).unwrap_or_default();
    let mut last = points.last().map(|p| p.0).unwrap_or_default();
    if last <= first {
        last = first + Duration::days(1);
    }
    let y_max = pad_upper(points.iter().map(|p| p.1).fold(f64::MIN, f64::max));

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("IVT Trend Over Time", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(first..last, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("IVT (Invalid Traffic Ratio)")
        .x_label_formatter(&|d| d.to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().cloned(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Scatter of one metric against IVT.
fn scatter(
    table: &TrafficTable,
    x_metric: Metric,
    caption: &str,
    x_desc: &str,
    path: &Path,
) -> Result<()> {
    let points: Vec<(f64, f64)> = table
        .records()
        .iter()
        .filter_map(|r| Some((r.metric(x_metric)?, r.ivt?)))
        .collect();
    if points.is_empty() {
        warn!("no data pairs to plot, skipping {}", path.display());
        return Ok(());
    }

    let x_max = pad_upper(points.iter().map(|p| p.0).fold(f64::MIN, f64::max));
    let y_max = pad_upper(points.iter().map(|p| p.1).fold(f64::MIN, f64::max));

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;
    chart.configure_mesh().x_desc(x_desc).y_desc("IVT").draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
