//! Static SVG rendering of a report chart, for use without the chart library.

use anyhow::Result;
use log::{info, warn};
use plotters::prelude::*;
use sensorgraph_schemas::report::{ChartReport, ChartRow};
use std::{ops::Range, path::Path};

/// Draws both series of `report` on a dual-axis line chart and saves it as SVG.
pub fn render_svg<P: AsRef<Path>>(path: P, report: &ChartReport) -> Result<()> {
    let path = path.as_ref();
    if report.is_empty() {
        warn!("[Plotting] No data to plot, skipping {:?}", path);
        return Ok(());
    }

    let rows = &report.rows;
    let [first, second] = &report.columns;
    let first_color = color_for(&first.color);
    let second_color = color_for(&second.color);
    let x_range = 0f64..(rows.len().saturating_sub(1).max(1)) as f64;

    let root = SVGBackend::new(path, (900, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&report.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), padded_range(rows.iter().map(|r| r.1)))?
        .set_secondary_coord(x_range, padded_range(rows.iter().map(|r| r.2)));

    let label_at = |x: &f64| row_label(rows, *x);
    chart
        .configure_mesh()
        .x_labels(6)
        .x_label_formatter(&label_at)
        .x_desc("Date / time")
        .y_desc(first.title())
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(second.title())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().enumerate().map(|(i, r)| (i as f64, r.1)),
            first_color.stroke_width(2),
        ))?
        .label(format!("{} {}", first.sensor_id, first.title()))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], first_color.filled()));

    chart
        .draw_secondary_series(LineSeries::new(
            rows.iter().enumerate().map(|(i, r)| (i as f64, r.2)),
            second_color.stroke_width(2),
        ))?
        .label(format!("{} {}", second.sensor_id, second.title()))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], second_color.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;

    info!("[Plotting] Chart with {} points saved to {:?}", rows.len(), path);
    Ok(())
}

/// Value range with a 5% margin; a flat series gets a unit margin.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}

fn row_label(rows: &[ChartRow], x: f64) -> String {
    if x < 0.0 {
        return String::new();
    }
    rows.get(x.round() as usize)
        .map(|r| r.0.clone())
        .unwrap_or_default()
}

fn color_for(name: &str) -> RGBColor {
    match name {
        "red" => RED,
        "blue" => BLUE,
        "green" => GREEN,
        "magenta" => MAGENTA,
        "cyan" => CYAN,
        _ => BLACK,
    }
}
