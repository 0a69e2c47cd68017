use crate::config::ReportConfig;
use anyhow::Result;
use log::{info, warn};
use sensorgraph_core::{
    analysis,
    merge,
    store::{format_date_time, ReadingSource},
    units,
};
use sensorgraph_schemas::{
    reading::Field,
    report::{ChartReport, ChartRow, CurrentConditions, SeriesColumn, SeriesSummary},
};

const FIRST_COLOR: &str = "red";
const SECOND_COLOR: &str = "blue";

/// Builds the history chart for a single sensor.
pub fn build_single_report<S: ReadingSource>(source: &S, config: &ReportConfig) -> Result<ChartReport> {
    let sensor = &config.single.sensor;
    let [first, second] = config.single.fields;
    info!("--- [Report] Single-sensor history for '{}' ---", sensor);

    let records = source.records(sensor, config.window.cutoff())?;
    info!("Loaded {} readings from the last {} hours", records.len(), config.window.hours());

    let rows: Vec<ChartRow> = records
        .iter()
        .map(|r| {
            ChartRow(
                format_date_time(r.date_time),
                units::to_display(first, r.value(first)),
                units::to_display(second, r.value(second)),
            )
        })
        .collect();

    let current = analysis::latest_record(&records).map(|r| CurrentConditions {
        at: format_date_time(r.date_time),
        values: [current_value(first, r.value(first)), current_value(second, r.value(second))],
    });

    let report = ChartReport {
        site_name: config.site_name.clone(),
        title: format!("{} {} and {} History", sensor, first.label(), second.label()),
        sensor_id: sensor.clone(),
        lookback_hours: config.window.hours(),
        columns: [column(first, sensor, FIRST_COLOR), column(second, sensor, SECOND_COLOR)],
        summaries: summarize_rows(&rows),
        rows,
        current,
    };
    warn_if_empty(&report);
    Ok(report)
}

/// Builds the chart of two sensors synchronized into time buckets.
pub fn build_merge_report<S: ReadingSource>(source: &S, config: &ReportConfig) -> Result<ChartReport> {
    let (primary, secondary) = (&config.primary, &config.secondary);
    info!(
        "--- [Report] Merging '{}' {} with '{}' {} in {}-second buckets ---",
        primary.sensor,
        primary.field,
        secondary.sensor,
        secondary.field,
        config.bucketing.bin_seconds()
    );

    let cutoff = config.window.cutoff();
    let primary_readings = source.readings(&primary.sensor, primary.field, cutoff)?;
    let secondary_readings = source.readings(&secondary.sensor, secondary.field, cutoff)?;
    info!(
        "Loaded {} primary and {} secondary readings",
        primary_readings.len(),
        secondary_readings.len()
    );

    let merged = merge::merge(&primary_readings, &secondary_readings, &config.bucketing);
    info!("{} buckets hold readings from both sensors", merged.len());

    let rows: Vec<ChartRow> = merged
        .iter()
        .filter_map(|m| {
            let second = m.secondary_value?;
            Some(ChartRow(
                format_date_time(m.timestamp),
                units::to_display(primary.field, m.primary_value),
                units::to_display(secondary.field, second),
            ))
        })
        .collect();

    let current = analysis::latest_merged(&merged).and_then(|m| {
        Some(CurrentConditions {
            at: format_date_time(m.timestamp),
            values: [
                current_value(primary.field, m.primary_value),
                current_value(secondary.field, m.secondary_value?),
            ],
        })
    });

    let report = ChartReport {
        site_name: config.site_name.clone(),
        title: format!(
            "{} {} and {} {} History",
            primary.sensor,
            primary.field.label(),
            secondary.sensor,
            secondary.field.label()
        ),
        sensor_id: primary.sensor.clone(),
        lookback_hours: config.window.hours(),
        columns: [
            column(primary.field, &primary.sensor, FIRST_COLOR),
            column(secondary.field, &secondary.sensor, SECOND_COLOR),
        ],
        summaries: summarize_rows(&rows),
        rows,
        current,
    };
    warn_if_empty(&report);
    Ok(report)
}

/// The value shown in the "current conditions" heading. Temperatures are
/// rounded to one decimal there; chart series keep full precision.
fn current_value(field: Field, value: f64) -> f64 {
    let shown = units::to_display(field, value);
    if field.is_temperature() {
        units::round_half_up(shown, 1)
    } else {
        shown
    }
}

fn column(field: Field, sensor: &str, color: &str) -> SeriesColumn {
    SeriesColumn {
        field,
        sensor_id: sensor.to_string(),
        color: color.to_string(),
    }
}

fn summarize_rows(rows: &[ChartRow]) -> Option<[SeriesSummary; 2]> {
    let first = analysis::summarize(rows.iter().map(|r| r.1))?;
    let second = analysis::summarize(rows.iter().map(|r| r.2))?;
    Some([first, second])
}

fn warn_if_empty(report: &ChartReport) {
    if report.is_empty() {
        warn!(
            "No chart rows for '{}' in the last {} hours",
            report.sensor_id, report.lookback_hours
        );
    }
}
