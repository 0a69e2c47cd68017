//! Renders a [`ChartReport`] as a self-contained Google Charts HTML page.

use anyhow::Result;
use sensorgraph_schemas::report::{ChartReport, SeriesColumn, SeriesSummary};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;

const CHART_LOADER: &str = "https://www.gstatic.com/charts/loader.js";

/// Builds the whole page in memory; nothing is written until it is complete.
pub fn render_html(report: &ChartReport) -> Result<String> {
    let [first, second] = &report.columns;
    let options = json!({
        "title": report.title,
        "series": {
            "0": { "targetAxisIndex": 0, "color": first.color },
            "1": { "targetAxisIndex": 1, "color": second.color },
        },
        "vAxes": {
            "0": { "title": first.title() },
            "1": { "title": second.title() },
        },
    });

    let mut page = String::new();
    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html>")?;
    writeln!(page, "<head>")?;
    writeln!(page, "  <meta charset=\"utf-8\">")?;
    writeln!(page, "  <title>{}</title>", escape_html(&report.title))?;
    writeln!(page, "  <script type=\"text/javascript\" src=\"{}\"></script>", CHART_LOADER)?;
    writeln!(page, "  <script type=\"text/javascript\">")?;
    writeln!(page, "    google.charts.load(\"current\", {{packages: [\"corechart\"]}});")?;
    writeln!(page, "    google.charts.setOnLoadCallback(drawChart);")?;
    writeln!(page, "    function drawChart() {{")?;
    writeln!(page, "      var data = new google.visualization.DataTable();")?;
    writeln!(page, "      data.addColumn(\"string\", \"DateTime\");")?;
    writeln!(page, "      data.addColumn(\"number\", {});", script_json(&first.title())?)?;
    writeln!(page, "      data.addColumn(\"number\", {});", script_json(&second.title())?)?;
    writeln!(page, "      data.addRows({});", script_json(&report.rows)?)?;
    writeln!(page, "      var options = {};", script_json(&options)?)?;
    writeln!(
        page,
        "      var chart = new google.visualization.LineChart(document.getElementById(\"chart_div\"));"
    )?;
    writeln!(page, "      chart.draw(data, options);")?;
    writeln!(page, "    }}")?;
    writeln!(page, "  </script>")?;
    writeln!(page, "</head>")?;
    writeln!(page, "<body style=\"font-family:Arial\">")?;
    writeln!(page, "<center>")?;
    writeln!(
        page,
        "<h1>The {} Meteorological Data Web Site</h1>",
        escape_html(&report.site_name)
    )?;
    page.push_str(&current_conditions(report));
    writeln!(page, "<div id=\"chart_div\" style=\"width: 900px; height: 500px;\"></div>")?;
    if let Some(summaries) = &report.summaries {
        page.push_str(&summary_table(&report.columns, summaries, report.lookback_hours));
    }
    writeln!(page, "</center>")?;
    writeln!(page, "</body>")?;
    writeln!(page, "</html>")?;
    Ok(page)
}

fn current_conditions(report: &ChartReport) -> String {
    let Some(current) = &report.current else {
        return format!(
            "<h2>No readings for sensor '{}' in the last {} hours</h2>\n",
            escape_html(&report.sensor_id),
            report.lookback_hours
        );
    };
    let [first, second] = &report.columns;
    format!(
        "<h2>Current conditions at {} for sensor '{}'<br>\n\
         <span style=\"color:{}\">{}: {}{}</span> and \
         <span style=\"color:{}\">{} = {}{}</span></h2>\n",
        escape_html(&current.at),
        escape_html(&report.sensor_id),
        escape_html(&first.color),
        first.field.label(),
        format_value(first, current.values[0]),
        first.field.display_unit(),
        escape_html(&second.color),
        second.field.label(),
        format_value(second, current.values[1]),
        second.field.display_unit(),
    )
}

fn summary_table(columns: &[SeriesColumn; 2], summaries: &[SeriesSummary; 2], hours: u32) -> String {
    let mut table = format!(
        "<table border=\"1\" cellpadding=\"4\" style=\"border-collapse:collapse\">\n\
         <caption>Last {} hours</caption>\n\
         <tr><th>Series</th><th>Min</th><th>Max</th><th>Mean</th><th>Readings</th></tr>\n",
        hours
    );
    for (column, summary) in columns.iter().zip(summaries) {
        table.push_str(&format!(
            "<tr><td>{} {}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td><td>{}</td></tr>\n",
            escape_html(&column.sensor_id),
            escape_html(&column.title()),
            summary.min,
            summary.max,
            summary.mean,
            summary.count
        ));
    }
    table.push_str("</table>\n");
    table
}

/// Temperatures are shown with one decimal; other values as stored.
fn format_value(column: &SeriesColumn, value: f64) -> String {
    if column.field.is_temperature() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// JSON for embedding inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
