use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use sensorgraph_core::{export::SeriesWriter, store::SqliteStore};
use sensorgraph_schemas::file_formats::ReportConfigFile;
use std::io::Write;
use std::{fs, path::PathBuf};

use crate::config::ReportConfig;

mod config;
mod page;
mod plotting;
mod workflow;

/// Renders weather-sensor history pages from a SQLite archive.
#[derive(Debug, Parser)]
#[command(name = "sensorgraph", version, about)]
struct Cli {
    /// YAML configuration file; built-in defaults are used without one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database holding the SensorData table
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Hours of history to include
    #[arg(long, global = true)]
    hours: Option<u32>,

    /// Pin "now" for the lookback window (YYYY-MM-DD HH:MM:SS)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Write the HTML page here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Also render the chart as SVG
    #[arg(long, global = true)]
    svg: Option<PathBuf>,

    /// Also export the chart rows as CSV
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    report: Report,
}

#[derive(Debug, Subcommand)]
enum Report {
    /// History of one sensor
    Graph {
        #[arg(long)]
        sensor: Option<String>,
    },
    /// Two sensors synchronized into fixed-width time buckets
    Merge {
        /// Sensor providing the first series (temperature by default)
        #[arg(long)]
        primary: Option<String>,
        /// Sensor providing the second series (pressure by default)
        #[arg(long)]
        secondary: Option<String>,
        /// Bucket width in seconds
        #[arg(long, allow_hyphen_values = true)]
        bin_seconds: Option<i64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut file = config::load_file(cli.config.as_deref())?;
    apply_overrides(&mut file, &cli);
    let now = match &cli.now {
        Some(text) => config::parse_now(text)?,
        None => config::now_for(file.clock),
    };
    let config = ReportConfig::resolve(file, now)?;

    // The store is released when this block ends, before anything is written.
    let report = {
        let store = SqliteStore::open(&config.database)
            .with_context(|| format!("Report aborted, archive {:?} is unavailable", config.database))?;
        info!("Reading from '{}'", store.location());
        match cli.report {
            Report::Graph { .. } => workflow::build_single_report(&store, &config)?,
            Report::Merge { .. } => workflow::build_merge_report(&store, &config)?,
        }
    };

    let html = page::render_html(&report)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, &html).with_context(|| format!("Failed to write page: {:?}", path))?;
            info!("Page written to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes()).context("Failed to write page to stdout")?;
            stdout.flush()?;
        }
    }

    if let Some(path) = &cli.svg {
        plotting::render_svg(path, &report)?;
    }
    if let Some(path) = &cli.csv {
        SeriesWriter::create(path)?.write_report(&report)?;
    }

    Ok(())
}

/// Command-line flags take precedence over the configuration file.
fn apply_overrides(file: &mut ReportConfigFile, cli: &Cli) {
    if let Some(database) = &cli.database {
        file.database = database.clone();
    }
    if let Some(hours) = cli.hours {
        file.lookback_hours = hours;
    }
    match &cli.report {
        Report::Graph { sensor } => {
            if let Some(sensor) = sensor {
                file.single.sensor = sensor.clone();
            }
        }
        Report::Merge {
            primary,
            secondary,
            bin_seconds,
        } => {
            if let Some(primary) = primary {
                file.merge.primary.sensor = primary.clone();
            }
            if let Some(secondary) = secondary {
                file.merge.secondary.sensor = secondary.clone();
            }
            if let Some(bin_seconds) = bin_seconds {
                file.merge.bin_seconds = *bin_seconds;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_the_file() {
        let cli = Cli::parse_from([
            "sensorgraph",
            "--database",
            "/tmp/w.db",
            "merge",
            "--secondary",
            "Attic",
            "--bin-seconds",
            "600",
            "--hours",
            "12",
            "--csv",
            "rows.csv",
        ]);
        assert_eq!(cli.csv, Some(PathBuf::from("rows.csv")));
        assert_eq!(cli.svg, None);
        let mut file = ReportConfigFile::default();
        apply_overrides(&mut file, &cli);
        assert_eq!(file.database, PathBuf::from("/tmp/w.db"));
        assert_eq!(file.lookback_hours, 12);
        assert_eq!(file.merge.secondary.sensor, "Attic");
        assert_eq!(file.merge.primary.sensor, "Deck");
        assert_eq!(file.merge.bin_seconds, 600);
    }

    #[test]
    fn graph_sensor_override() {
        let cli = Cli::parse_from(["sensorgraph", "graph", "--sensor", "Office"]);
        let mut file = ReportConfigFile::default();
        apply_overrides(&mut file, &cli);
        assert_eq!(file.single.sensor, "Office");
        assert_eq!(file.merge.bin_seconds, 300);
    }
}
