use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use log::info;
use sensorgraph_core::{
    merge::{MergeConfig, MergeConfigBuilder},
    store,
    window::LookbackWindow,
};
use sensorgraph_schemas::file_formats::{Clock, ReportConfigFile, SensorField, SingleSection};
use std::{fs, path::Path, path::PathBuf};

/// Everything one report run needs, resolved from the file, the command line and the clock.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub database: PathBuf,
    pub site_name: String,
    pub window: LookbackWindow,
    pub single: SingleSection,
    pub primary: SensorField,
    pub secondary: SensorField,
    pub bucketing: MergeConfig,
}

impl ReportConfig {
    /// Validates `file` and anchors the lookback window at `now`.
    pub fn resolve(file: ReportConfigFile, now: NaiveDateTime) -> Result<Self> {
        let window = LookbackWindow::new(now, file.lookback_hours)?;
        let bucketing = MergeConfigBuilder::new()
            .with_bin_seconds(file.merge.bin_seconds)
            .with_window(window)
            .build()?;
        let site_name = file
            .site_name
            .or_else(|| std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
            .unwrap_or_else(|| "localhost".to_string());

        Ok(Self {
            database: file.database,
            site_name,
            window,
            single: file.single,
            primary: file.merge.primary,
            secondary: file.merge.secondary,
            bucketing,
        })
    }
}

/// Loads the YAML configuration file, or the built-in defaults when no file is given.
pub fn load_file(path: Option<&Path>) -> Result<ReportConfigFile> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(ReportConfigFile::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {:?}", path))?;
    let file = from_yaml_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    info!("Loaded configuration from {:?}", path);
    Ok(file)
}

pub fn from_yaml_str(content: &str) -> Result<ReportConfigFile> {
    // An empty document means "all defaults".
    if content.trim().is_empty() {
        return Ok(ReportConfigFile::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn now_for(clock: Clock) -> NaiveDateTime {
    match clock {
        Clock::Local => Local::now().naive_local(),
        Clock::Utc => Utc::now().naive_utc(),
    }
}

pub fn parse_now(text: &str) -> Result<NaiveDateTime> {
    store::parse_date_time(text)
        .with_context(|| format!("Invalid --now value '{}', expected YYYY-MM-DD HH:MM:SS", text))
}
