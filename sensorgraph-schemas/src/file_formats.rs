use crate::reading::Field;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the reports take "now" when computing the lookback cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    /// Wall-clock local time; matches archives written in local time.
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorField {
    pub sensor: String,
    pub field: Field,
}

/// Settings for the single-sensor history report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingleSection {
    pub sensor: String,
    pub fields: [Field; 2],
}

impl Default for SingleSection {
    fn default() -> Self {
        Self {
            sensor: "Deck".to_string(),
            fields: [Field::Temp1, Field::Rh],
        }
    }
}

/// Settings for the two-sensor bucket-merge report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSection {
    pub bin_seconds: i64,
    pub primary: SensorField,
    pub secondary: SensorField,
}

impl Default for MergeSection {
    fn default() -> Self {
        Self {
            bin_seconds: 5 * 60,
            primary: SensorField {
                sensor: "Deck".to_string(),
                field: Field::Temp1,
            },
            secondary: SensorField {
                sensor: "Desk".to_string(),
                field: Field::Press,
            },
        }
    }
}

/// Top-level layout of the YAML configuration file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfigFile {
    pub database: PathBuf,
    pub lookback_hours: u32,
    pub clock: Clock,
    pub site_name: Option<String>,
    pub single: SingleSection,
    pub merge: MergeSection,
}

impl Default for ReportConfigFile {
    fn default() -> Self {
        Self {
            database: PathBuf::from("/var/databases/Weather.db"),
            lookback_hours: 240,
            clock: Clock::default(),
            site_name: None,
            single: SingleSection::default(),
            merge: MergeSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let file: ReportConfigFile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(file, ReportConfigFile::default());
        assert_eq!(file.merge.bin_seconds, 300);
        assert_eq!(file.merge.secondary.sensor, "Desk");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = "
lookback_hours: 48
clock: utc
merge:
  bin_seconds: 600
  secondary: { sensor: Attic, field: rh }
";
        let file: ReportConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.lookback_hours, 48);
        assert_eq!(file.clock, Clock::Utc);
        assert_eq!(file.merge.bin_seconds, 600);
        assert_eq!(file.merge.primary.sensor, "Deck");
        assert_eq!(file.merge.secondary.field, Field::Rh);
        assert_eq!(file.single, SingleSection::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ReportConfigFile, _> = serde_yaml::from_str("bin: 300");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_field_names_are_rejected() {
        let result: Result<ReportConfigFile, _> =
            serde_yaml::from_str("single: { fields: [temp1, humidity] }");
        assert!(result.is_err());
    }
}
