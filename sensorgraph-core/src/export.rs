use crate::error::SensorgraphError;
use csv::{Writer, WriterBuilder};
use log::info;
use sensorgraph_schemas::report::ChartReport;
use serde::Serialize;
use std::{io, path::Path};

#[derive(Debug, Serialize)]
struct ExportEntry<'a> {
    date_time: &'a str,
    first: f64,
    second: f64,
}

/// Writes the rows of a chart as CSV, one line per chart row.
pub struct SeriesWriter<W: io::Write> {
    writer: Writer<W>,
    target: String,
}

impl SeriesWriter<std::fs::File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SensorgraphError> {
        let target = path.as_ref().display().to_string();
        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path.as_ref())
            .map_err(|e| SensorgraphError::CsvError(target.clone(), e))?;
        Ok(Self { writer, target })
    }
}

impl<W: io::Write> SeriesWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
            target: "<writer>".to_string(),
        }
    }

    /// Writes a header naming both series, then every row of `report`.
    pub fn write_report(&mut self, report: &ChartReport) -> Result<(), SensorgraphError> {
        let [first, second] = &report.columns;
        let first_header = format!("{} {}", first.sensor_id, first.title());
        let second_header = format!("{} {}", second.sensor_id, second.title());
        self.writer
            .write_record(["date_time", first_header.as_str(), second_header.as_str()])
            .map_err(|e| self.csv_err(e))?;

        for row in &report.rows {
            let entry = ExportEntry {
                date_time: &row.0,
                first: row.1,
                second: row.2,
            };
            self.writer.serialize(entry).map_err(|e| self.csv_err(e))?;
        }
        self.writer
            .flush()
            .map_err(|e| SensorgraphError::FileIO(self.target.clone(), e))?;
        info!("Exported {} rows to '{}'", report.rows.len(), self.target);
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, SensorgraphError> {
        let target = self.target;
        self.writer
            .into_inner()
            .map_err(|e| SensorgraphError::FileIO(target, e.into_error()))
    }

    fn csv_err(&self, e: csv::Error) -> SensorgraphError {
        SensorgraphError::CsvError(self.target.clone(), e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorgraph_schemas::{
        reading::Field,
        report::{ChartRow, SeriesColumn},
    };

    fn report() -> ChartReport {
        ChartReport {
            site_name: "station".to_string(),
            title: "Outside Temp and Pressure History".to_string(),
            sensor_id: "Deck".to_string(),
            lookback_hours: 240,
            columns: [
                SeriesColumn {
                    field: Field::Temp1,
                    sensor_id: "Deck".to_string(),
                    color: "red".to_string(),
                },
                SeriesColumn {
                    field: Field::Press,
                    sensor_id: "Desk".to_string(),
                    color: "blue".to_string(),
                },
            ],
            rows: vec![
                ChartRow("2025-06-24 10:00:00".to_string(), 68.0, 1012.5),
                ChartRow("2025-06-24 10:05:00".to_string(), 68.9, 1012.4),
            ],
            current: None,
            summaries: None,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut writer = SeriesWriter::from_writer(Vec::new());
        writer.write_report(&report()).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date_time,Deck Temp (°F),Desk Pressure (hPa)");
        assert_eq!(lines[1], "2025-06-24 10:00:00,68.0,1012.5");
        assert_eq!(lines[2], "2025-06-24 10:05:00,68.9,1012.4");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn creates_file_from_path() {
        let path = std::env::temp_dir().join(format!("sensorgraph-export-{}.csv", std::process::id()));
        SeriesWriter::create(&path).unwrap().write_report(&report()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("date_time,Deck Temp (°F),Desk Pressure (hPa)"));
    }

    #[test]
    fn missing_directory_is_a_csv_error() {
        let path = std::env::temp_dir()
            .join(format!("sensorgraph-absent-{}", std::process::id()))
            .join("rows.csv");
        assert!(matches!(
            SeriesWriter::create(&path),
            Err(SensorgraphError::CsvError(_, _))
        ));
    }
}
