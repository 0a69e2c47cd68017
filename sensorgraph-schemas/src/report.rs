//! Presentation-agnostic shape of a rendered report.

use crate::reading::Field;
use serde::{Deserialize, Serialize};

/// One chart row: `[timestamp, first series, second series]`.
///
/// Serializes as a JSON array, which is the row shape the chart library takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow(pub String, pub f64, pub f64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColumn {
    pub field: Field,
    pub sensor_id: String,
    pub color: String,
}

impl SeriesColumn {
    pub fn title(&self) -> String {
        self.field.axis_title()
    }
}

/// The latest values shown above the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub at: String,
    pub values: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartReport {
    pub site_name: String,
    pub title: String,
    /// Sensor named in the "current conditions" heading.
    pub sensor_id: String,
    pub lookback_hours: u32,
    pub columns: [SeriesColumn; 2],
    pub rows: Vec<ChartRow>,
    pub current: Option<CurrentConditions>,
    pub summaries: Option<[SeriesSummary; 2]>,
}

impl ChartReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
