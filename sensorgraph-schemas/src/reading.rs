use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric column of the `SensorData` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Temp1,
    Temp2,
    Rh,
    Press,
    Light,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Temp1, Field::Temp2, Field::Rh, Field::Press, Field::Light];

    /// Column name in the `SensorData` table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Temp1 => "temp1",
            Field::Temp2 => "temp2",
            Field::Rh => "rh",
            Field::Press => "press",
            Field::Light => "light",
        }
    }

    /// Short label used in headings, e.g. "Temp" or "RH".
    pub fn label(self) -> &'static str {
        match self {
            Field::Temp1 => "Temp",
            Field::Temp2 => "Temp2",
            Field::Rh => "RH",
            Field::Press => "Pressure",
            Field::Light => "Light",
        }
    }

    /// Unit of the value as displayed. Temperatures are stored in °C but shown in °F.
    pub fn display_unit(self) -> &'static str {
        match self {
            Field::Temp1 | Field::Temp2 => "°F",
            Field::Rh => "%",
            Field::Press => "hPa",
            Field::Light => "lx",
        }
    }

    pub fn is_temperature(self) -> bool {
        matches!(self, Field::Temp1 | Field::Temp2)
    }

    /// Axis / column title, e.g. "Temp (°F)".
    pub fn axis_title(self) -> String {
        format!("{} ({})", self.label(), self.display_unit())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One row of the `SensorData` table.
///
/// Numeric columns are `None` when the stored value was NULL or not a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub date_time: NaiveDateTime,
    pub sensor_id: String,
    pub temp1: Option<f64>,
    pub temp2: Option<f64>,
    pub rh: Option<f64>,
    pub press: Option<f64>,
    pub light: Option<f64>,
}

impl SensorRecord {
    pub fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::Temp1 => self.temp1,
            Field::Temp2 => self.temp2,
            Field::Rh => self.rh,
            Field::Press => self.press,
            Field::Light => self.light,
        }
    }

    /// The value of `field`, with a missing value read as zero.
    pub fn value(&self, field: Field) -> f64 {
        self.field(field).unwrap_or(0.0)
    }

    pub fn to_reading(&self, field: Field) -> Reading {
        Reading {
            timestamp: self.date_time,
            sensor_id: self.sensor_id.clone(),
            value: self.value(field),
        }
    }
}

/// A single timestamped value from one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub sensor_id: String,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, sensor_id: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp,
            sensor_id: sensor_id.into(),
            value,
        }
    }
}
