//! Read-only access to the `SensorData` archive.

use crate::error::SensorgraphError;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rusqlite::{params, types::ValueRef, Connection, OpenFlags};
use sensorgraph_schemas::reading::{Field, Reading, SensorRecord};
use std::path::Path;

/// Layout of the archive table, as written by the data logger.
pub const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS SensorData (date_time TEXT, sensorID TEXT, \
     temp1 REAL, temp2 REAL, rh REAL, press REAL, light REAL)";

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// Coarse bound on the cutoff's calendar day. Stored text may use a `T`
// separator or padding, so the exact cutoff and the ordering are applied
// after parsing.
const SELECT_SINCE: &str = "SELECT date_time, sensorID, temp1, temp2, rh, press, light \
     FROM SensorData WHERE sensorID = ?1 AND trim(date_time) >= ?2 ORDER BY rowid";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of per-sensor history, ordered oldest first.
pub trait ReadingSource {
    /// All rows for `sensor_id` strictly after `since`.
    fn records(&self, sensor_id: &str, since: NaiveDateTime) -> Result<Vec<SensorRecord>, SensorgraphError>;

    /// One field of [`ReadingSource::records`], with missing values read as zero.
    fn readings(
        &self,
        sensor_id: &str,
        field: Field,
        since: NaiveDateTime,
    ) -> Result<Vec<Reading>, SensorgraphError> {
        Ok(self
            .records(sensor_id, since)?
            .iter()
            .map(|r| r.to_reading(field))
            .collect())
    }
}

/// A SQLite archive opened for one report run. The connection closes on drop.
pub struct SqliteStore {
    conn: Connection,
    location: String,
}

impl SqliteStore {
    /// Opens an existing database read-only.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the file is missing or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SensorgraphError> {
        let location = path.as_ref().display().to_string();
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SensorgraphError::StoreUnavailable(location.clone(), e))?;
        info!("Opened sensor archive '{}'", location);
        Ok(Self { conn, location })
    }

    /// Wraps an already open connection, e.g. an in-memory database.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            location: ":memory:".to_string(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl ReadingSource for SqliteStore {
    fn records(&self, sensor_id: &str, since: NaiveDateTime) -> Result<Vec<SensorRecord>, SensorgraphError> {
        let query_err = |e: rusqlite::Error| SensorgraphError::Query(sensor_id.to_string(), e);
        let cutoff = since.format(DATE_FORMAT).to_string();
        debug!("Querying '{}' rows after {}", sensor_id, format_date_time(since));

        let mut stmt = self.conn.prepare_cached(SELECT_SINCE).map_err(query_err)?;
        let rows = stmt
            .query_map(params![sensor_id, cutoff], |row| {
                Ok((
                    coerce_text(row.get_ref(0)?),
                    coerce_text(row.get_ref(1)?),
                    [
                        coerce_number(row.get_ref(2)?),
                        coerce_number(row.get_ref(3)?),
                        coerce_number(row.get_ref(4)?),
                        coerce_number(row.get_ref(5)?),
                        coerce_number(row.get_ref(6)?),
                    ],
                ))
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            let (date_time, sensor, [temp1, temp2, rh, press, light]) = row.map_err(query_err)?;
            let Some(date_time) = date_time.as_deref().and_then(parse_date_time) else {
                skipped += 1;
                continue;
            };
            if date_time <= since {
                continue;
            }
            records.push(SensorRecord {
                date_time,
                sensor_id: sensor.unwrap_or_else(|| sensor_id.to_string()),
                temp1,
                temp2,
                rh,
                press,
                light,
            });
        }

        if skipped > 0 {
            warn!("Skipped {} '{}' rows with unreadable date_time", skipped, sensor_id);
        }
        // Stable, so rows with equal timestamps stay in insertion order.
        records.sort_by_key(|r| r.date_time);
        Ok(records)
    }
}

/// Parses a stored `date_time`, accepting a `T` separator and fractional seconds.
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

pub fn format_date_time(timestamp: NaiveDateTime) -> String {
    timestamp.format(DATE_TIME_FORMAT).to_string()
}

fn coerce_text(value: ValueRef<'_>) -> Option<String> {
    value.as_str().ok().map(str::to_string)
}

/// Reads a REAL column permissively: integers widen, numeric text parses,
/// anything else is absent.
fn coerce_number(value: ValueRef<'_>) -> Option<f64> {
    let number = match value {
        ValueRef::Integer(i) => i as f64,
        ValueRef::Real(f) => f,
        ValueRef::Text(t) => std::str::from_utf8(t).ok()?.trim().parse().ok()?,
        ValueRef::Null | ValueRef::Blob(_) => return None,
    };
    number.is_finite().then_some(number)
}
