//! Time-bucket synchronization of two independently sampled sensors.
//!
//! Readings are assigned to fixed-width buckets (`floor(epoch_seconds / bin)`).
//! A bucket survives only if both the primary and the secondary sensor reported
//! into it. Both sensors must therefore report at least once every bin width,
//! otherwise genuine pairs fall into different buckets and are dropped.

use crate::{error::SensorgraphError, window::LookbackWindow};
use chrono::{DateTime, NaiveDateTime};
use log::{debug, trace};
use sensorgraph_schemas::{merged::MergedRecord, reading::Reading};
use std::collections::BTreeMap;

pub const DEFAULT_BIN_SECONDS: i64 = 5 * 60;
/// Widest accepted bucket: one week.
pub const MAX_BIN_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Validated parameters for [`merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    bin_seconds: i64,
    window: Option<LookbackWindow>,
}

impl MergeConfig {
    pub fn bin_seconds(&self) -> i64 {
        self.bin_seconds
    }

    pub fn window(&self) -> Option<&LookbackWindow> {
        self.window.as_ref()
    }

    pub fn bucket_key(&self, timestamp: NaiveDateTime) -> i64 {
        bucket_key(timestamp, self.bin_seconds)
    }

    /// Start of the bucket `key`, clamped to the representable date range.
    pub fn bucket_start(&self, key: i64) -> NaiveDateTime {
        key.checked_mul(self.bin_seconds)
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .map(|dt| dt.naive_utc())
            .unwrap_or(if key < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            })
    }

    fn admits(&self, timestamp: NaiveDateTime) -> bool {
        self.window.map_or(true, |w| w.contains(timestamp))
    }
}

/// A fluent builder for [`MergeConfig`].
#[derive(Debug, Default)]
pub struct MergeConfigBuilder {
    bin_seconds: Option<i64>,
    window: Option<LookbackWindow>,
}

impl MergeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bucket width. Defaults to [`DEFAULT_BIN_SECONDS`].
    pub fn with_bin_seconds(mut self, bin_seconds: i64) -> Self {
        self.bin_seconds = Some(bin_seconds);
        self
    }

    /// Restricts the merge to readings inside `window`.
    pub fn with_window(mut self, window: LookbackWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidBinWidth` unless the bin width is within
    /// `1..=MAX_BIN_SECONDS`.
    pub fn build(self) -> Result<MergeConfig, SensorgraphError> {
        let bin_seconds = self.bin_seconds.unwrap_or(DEFAULT_BIN_SECONDS);
        if !(1..=MAX_BIN_SECONDS).contains(&bin_seconds) {
            return Err(SensorgraphError::InvalidBinWidth(bin_seconds));
        }
        Ok(MergeConfig {
            bin_seconds,
            window: self.window,
        })
    }
}

/// Bucket index of `timestamp` for buckets `bin_seconds` wide.
///
/// Naive timestamps are read as UTC seconds, the same way SQLite's
/// `unixepoch()` reads a stored `date_time`. Floors toward negative infinity.
pub fn bucket_key(timestamp: NaiveDateTime, bin_seconds: i64) -> i64 {
    timestamp.and_utc().timestamp().div_euclid(bin_seconds)
}

struct Provisional {
    primary: f64,
    secondary: Option<f64>,
}

/// Merges two reading streams into bucket-aligned records, ordered by bucket.
///
/// Within one bucket the last reading processed from each stream wins.
/// Secondary readings with no primary in their bucket are dropped, and buckets
/// that never receive a secondary reading are discarded.
pub fn merge(primary: &[Reading], secondary: &[Reading], config: &MergeConfig) -> Vec<MergedRecord> {
    let mut buckets: BTreeMap<i64, Provisional> = BTreeMap::new();

    for reading in primary.iter().filter(|r| config.admits(r.timestamp)) {
        buckets.insert(
            config.bucket_key(reading.timestamp),
            Provisional {
                primary: reading.value,
                secondary: None,
            },
        );
    }

    let mut unmatched = 0usize;
    for reading in secondary.iter().filter(|r| config.admits(r.timestamp)) {
        let key = config.bucket_key(reading.timestamp);
        match buckets.get_mut(&key) {
            Some(bucket) => bucket.secondary = Some(reading.value),
            None => {
                unmatched += 1;
                trace!(
                    "No primary reading in bucket {} for '{}' at {}",
                    key,
                    reading.sensor_id,
                    reading.timestamp
                );
            }
        }
    }

    let provisional = buckets.len();
    let merged: Vec<MergedRecord> = buckets
        .into_iter()
        .filter_map(|(key, bucket)| {
            let secondary = bucket.secondary?;
            Some(MergedRecord {
                bucket_key: key,
                timestamp: config.bucket_start(key),
                primary_value: bucket.primary,
                secondary_value: Some(secondary),
            })
        })
        .collect();

    debug!(
        "Merged {} of {} primary buckets ({} secondary readings unmatched)",
        merged.len(),
        provisional,
        unmatched
    );
    merged
}
