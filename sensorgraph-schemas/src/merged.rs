use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Primary and secondary values that fell into the same time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub bucket_key: i64,
    /// Start of the bucket, not the time of either reading.
    pub timestamp: NaiveDateTime,
    pub primary_value: f64,
    pub secondary_value: Option<f64>,
}
