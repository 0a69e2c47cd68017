//! Property-based tests for the bucket merge
//!
//! Checks the synchronization invariants over randomly generated,
//! timestamp-ordered reading streams and bin widths.

use chrono::{DateTime, NaiveDateTime};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use sensorgraph_core::merge::{bucket_key, merge, MergeConfigBuilder};
use sensorgraph_schemas::reading::Reading;

// ============================================================================
// Test Strategies
// ============================================================================

fn epoch(seconds: i64) -> NaiveDateTime {
    DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
}

/// Strategy for a stream of readings ordered by timestamp ascending
fn stream_strategy(sensor: &'static str) -> impl Strategy<Value = Vec<Reading>> {
    prop::collection::vec((0i64..50_000, -40.0f64..1100.0), 0..60).prop_map(move |mut samples| {
        samples.sort_by_key(|(t, _)| *t);
        samples
            .into_iter()
            .map(|(t, v)| Reading::new(epoch(1_750_000_000 + t), sensor, v))
            .collect()
    })
}

fn bin_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(60i64), Just(300i64), 1i64..7_200]
}

/// Last value per bucket, in input order
fn last_by_bucket(readings: &[Reading], bin: i64) -> BTreeMap<i64, f64> {
    readings
        .iter()
        .map(|r| (bucket_key(r.timestamp, bin), r.value))
        .collect()
}

// ============================================================================
// Merge Properties
// ============================================================================

proptest! {
    /// Every record carries both values, and each is the last reading of its bucket
    #[test]
    fn prop_records_come_from_both_streams(
        primary in stream_strategy("Deck"),
        secondary in stream_strategy("Desk"),
        bin in bin_strategy(),
    ) {
        let config = MergeConfigBuilder::new().with_bin_seconds(bin).build().unwrap();
        let merged = merge(&primary, &secondary, &config);
        let last_primary = last_by_bucket(&primary, bin);
        let last_secondary = last_by_bucket(&secondary, bin);

        for record in &merged {
            prop_assert_eq!(last_primary.get(&record.bucket_key), Some(&record.primary_value));
            prop_assert_eq!(last_secondary.get(&record.bucket_key).copied(), record.secondary_value);
            prop_assert_eq!(record.timestamp, epoch(record.bucket_key * bin));
        }
    }

    /// A bucket is emitted if and only if both streams reported into it
    #[test]
    fn prop_bucket_present_iff_both_sides_report(
        primary in stream_strategy("Deck"),
        secondary in stream_strategy("Desk"),
        bin in bin_strategy(),
    ) {
        let config = MergeConfigBuilder::new().with_bin_seconds(bin).build().unwrap();
        let merged = merge(&primary, &secondary, &config);

        let primary_keys: BTreeSet<i64> = primary.iter().map(|r| bucket_key(r.timestamp, bin)).collect();
        let secondary_keys: BTreeSet<i64> = secondary.iter().map(|r| bucket_key(r.timestamp, bin)).collect();
        let expected: Vec<i64> = primary_keys.intersection(&secondary_keys).copied().collect();
        let emitted: Vec<i64> = merged.iter().map(|r| r.bucket_key).collect();

        prop_assert_eq!(emitted, expected);
    }

    /// Output is strictly ascending by bucket and by timestamp
    #[test]
    fn prop_output_is_sorted(
        primary in stream_strategy("Deck"),
        secondary in stream_strategy("Desk"),
        bin in bin_strategy(),
    ) {
        let config = MergeConfigBuilder::new().with_bin_seconds(bin).build().unwrap();
        let merged = merge(&primary, &secondary, &config);

        for pair in merged.windows(2) {
            prop_assert!(pair[0].bucket_key < pair[1].bucket_key);
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    /// Running the merge twice on the same input gives the same output
    #[test]
    fn prop_merge_is_deterministic(
        primary in stream_strategy("Deck"),
        secondary in stream_strategy("Desk"),
        bin in bin_strategy(),
    ) {
        let config = MergeConfigBuilder::new().with_bin_seconds(bin).build().unwrap();
        prop_assert_eq!(
            merge(&primary, &secondary, &config),
            merge(&primary, &secondary, &config)
        );
    }

    /// Without secondary readings nothing survives
    #[test]
    fn prop_empty_secondary_is_empty(primary in stream_strategy("Deck"), bin in bin_strategy()) {
        let config = MergeConfigBuilder::new().with_bin_seconds(bin).build().unwrap();
        prop_assert!(merge(&primary, &[], &config).is_empty());
    }
}
