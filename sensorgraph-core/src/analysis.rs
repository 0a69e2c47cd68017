use sensorgraph_schemas::{
    merged::MergedRecord,
    reading::SensorRecord,
    report::SeriesSummary,
};

/// The merged record with the largest bucket key.
pub fn latest_merged(records: &[MergedRecord]) -> Option<&MergedRecord> {
    records.iter().max_by_key(|r| r.bucket_key)
}

/// The most recent raw row. Ties go to the row that came last.
pub fn latest_record(records: &[SensorRecord]) -> Option<&SensorRecord> {
    records.iter().max_by_key(|r| r.date_time)
}

/// Count, extrema and mean of a series. `None` for an empty series.
pub fn summarize<I>(values: I) -> Option<SeriesSummary>
where
    I: IntoIterator<Item = f64>,
{
    let mut summary = SeriesSummary {
        count: 0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        mean: 0.0,
    };
    let mut total = 0.0;
    for value in values {
        summary.count += 1;
        summary.min = summary.min.min(value);
        summary.max = summary.max.max(value);
        total += value;
    }
    if summary.count == 0 {
        return None;
    }
    summary.mean = total / summary.count as f64;
    Some(summary)
}
