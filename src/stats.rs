use crate::models::{LogEntry, WeightPoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Recorded body weights in ascending date order. Entries with no weight, or
/// a blank one, are skipped.
pub fn weight_series(logs: &BTreeMap<NaiveDate, LogEntry>) -> Vec<WeightPoint> {
    logs.iter()
        .filter_map(|(date, entry)| {
            entry.recorded_weight().map(|weight| WeightPoint {
                date: *date,
                weight: weight.clone(),
            })
        })
        .collect()
}
