//! FILENAME: core/pivot-engine/src/aggregation.rs
//! Aggregator library.
//!
//! Every aggregator is a pure reduction over a list of raw values. None of
//! them fails: unparseable values coerce to 0 and empty lists reduce to 0.
//! `min` and `max` also return 0 for an empty list, so callers that want a
//! sentinel must check for emptiness themselves.

use pivot_data::Value;
use rustc_hash::FxHashSet;

use crate::definition::AggregationKind;

impl AggregationKind {
    /// Reduces `values` with this aggregation.
    pub fn reduce(&self, values: &[Value]) -> f64 {
        match self {
            AggregationKind::Sum => sum(values),
            AggregationKind::Count => count(values),
            AggregationKind::Avg => average(values),
            AggregationKind::Min => min(values),
            AggregationKind::Max => max(values),
            AggregationKind::CountDistinct => count_distinct(values),
            AggregationKind::Median => median(values),
            AggregationKind::Stdev => stdev(values),
            AggregationKind::Variance => variance(values),
        }
    }
}

fn numbers(values: &[Value]) -> impl Iterator<Item = f64> + '_ {
    values.iter().map(Value::to_number)
}

pub fn sum(values: &[Value]) -> f64 {
    numbers(values).sum()
}

/// Number of entries, nulls included.
pub fn count(values: &[Value]) -> f64 {
    values.len() as f64
}

pub fn average(values: &[Value]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

pub fn min(values: &[Value]) -> f64 {
    numbers(values).reduce(f64::min).unwrap_or(0.0)
}

pub fn max(values: &[Value]) -> f64 {
    numbers(values).reduce(f64::max).unwrap_or(0.0)
}

/// Distinct string forms. `1` and `"1"` count once; null is kept apart from
/// the empty string.
pub fn count_distinct(values: &[Value]) -> f64 {
    let distinct: FxHashSet<Option<String>> = values
        .iter()
        .map(|v| (!v.is_null()).then(|| v.key_string().into_owned()))
        .collect();
    distinct.len() as f64
}

pub fn median(values: &[Value]) -> f64 {
    let mut nums: Vec<f64> = numbers(values).collect();
    if nums.is_empty() {
        return 0.0;
    }
    nums.sort_by(f64::total_cmp);

    let mid = nums.len() / 2;
    if nums.len() % 2 != 0 {
        nums[mid]
    } else {
        (nums[mid - 1] + nums[mid]) / 2.0
    }
}

/// Population variance (divides by N).
pub fn variance(values: &[Value]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = sum(values) / n;
    numbers(values).map(|x| (x - mean).powi(2)).sum::<f64>() / n
}

/// Population standard deviation.
pub fn stdev(values: &[Value]) -> f64 {
    variance(values).sqrt()
}
