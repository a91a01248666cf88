//! FILENAME: core/pivot-engine/src/filter.rs
//! Filter engine.
//!
//! Reduces the working dataset to the records whose dimension values are in
//! a per-field allow-list. Values are compared by their label: the string
//! form of the value, or `(empty)` for null and missing values.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use pivot_data::{Record, Value};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{log_debug, log_enter, log_exit};

/// Label shown for null or missing values in filter lists.
pub const EMPTY_LABEL: &str = "(empty)";

/// Filter label of a value.
pub fn filter_label(value: &Value) -> Cow<'_, str> {
    if value.is_null() {
        Cow::Borrowed(EMPTY_LABEL)
    } else {
        value.key_string()
    }
}

/// Per-field allow-lists. A field without an entry is unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    allowed: BTreeMap<String, Vec<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        FilterState::default()
    }

    /// Sets an allow-list without normalization.
    pub fn with<I, S>(mut self, field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .insert(field.into(), allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Stores the selection for `field`, or clears the filter when every
    /// value in `all_values` is selected.
    pub fn set_selection(&mut self, field: &str, selected: Vec<String>, all_values: &[String]) {
        let chosen: FxHashSet<&str> = selected.iter().map(String::as_str).collect();
        if all_values.iter().all(|v| chosen.contains(v.as_str())) {
            self.allowed.remove(field);
        } else {
            self.allowed.insert(field.to_string(), selected);
        }
    }

    pub fn clear(&mut self, field: &str) {
        self.allowed.remove(field);
    }

    pub fn allowed(&self, field: &str) -> Option<&[String]> {
        self.allowed.get(field).map(Vec::as_slice)
    }

    /// Whether `field` restricts anything. An empty allow-list does not.
    pub fn is_active(&self, field: &str) -> bool {
        self.allowed.get(field).is_some_and(|values| !values.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.values().all(Vec::is_empty)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.allowed.keys().map(String::as_str)
    }

    /// Drops every entry whose allow-list covers all distinct values the
    /// field has in `records`.
    pub fn normalize(&mut self, records: &[Record]) {
        self.allowed.retain(|field, allowed| {
            let chosen: FxHashSet<&str> = allowed.iter().map(String::as_str).collect();
            !distinct_values(records, field)
                .iter()
                .all(|v| chosen.contains(v.as_str()))
        });
    }
}

/// Keeps the records that pass every active allow-list. Filters on
/// different fields combine with AND. The input is left untouched.
pub fn apply_filters<'r>(records: &'r [Record], state: &FilterState) -> Vec<&'r Record> {
    log_enter!("FILTER", "apply_filters", "records={}", records.len());

    let active: Vec<(&str, FxHashSet<&str>)> = state
        .allowed
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| {
            (field.as_str(), values.iter().map(String::as_str).collect())
        })
        .collect();

    let kept: Vec<&Record> = if active.is_empty() {
        records.iter().collect()
    } else {
        records
            .iter()
            .filter(|record| {
                active.iter().all(|(field, allowed)| {
                    let label = filter_label(record.get(field));
                    allowed.contains(&*label)
                })
            })
            .collect()
    };

    log_debug!("FILTER", "{} active filters", active.len());
    log_exit!("FILTER", "apply_filters", "kept={}", kept.len());
    kept
}

/// Sorted distinct filter labels of `field` across `records`.
pub fn distinct_values(records: &[Record], field: &str) -> Vec<String> {
    let labels: BTreeSet<Cow<'_, str>> = records
        .iter()
        .map(|r| filter_label(r.get(field)))
        .collect();
    labels.into_iter().map(Cow::into_owned).collect()
}

/// Case-insensitive substring search over filter labels.
pub fn search_values<'v>(values: &'v [String], query: &str) -> Vec<&'v String> {
    let needle = query.to_lowercase();
    values
        .iter()
        .filter(|v| v.to_lowercase().contains(&needle))
        .collect()
}

/// The first `n` labels, as picked by the "top N" shortcut.
pub fn top_values(values: &[String], n: usize) -> Vec<String> {
    values.iter().take(n).cloned().collect()
}
