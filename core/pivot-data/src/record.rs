//! FILENAME: core/pivot-data/src/record.rs
//! PURPOSE: A single source row and helpers for listing its pivotable fields.
//! CONTEXT: Records are produced by the host data source and handed to the
//! engine read-only. Columns the host uses for bookkeeping (`id`,
//! `manualSort`) never become pivot fields.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Row identity column supplied by the host table.
pub const ID_FIELD: &str = "id";

/// Internal ordering column supplied by the host table.
pub const MANUAL_SORT_FIELD: &str = "manualSort";

static NULL: Value = Value::Null;

/// One source row: field name to scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns the value of `field`, or `Null` when the record lacks it.
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Whether a column may be placed in a pivot zone.
pub fn is_pivotable_field(field: &str) -> bool {
    field != ID_FIELD && field != MANUAL_SORT_FIELD
}

/// Every field seen across the dataset, minus the host bookkeeping columns,
/// in ascending name order.
pub fn pivotable_fields(records: &[Record]) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(Record::field_names)
        .filter(|name| is_pivotable_field(name))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// Converts a column-oriented table fetch into records.
///
/// The row count comes from the `id` column when the table has one, otherwise
/// from the longest column. Short columns pad with `Null`.
pub fn records_from_columns(columns: Vec<(String, Vec<Value>)>) -> Vec<Record> {
    let row_count = columns
        .iter()
        .find(|(name, _)| name == ID_FIELD)
        .map(|(_, values)| values.len())
        .unwrap_or_else(|| columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0));

    let mut records: Vec<Record> = (0..row_count).map(|_| Record::new()).collect();
    for (name, values) in columns {
        let mut values = values.into_iter();
        for record in records.iter_mut() {
            record.insert(name.clone(), values.next().unwrap_or(Value::Null));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_reads_null() {
        let record = Record::new().with("Region", "North");
        assert_eq!(record.get("Region"), &Value::text("North"));
        assert_eq!(record.get("Sales"), &Value::Null);
        assert!(!record.contains("Sales"));
    }

    #[test]
    fn test_pivotable_fields_excludes_bookkeeping() {
        let records = vec![
            Record::new()
                .with("id", 1)
                .with("manualSort", 1)
                .with("Region", "North"),
            Record::new().with("id", 2).with("Sales", 10.0),
        ];
        assert_eq!(pivotable_fields(&records), vec!["Region", "Sales"]);
    }

    #[test]
    fn test_records_from_columns() {
        let records = records_from_columns(vec![
            ("id".to_string(), vec![Value::from(1), Value::from(2)]),
            ("Region".to_string(), vec![Value::from("North")]),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Region"), &Value::text("North"));
        assert_eq!(records[1].get("Region"), &Value::Null);
        assert!(records[1].contains("Region"));
    }

    #[test]
    fn test_record_deserializes_from_object() {
        let record: Record =
            serde_json::from_str(r#"{"Region": "South", "Sales": 12, "Note": null}"#).unwrap();
        assert_eq!(record.get("Sales"), &Value::Number(12.0));
        assert_eq!(record.get("Note"), &Value::Null);
        assert_eq!(record.len(), 3);
    }
}
