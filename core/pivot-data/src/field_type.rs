//! FILENAME: core/pivot-data/src/field_type.rs
//! PURPOSE: Infers a coarse type for each field from sample values.
//! CONTEXT: The type is only used for defaults (e.g. which aggregation a
//! field gets when dropped into the values zone). It never validates data.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::record::{pivotable_fields, Record};
use crate::value::Value;

/// Coarse field classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "num")]
    Numeric,
    #[serde(rename = "bool")]
    Boolean,
    #[serde(rename = "date")]
    Date,
    #[default]
    #[serde(rename = "text")]
    Text,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Numeric)
    }

    /// Classifies a single non-blank sample.
    pub fn of_value(value: &Value) -> FieldType {
        match value {
            Value::Number(_) => FieldType::Numeric,
            Value::Bool(_) => FieldType::Boolean,
            Value::Text(s) if looks_like_date(s) => FieldType::Date,
            Value::Text(_) | Value::Null => FieldType::Text,
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Whether `text` parses as a calendar date or timestamp.
///
/// Bare numbers are never dates, even when they could pass for a year.
pub fn looks_like_date(text: &str) -> bool {
    let s = text.trim();
    if s.is_empty() || s.parse::<f64>().is_ok() {
        return false;
    }

    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
}

/// Infers the type of `field` from the first non-blank sample in the dataset.
/// A field with no usable sample is text.
pub fn infer_field_type(records: &[Record], field: &str) -> FieldType {
    records
        .iter()
        .map(|r| r.get(field))
        .find(|v| !v.is_blank())
        .map(FieldType::of_value)
        .unwrap_or_default()
}

/// Infers a type for every pivotable field of the dataset.
pub fn infer_field_types(records: &[Record]) -> BTreeMap<String, FieldType> {
    pivotable_fields(records)
        .into_iter()
        .map(|field| {
            let field_type = infer_field_type(records, &field);
            (field, field_type)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_blank_sample_wins() {
        let records = vec![
            Record::new().with("Sales", Value::Null),
            Record::new().with("Sales", ""),
            Record::new().with("Sales", 10.0),
            Record::new().with("Sales", "n/a"),
        ];
        assert_eq!(infer_field_type(&records, "Sales"), FieldType::Numeric);
    }

    #[test]
    fn test_infer_all_kinds() {
        let records = vec![Record::new()
            .with("id", 1)
            .with("Amount", 4.5)
            .with("Active", true)
            .with("Closed", "2024-03-15")
            .with("Region", "North")
            .with("Empty", Value::Null)];
        let types = infer_field_types(&records);

        assert_eq!(types.get("Amount"), Some(&FieldType::Numeric));
        assert_eq!(types.get("Active"), Some(&FieldType::Boolean));
        assert_eq!(types.get("Closed"), Some(&FieldType::Date));
        assert_eq!(types.get("Region"), Some(&FieldType::Text));
        assert_eq!(types.get("Empty"), Some(&FieldType::Text));
        assert!(!types.contains_key("id"));
    }

    #[test]
    fn test_looks_like_date() {
        assert!(looks_like_date("2024-03-15"));
        assert!(looks_like_date("2024-03-15T10:30:00Z"));
        assert!(looks_like_date("03/15/2024"));
        assert!(looks_like_date("March 15, 2024"));
        assert!(!looks_like_date("2024"));
        assert!(!looks_like_date("12.5"));
        assert!(!looks_like_date("North"));
        assert!(!looks_like_date(""));
    }
}
