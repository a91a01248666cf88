//! FILENAME: core/pivot-engine/src/key.rs
//! Composite keys for row and column groups.
//!
//! A key is the ordered list of a record's string-coerced values for a
//! dimension field list. Components are kept separate rather than joined with
//! a separator, so no field value can forge another group's key.

use std::fmt;

use pivot_data::Record;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Joins components for display, e.g. `North / Q1`.
pub const LABEL_SEPARATOR: &str = " / ";

/// A unique combination of dimension values. Orders lexicographically,
/// component by component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey {
    components: SmallVec<[String; 2]>,
}

impl CompositeKey {
    /// The key of the single implicit group used when a dimension has no
    /// fields.
    pub fn total() -> Self {
        CompositeKey::default()
    }

    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompositeKey {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_total(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Component for the field at `index` in the dimension list; empty when
    /// out of range.
    pub fn component(&self, index: usize) -> &str {
        self.components.get(index).map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn label(&self) -> String {
        self.components.join(LABEL_SEPARATOR)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Derives the composite key of `record` for `fields`.
///
/// No fields gives the total key. Otherwise each field contributes its
/// string form, with missing and null values as the empty string.
pub fn derive_key<S: AsRef<str>>(record: &Record, fields: &[S]) -> CompositeKey {
    CompositeKey {
        components: fields
            .iter()
            .map(|f| record.get(f.as_ref()).key_string().into_owned())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_data::Value;

    #[test]
    fn test_empty_fields_give_total_key() {
        let record = Record::new().with("Region", "North");
        let key = derive_key::<&str>(&record, &[]);
        assert!(key.is_total());
        assert_eq!(key, CompositeKey::total());
    }

    #[test]
    fn test_key_follows_field_order() {
        let record = Record::new().with("Region", "North").with("Quarter", "Q1");
        assert_eq!(
            derive_key(&record, &["Region", "Quarter"]).components(),
            &["North", "Q1"]
        );
        assert_eq!(
            derive_key(&record, &["Quarter", "Region"]).components(),
            &["Q1", "North"]
        );
    }

    #[test]
    fn test_missing_and_null_coerce_to_empty() {
        let record = Record::new().with("Region", Value::Null);
        let key = derive_key(&record, &["Region", "Missing"]);
        assert_eq!(key.components(), &["", ""]);
        assert_eq!(key.component(5), "");
    }

    #[test]
    fn test_same_string_form_same_key() {
        let a = Record::new().with("Code", 1.0);
        let b = Record::new().with("Code", "1");
        assert_eq!(derive_key(&a, &["Code"]), derive_key(&b, &["Code"]));
    }

    #[test]
    fn test_separator_like_content_does_not_collide() {
        let a = Record::new().with("A", "x|||y").with("B", "z");
        let b = Record::new().with("A", "x").with("B", "y|||z");
        assert_ne!(derive_key(&a, &["A", "B"]), derive_key(&b, &["A", "B"]));
    }

    #[test]
    fn test_ordering_and_label() {
        let mut keys = vec![
            CompositeKey::from_components(["South", "Q1"]),
            CompositeKey::from_components(["North", "Q2"]),
            CompositeKey::from_components(["North", "Q1"]),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(CompositeKey::label).collect();
        assert_eq!(labels, vec!["North / Q1", "North / Q2", "South / Q1"]);
    }
}
