//! FILENAME: core/pivot-engine/src/sort.rs
//! Sort resolver.
//!
//! Reorders the row and column keys of a built pivot by per-field sort
//! directions. Each dimension field with a direction gets its own stable
//! pass over that field's key component, in dimension order, so the last
//! sorted field ends up as the primary order.

use std::cmp::Ordering;

use crate::definition::{SortDirection, SortState};
use crate::engine::PivotData;
use crate::key::CompositeKey;
use crate::{log_enter, log_exit};

fn compare_component(a: &CompositeKey, b: &CompositeKey, index: usize, direction: SortDirection) -> Ordering {
    let ordering = a.component(index).cmp(b.component(index));
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Sorts `keys` for the dimension `fields` according to `sorts`. Fields
/// without a direction leave the order untouched.
pub fn sort_keys<S: AsRef<str>>(keys: &mut [CompositeKey], fields: &[S], sorts: &SortState) {
    for (index, field) in fields.iter().enumerate() {
        if let Some(direction) = sorts.direction(field.as_ref()) {
            keys.sort_by(|a, b| compare_component(a, b, index, direction));
        }
    }
}

/// Applies `sorts` to both key sequences of `data` in place.
pub fn apply_sorts(data: &mut PivotData, sorts: &SortState) {
    if sorts.is_empty() {
        return;
    }
    log_enter!("SORT", "apply_sorts", "sorts={:?}", sorts);

    sort_keys(&mut data.row_keys, &data.row_fields, sorts);
    sort_keys(&mut data.col_keys, &data.col_fields, sorts);

    log_exit!("SORT", "apply_sorts");
}
