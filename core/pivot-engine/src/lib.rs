//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot table calculation engine.
//!
//! Turns a flat list of records into a two-dimensional summary: records are
//! grouped by row and column fields, value fields are aggregated per cell,
//! per row, per column and overall. Shared data types (values, records, cell
//! formats) live in `pivot-data`.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot table IS)
//! - `aggregation`, `key`, `filter`: the building blocks of a computation
//! - `engine`: Builder and drill-down (HOW we calculate)
//! - `sort`: Ordering of row and column keys
//! - `conditional`, `view`: Renderable output for the frontend (WHAT we display)
//! - `settings`: The saved document tying all of the above together

pub mod logging;

pub mod aggregation;
pub mod conditional;
pub mod definition;
pub mod engine;
pub mod error;
pub mod filter;
pub mod key;
pub mod settings;
pub mod sort;
pub mod view;

pub use conditional::{style_for, ComparisonOperator, ConditionalRule};
pub use definition::*;
pub use engine::{build_pivot, calculate_pivot, drill_down, DrillDown, PivotBuilder, PivotData, ValueLists};
pub use error::PivotError;
pub use filter::{
    apply_filters, distinct_values, filter_label, search_values, top_values, FilterState, EMPTY_LABEL,
};
pub use key::{derive_key, CompositeKey, LABEL_SEPARATOR};
pub use settings::PivotSettings;
pub use sort::{apply_sorts, sort_keys};
pub use view::{render_view, PivotView, ViewCell, ViewCellType, GRAND_TOTAL_LABEL, TOTAL_LABEL};
