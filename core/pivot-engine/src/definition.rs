//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a pivot table: which fields
//! sit in the row, column and value zones, how each value field is
//! aggregated, how dimension fields are sorted and which totals are shown.
//! The caller owns these values and passes them in on every recomputation;
//! the engine never keeps them between calls.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use pivot_data::FieldType;
use serde::{Deserialize, Serialize};

use crate::error::PivotError;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for value fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum AggregationKind {
    #[default]
    Sum,
    Count,
    Avg,
    Min,
    Max,
    CountDistinct,
    Median,
    Stdev,
    Variance,
}

impl AggregationKind {
    /// The full catalog, in menu order.
    pub const ALL: [AggregationKind; 9] = [
        AggregationKind::Sum,
        AggregationKind::Count,
        AggregationKind::Avg,
        AggregationKind::Min,
        AggregationKind::Max,
        AggregationKind::CountDistinct,
        AggregationKind::Median,
        AggregationKind::Stdev,
        AggregationKind::Variance,
    ];

    /// Identifier used in saved settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Sum => "sum",
            AggregationKind::Count => "count",
            AggregationKind::Avg => "avg",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::CountDistinct => "countDistinct",
            AggregationKind::Median => "median",
            AggregationKind::Stdev => "stdev",
            AggregationKind::Variance => "variance",
        }
    }

    /// Human-readable name for headers.
    pub fn label(&self) -> &'static str {
        match self {
            AggregationKind::Sum => "Sum",
            AggregationKind::Count => "Count",
            AggregationKind::Avg => "Average",
            AggregationKind::Min => "Min",
            AggregationKind::Max => "Max",
            AggregationKind::CountDistinct => "Distinct count",
            AggregationKind::Median => "Median",
            AggregationKind::Stdev => "Std. deviation",
            AggregationKind::Variance => "Variance",
        }
    }

    /// Aggregation a field gets when it is dropped into the values zone.
    pub fn default_for(field_type: FieldType) -> Self {
        if field_type.is_numeric() {
            AggregationKind::Sum
        } else {
            AggregationKind::Count
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationKind {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PivotError::UnknownAggregation(s.to_string()))
    }
}

impl TryFrom<String> for AggregationKind {
    type Error = PivotError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AggregationKind> for &'static str {
    fn from(kind: AggregationKind) -> Self {
        kind.as_str()
    }
}

// ============================================================================
// FIELD DEFINITIONS
// ============================================================================

/// A value field with its aggregation function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueSpec {
    /// Source field name.
    pub field: String,

    /// The aggregation function to apply.
    #[serde(rename = "agg")]
    pub aggregation: AggregationKind,
}

impl ValueSpec {
    pub fn new(field: impl Into<String>, aggregation: AggregationKind) -> Self {
        ValueSpec {
            field: field.into(),
            aggregation,
        }
    }

    /// Header text, e.g. `Sales (Sum)`.
    pub fn header(&self) -> String {
        format!("{} ({})", self.field, self.aggregation.label())
    }
}

/// The three drop zones of the field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Rows,
    Cols,
    Values,
}

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

/// Which fields sit in which zone.
///
/// A field appearing in both `rows` and `cols` is a caller contract
/// violation; the builder does not reject it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// Row dimension fields (ordered from outer to inner).
    pub rows: Vec<String>,

    /// Column dimension fields (ordered from outer to inner).
    pub cols: Vec<String>,

    /// Value specs; the same field may appear more than once.
    pub values: Vec<ValueSpec>,
}

impl PivotConfig {
    pub fn new(rows: Vec<String>, cols: Vec<String>, values: Vec<ValueSpec>) -> Self {
        PivotConfig { rows, cols, values }
    }

    /// Nothing placed in any zone.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty() && self.values.is_empty()
    }

    /// Distinct value field names in first-appearance order.
    pub fn value_field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.values.len());
        for spec in &self.values {
            if !names.contains(&spec.field) {
                names.push(spec.field.clone());
            }
        }
        names
    }

    /// Moves `field` into `zone`, removing it from every zone first.
    /// A field entering the values zone gets the default aggregation for
    /// its type.
    pub fn assign_field(&mut self, field: &str, zone: Zone, field_type: FieldType) {
        self.rows.retain(|f| f != field);
        self.cols.retain(|f| f != field);
        self.values.retain(|v| v.field != field);

        match zone {
            Zone::Rows => self.rows.push(field.to_string()),
            Zone::Cols => self.cols.push(field.to_string()),
            Zone::Values => self
                .values
                .push(ValueSpec::new(field, AggregationKind::default_for(field_type))),
        }
    }

    /// Removes `field` from one zone.
    pub fn remove_field(&mut self, field: &str, zone: Zone) {
        match zone {
            Zone::Rows => self.rows.retain(|f| f != field),
            Zone::Cols => self.cols.retain(|f| f != field),
            Zone::Values => self.values.retain(|v| v.field != field),
        }
    }

    /// Switches every value spec on `field` to `aggregation`.
    pub fn change_aggregation(&mut self, field: &str, aggregation: AggregationKind) {
        for spec in self.values.iter_mut().filter(|v| v.field == field) {
            spec.aggregation = aggregation;
        }
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// Sort direction for a dimension field's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(PivotError::UnknownSortDirection(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = PivotError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SortDirection> for &'static str {
    fn from(direction: SortDirection) -> Self {
        direction.as_str()
    }
}

/// Per-field sort directives. `None` (or no entry) means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    directions: BTreeMap<String, Option<SortDirection>>,
}

impl SortState {
    pub fn new() -> Self {
        SortState::default()
    }

    pub fn with(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.set(field, Some(direction));
        self
    }

    pub fn set(&mut self, field: impl Into<String>, direction: Option<SortDirection>) {
        self.directions.insert(field.into(), direction);
    }

    pub fn direction(&self, field: &str) -> Option<SortDirection> {
        self.directions.get(field).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.values().all(Option::is_none)
    }
}

// ============================================================================
// DISPLAY OPTIONS
// ============================================================================

/// Which totals the rendered grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrandTotals {
    /// Row totals, column totals and the overall total.
    #[default]
    Show,
    Hide,
    /// Only the per-row total column.
    Rows,
    /// Only the per-column total row.
    Cols,
}

impl GrandTotals {
    pub fn shows_row_totals(&self) -> bool {
        matches!(self, GrandTotals::Show | GrandTotals::Rows)
    }

    pub fn shows_column_totals(&self) -> bool {
        matches!(self, GrandTotals::Show | GrandTotals::Cols)
    }
}

/// Subtotal rows for nested row fields. Stored for the host's layout, the
/// rendered grid does not emit subtotal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtotals {
    Show,
    #[default]
    Hide,
}

/// Layout style picked by the host. Carried through saved settings as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Compact,
    Classic,
    Flat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    pub grand_totals: GrandTotals,
    pub subtotals: Subtotals,
    pub view_mode: ViewMode,
}
