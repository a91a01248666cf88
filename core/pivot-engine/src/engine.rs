//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Builder - turns records and a configuration into grouped raw values.
//!
//! Algorithm:
//! 1. Derive the row key and column key of every record
//! 2. Append each value field's raw value to four accumulators: the
//!    (row, column) cell, the row total, the column total and the grand total
//! 3. Collect the distinct row and column keys in ascending order
//!
//! The result keeps raw value lists rather than reduced numbers, so a new
//! aggregation kind for a value field is computed from the lists alone,
//! without touching the records again.

use pivot_data::{Record, Value};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::definition::{AggregationKind, PivotConfig, SortState, ValueSpec};
use crate::filter::{apply_filters, FilterState};
use crate::key::{derive_key, CompositeKey};
use crate::sort::apply_sorts;
use crate::{log_debug, log_enter, log_exit};

// ============================================================================
// RAW VALUE LISTS
// ============================================================================

/// One raw value list per distinct value field, indexed by slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueLists {
    lists: SmallVec<[Vec<Value>; 2]>,
}

impl ValueLists {
    fn with_slots(slots: usize) -> Self {
        ValueLists {
            lists: (0..slots).map(|_| Vec::new()).collect(),
        }
    }

    fn push(&mut self, slot: usize, value: Value) {
        self.lists[slot].push(value);
    }

    /// Raw values of the field at `slot`; empty when out of range.
    pub fn slot(&self, slot: usize) -> &[Value] {
        self.lists.get(slot).map_or(&[][..], Vec::as_slice)
    }
}

// ============================================================================
// PIVOT DATA
// ============================================================================

/// The outcome of a pivot build.
///
/// `row_keys` and `col_keys` start out in ascending key order; the sort
/// resolver reorders them in place. All other content is fixed once built.
#[derive(Debug, Clone)]
pub struct PivotData {
    pub row_fields: Vec<String>,
    pub col_fields: Vec<String>,
    pub value_specs: Vec<ValueSpec>,
    pub row_keys: Vec<CompositeKey>,
    pub col_keys: Vec<CompositeKey>,

    /// Distinct value field names; position is the slot in `ValueLists`.
    value_fields: Vec<String>,

    /// row key -> column key -> raw values.
    cells: FxHashMap<CompositeKey, FxHashMap<CompositeKey, ValueLists>>,
    row_totals: FxHashMap<CompositeKey, ValueLists>,
    col_totals: FxHashMap<CompositeKey, ValueLists>,
    grand_total: ValueLists,

    /// Number of records that went into the build.
    pub record_count: usize,
}

impl PivotData {
    pub fn value_fields(&self) -> &[String] {
        &self.value_fields
    }

    fn slot_of(&self, field: &str) -> Option<usize> {
        self.value_fields.iter().position(|f| f == field)
    }

    fn lists_slot<'a>(&self, lists: Option<&'a ValueLists>, field: &str) -> &'a [Value] {
        match (lists, self.slot_of(field)) {
            (Some(lists), Some(slot)) => lists.slot(slot),
            _ => &[],
        }
    }

    /// Whether at least one record fell into (row, col).
    pub fn has_cell(&self, row: &CompositeKey, col: &CompositeKey) -> bool {
        self.cells.get(row).is_some_and(|cols| cols.contains_key(col))
    }

    /// Raw values of `field` in the (row, col) cell.
    pub fn cell_values(&self, row: &CompositeKey, col: &CompositeKey, field: &str) -> &[Value] {
        let lists = self.cells.get(row).and_then(|cols| cols.get(col));
        self.lists_slot(lists, field)
    }

    /// Raw values of `field` for a row, across all columns.
    pub fn row_total_values(&self, row: &CompositeKey, field: &str) -> &[Value] {
        self.lists_slot(self.row_totals.get(row), field)
    }

    /// Raw values of `field` for a column, across all rows.
    pub fn col_total_values(&self, col: &CompositeKey, field: &str) -> &[Value] {
        self.lists_slot(self.col_totals.get(col), field)
    }

    /// Raw values of `field` over the whole (filtered) dataset.
    pub fn grand_total_values(&self, field: &str) -> &[Value] {
        self.lists_slot(Some(&self.grand_total), field)
    }

    pub fn cell_value(&self, row: &CompositeKey, col: &CompositeKey, spec: &ValueSpec) -> f64 {
        spec.aggregation.reduce(self.cell_values(row, col, &spec.field))
    }

    pub fn row_total(&self, row: &CompositeKey, spec: &ValueSpec) -> f64 {
        spec.aggregation.reduce(self.row_total_values(row, &spec.field))
    }

    pub fn col_total(&self, col: &CompositeKey, spec: &ValueSpec) -> f64 {
        spec.aggregation.reduce(self.col_total_values(col, &spec.field))
    }

    pub fn grand_total(&self, spec: &ValueSpec) -> f64 {
        spec.aggregation.reduce(self.grand_total_values(&spec.field))
    }

    /// Switches the aggregation of every value spec on `field`. The raw
    /// lists are reused as they are.
    pub fn set_aggregation(&mut self, field: &str, aggregation: AggregationKind) {
        for spec in self.value_specs.iter_mut().filter(|v| v.field == field) {
            spec.aggregation = aggregation;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

// ============================================================================
// PIVOT BUILDER
// ============================================================================

/// Accumulates records into the four raw-value maps.
pub struct PivotBuilder<'a> {
    config: &'a PivotConfig,

    /// Distinct value fields; duplicates across specs share one list.
    value_fields: Vec<String>,

    cells: FxHashMap<CompositeKey, FxHashMap<CompositeKey, ValueLists>>,
    row_totals: FxHashMap<CompositeKey, ValueLists>,
    col_totals: FxHashMap<CompositeKey, ValueLists>,
    grand_total: ValueLists,
    record_count: usize,
}

impl<'a> PivotBuilder<'a> {
    pub fn new(config: &'a PivotConfig) -> Self {
        let value_fields = config.value_field_names();
        let grand_total = ValueLists::with_slots(value_fields.len());

        PivotBuilder {
            config,
            value_fields,
            cells: FxHashMap::default(),
            row_totals: FxHashMap::default(),
            col_totals: FxHashMap::default(),
            grand_total,
            record_count: 0,
        }
    }

    /// Adds one record to every accumulator it belongs to.
    pub fn add_record(&mut self, record: &Record) {
        let row_key = derive_key(record, &self.config.rows);
        let col_key = derive_key(record, &self.config.cols);
        let slots = self.value_fields.len();

        let cell = self
            .cells
            .entry(row_key.clone())
            .or_default()
            .entry(col_key.clone())
            .or_insert_with(|| ValueLists::with_slots(slots));
        let row_total = self
            .row_totals
            .entry(row_key)
            .or_insert_with(|| ValueLists::with_slots(slots));
        let col_total = self
            .col_totals
            .entry(col_key)
            .or_insert_with(|| ValueLists::with_slots(slots));

        for (slot, field) in self.value_fields.iter().enumerate() {
            let value = record.get(field);
            cell.push(slot, value.clone());
            row_total.push(slot, value.clone());
            col_total.push(slot, value.clone());
            self.grand_total.push(slot, value.clone());
        }

        self.record_count += 1;
    }

    /// Produces the pivot data with keys in ascending order.
    pub fn finish(self) -> PivotData {
        let row_keys = collect_keys(&self.config.rows, &self.row_totals);
        let col_keys = collect_keys(&self.config.cols, &self.col_totals);

        PivotData {
            row_fields: self.config.rows.clone(),
            col_fields: self.config.cols.clone(),
            value_specs: self.config.values.clone(),
            row_keys,
            col_keys,
            value_fields: self.value_fields,
            cells: self.cells,
            row_totals: self.row_totals,
            col_totals: self.col_totals,
            grand_total: self.grand_total,
            record_count: self.record_count,
        }
    }
}

/// Distinct keys in ascending order. A dimension without fields always has
/// exactly the total key, even over zero records.
fn collect_keys(fields: &[String], totals: &FxHashMap<CompositeKey, ValueLists>) -> Vec<CompositeKey> {
    if fields.is_empty() {
        return vec![CompositeKey::total()];
    }
    let mut keys: Vec<CompositeKey> = totals.keys().cloned().collect();
    keys.sort();
    keys
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Groups `records` by the configuration's row and column fields.
pub fn build_pivot<'r, I>(records: I, config: &PivotConfig) -> PivotData
where
    I: IntoIterator<Item = &'r Record>,
{
    log_enter!(
        "PIVOT",
        "build_pivot",
        "rows={:?} cols={:?} values={}",
        config.rows,
        config.cols,
        config.values.len()
    );

    let mut builder = PivotBuilder::new(config);
    for record in records {
        builder.add_record(record);
    }
    let data = builder.finish();

    log_exit!(
        "PIVOT",
        "build_pivot",
        "records={} row_keys={} col_keys={}",
        data.record_count,
        data.row_keys.len(),
        data.col_keys.len()
    );
    data
}

/// Full recomputation: filter, build, then sort. Returns a fresh result on
/// every call.
pub fn calculate_pivot(
    records: &[Record],
    config: &PivotConfig,
    filters: &FilterState,
    sorts: &SortState,
) -> PivotData {
    let filtered = apply_filters(records, filters);
    let mut data = build_pivot(filtered, config);
    apply_sorts(&mut data, sorts);
    data
}

/// Source records behind one pivot cell.
#[derive(Debug, Clone)]
pub struct DrillDown<'r> {
    pub row_key: CompositeKey,
    pub col_key: CompositeKey,
    /// Matching records, at most `max_records` of them.
    pub records: Vec<&'r Record>,
    pub total_count: usize,
    pub is_truncated: bool,
}

/// Finds the filtered records that fall into the (row, col) cell.
pub fn drill_down<'r>(
    records: &'r [Record],
    config: &PivotConfig,
    filters: &FilterState,
    row_key: &CompositeKey,
    col_key: &CompositeKey,
    max_records: usize,
) -> DrillDown<'r> {
    let mut result = DrillDown {
        row_key: row_key.clone(),
        col_key: col_key.clone(),
        records: Vec::new(),
        total_count: 0,
        is_truncated: false,
    };

    for record in apply_filters(records, filters) {
        let matches = derive_key(record, &config.rows) == *row_key
            && derive_key(record, &config.cols) == *col_key;
        if matches {
            result.total_count += 1;
            if result.records.len() < max_records {
                result.records.push(record);
            }
        }
    }

    result.is_truncated = result.total_count > max_records;
    log_debug!(
        "PIVOT",
        "drill_down row={} col={} count={}",
        row_key,
        col_key,
        result.total_count
    );
    result
}
