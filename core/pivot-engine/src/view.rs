//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Renderable output for the frontend.
//!
//! Transforms built pivot data into a 2D grid of header rows and body rows.
//! Every value cell carries its formatted text, the raw aggregate, the
//! alignment from the cell format and the conditional style that matched,
//! plus the keys needed to drill down into it.
//!
//! Layout:
//! - Header row 1: row field names (or a corner cell), then one header per
//!   column key spanning all value fields, then a "Total" header
//! - Header row 2: value headers under every column key (only when there are
//!   column fields and more than one value field)
//! - Body: one row per row key, followed by the grand total row

use pivot_data::{format_number, CellFormat, CellStyle, TextAlign, Value};
use serde::{Deserialize, Serialize};

use crate::conditional::{style_for, ConditionalRule};
use crate::definition::{DisplayOptions, ValueSpec};
use crate::engine::PivotData;
use crate::filter::EMPTY_LABEL;
use crate::key::{CompositeKey, LABEL_SEPARATOR};
use crate::{log_enter, log_exit};

pub const TOTAL_LABEL: &str = "Total";
pub const GRAND_TOTAL_LABEL: &str = "Grand total";

// ============================================================================
// CELL TYPES
// ============================================================================

/// The type of a cell in the pivot view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCellType {
    /// Empty corner cell (top-left area).
    Corner,
    /// Name of a row field, above the row headers.
    FieldHeader,
    /// Column key label.
    ColumnHeader,
    /// Value field header, e.g. `Sales (Sum)`.
    ValueHeader,
    /// One component of a row key.
    RowHeader,
    /// Aggregated value of a (row, column) cell.
    Data,
    /// Per-row total across columns.
    RowTotal,
    /// Per-column total across rows.
    ColumnTotal,
    /// Intersection of row and column totals.
    GrandTotal,
    /// "Total" / "Grand total" captions.
    TotalLabel,
    /// Blank cell (for layout purposes).
    Blank,
}

// ============================================================================
// VIEW CELL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCell {
    /// Pre-formatted display string.
    pub text: String,

    pub cell_type: ViewCellType,

    pub col_span: u16,

    /// Raw aggregate behind a value cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,

    /// Drill-down coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_key: Option<CompositeKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_key: Option<CompositeKey>,
}

impl ViewCell {
    fn label(text: impl Into<String>, cell_type: ViewCellType) -> Self {
        ViewCell {
            text: text.into(),
            cell_type,
            col_span: 1,
            value: None,
            align: None,
            style: None,
            row_key: None,
            col_key: None,
        }
    }

    pub fn blank() -> Self {
        ViewCell::label("", ViewCellType::Blank)
    }

    fn spanning(mut self, col_span: usize) -> Self {
        self.col_span = u16::try_from(col_span.max(1)).unwrap_or(u16::MAX);
        self
    }

    fn at(mut self, row_key: Option<&CompositeKey>, col_key: Option<&CompositeKey>) -> Self {
        self.row_key = row_key.cloned();
        self.col_key = col_key.cloned();
        self
    }

    pub fn is_value(&self) -> bool {
        self.value.is_some()
    }
}

// ============================================================================
// VIEW
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotView {
    pub header_rows: Vec<Vec<ViewCell>>,
    pub body_rows: Vec<Vec<ViewCell>>,
}

impl PivotView {
    /// Grid width in columns, spans included.
    pub fn col_count(&self) -> usize {
        self.header_rows
            .first()
            .map_or(0, |row| row.iter().map(|c| c.col_span as usize).sum())
    }

    pub fn row_count(&self) -> usize {
        self.header_rows.len() + self.body_rows.len()
    }

    /// Widths of every row, spans included.
    pub fn row_widths(&self) -> Vec<usize> {
        self.header_rows
            .iter()
            .chain(self.body_rows.iter())
            .map(|row| row.iter().map(|c| c.col_span as usize).sum())
            .collect()
    }

    /// Iterates over all cells in grid order.
    pub fn cells(&self) -> impl Iterator<Item = &ViewCell> {
        self.header_rows
            .iter()
            .chain(self.body_rows.iter())
            .flat_map(|row| row.iter())
    }
}

fn component_text(component: &str) -> &str {
    if component.is_empty() {
        EMPTY_LABEL
    } else {
        component
    }
}

/// Key label with empty components shown as `(empty)`.
fn display_label(key: &CompositeKey) -> String {
    key.components()
        .iter()
        .map(|c| component_text(c))
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

// ============================================================================
// RENDERER
// ============================================================================

struct ViewRenderer<'a> {
    data: &'a PivotData,
    format: &'a CellFormat,
    rules: &'a [ConditionalRule],
    show_row_totals: bool,
    show_col_totals: bool,
}

impl<'a> ViewRenderer<'a> {
    fn has_cols(&self) -> bool {
        !self.data.col_fields.is_empty()
    }

    fn value_cell(
        &self,
        value: f64,
        spec: &ValueSpec,
        cell_type: ViewCellType,
        styled: bool,
        row_key: Option<&CompositeKey>,
        col_key: Option<&CompositeKey>,
    ) -> ViewCell {
        let style = if styled {
            style_for(&Value::Number(value), &spec.field, self.rules)
        } else {
            None
        };
        ViewCell {
            text: format_number(value, self.format),
            cell_type,
            col_span: 1,
            value: Some(value),
            align: Some(self.format.alignment),
            style,
            row_key: row_key.cloned(),
            col_key: col_key.cloned(),
        }
    }

    fn render(&self) -> PivotView {
        let mut view = PivotView::default();
        self.render_headers(&mut view);
        for row_key in &self.data.row_keys {
            view.body_rows.push(self.render_body_row(row_key));
        }
        if !self.data.row_fields.is_empty() && self.show_col_totals {
            view.body_rows.push(self.render_grand_total_row());
        }
        view
    }

    fn render_headers(&self, view: &mut PivotView) {
        let data = self.data;
        let specs = &data.value_specs;
        let mut first = Vec::new();

        if data.row_fields.is_empty() {
            first.push(ViewCell::label("", ViewCellType::Corner));
        } else {
            first.extend(
                data.row_fields
                    .iter()
                    .map(|f| ViewCell::label(f.as_str(), ViewCellType::FieldHeader)),
            );
        }

        if self.has_cols() {
            for col_key in &data.col_keys {
                first.push(
                    ViewCell::label(display_label(col_key), ViewCellType::ColumnHeader)
                        .spanning(specs.len())
                        .at(None, Some(col_key)),
                );
            }
            if self.show_row_totals && !specs.is_empty() {
                first.push(ViewCell::label(TOTAL_LABEL, ViewCellType::TotalLabel).spanning(specs.len()));
            }
        } else {
            first.extend(specs.iter().map(|s| ViewCell::label(s.header(), ViewCellType::ValueHeader)));
        }
        view.header_rows.push(first);

        if self.has_cols() && specs.len() > 1 {
            let mut second: Vec<ViewCell> = (0..data.row_fields.len().max(1))
                .map(|_| ViewCell::blank())
                .collect();
            let groups = data.col_keys.len() + usize::from(self.show_row_totals);
            for _ in 0..groups {
                second.extend(specs.iter().map(|s| ViewCell::label(s.header(), ViewCellType::ValueHeader)));
            }
            view.header_rows.push(second);
        }
    }

    fn render_body_row(&self, row_key: &CompositeKey) -> Vec<ViewCell> {
        let data = self.data;
        let mut row = Vec::new();

        if data.row_fields.is_empty() {
            row.push(ViewCell::label(TOTAL_LABEL, ViewCellType::TotalLabel));
        } else {
            for component in row_key.components() {
                row.push(ViewCell::label(component_text(component), ViewCellType::RowHeader).at(Some(row_key), None));
            }
        }

        if self.has_cols() {
            for col_key in &data.col_keys {
                if data.value_specs.is_empty() {
                    row.push(ViewCell::blank());
                }
                for spec in &data.value_specs {
                    let value = data.cell_value(row_key, col_key, spec);
                    row.push(self.value_cell(value, spec, ViewCellType::Data, true, Some(row_key), Some(col_key)));
                }
            }
            if self.show_row_totals {
                for spec in &data.value_specs {
                    let value = data.row_total(row_key, spec);
                    row.push(self.value_cell(value, spec, ViewCellType::RowTotal, false, Some(row_key), None));
                }
            }
        } else {
            let total = CompositeKey::total();
            for spec in &data.value_specs {
                let value = data.row_total(row_key, spec);
                row.push(self.value_cell(value, spec, ViewCellType::Data, true, Some(row_key), Some(&total)));
            }
        }
        row
    }

    fn render_grand_total_row(&self) -> Vec<ViewCell> {
        let data = self.data;
        let mut row = vec![
            ViewCell::label(GRAND_TOTAL_LABEL, ViewCellType::TotalLabel).spanning(data.row_fields.len()),
        ];

        if self.has_cols() {
            for col_key in &data.col_keys {
                if data.value_specs.is_empty() {
                    row.push(ViewCell::blank());
                }
                for spec in &data.value_specs {
                    let value = data.col_total(col_key, spec);
                    row.push(self.value_cell(value, spec, ViewCellType::ColumnTotal, false, None, Some(col_key)));
                }
            }
            if self.show_row_totals {
                for spec in &data.value_specs {
                    let value = data.grand_total(spec);
                    row.push(self.value_cell(value, spec, ViewCellType::GrandTotal, false, None, None));
                }
            }
        } else {
            for spec in &data.value_specs {
                let value = data.grand_total(spec);
                row.push(self.value_cell(value, spec, ViewCellType::GrandTotal, false, None, None));
            }
        }
        row
    }
}

/// Renders `data` as a grid with formatting and conditional styles applied.
pub fn render_view(
    data: &PivotData,
    format: &CellFormat,
    rules: &[ConditionalRule],
    display: &DisplayOptions,
) -> PivotView {
    log_enter!(
        "VIEW",
        "render_view",
        "row_keys={} col_keys={} totals={:?}",
        data.row_keys.len(),
        data.col_keys.len(),
        display.grand_totals
    );

    let renderer = ViewRenderer {
        data,
        format,
        rules,
        show_row_totals: display.grand_totals.shows_row_totals(),
        show_col_totals: display.grand_totals.shows_column_totals(),
    };
    let view = renderer.render();

    log_exit!("VIEW", "render_view", "rows={} cols={}", view.row_count(), view.col_count());
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditional::ComparisonOperator;
    use crate::definition::{AggregationKind, GrandTotals, PivotConfig};
    use crate::engine::build_pivot;
    use pivot_data::Record;

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("Region", "North").with("Quarter", "Q1").with("Sales", 100.0),
            Record::new().with("Region", "North").with("Quarter", "Q2").with("Sales", 150.0),
            Record::new().with("Region", "South").with("Quarter", "Q1").with("Sales", 200.0),
            Record::new().with("Quarter", "Q2").with("Sales", 50.0),
        ]
    }

    fn cross_tab(values: Vec<ValueSpec>) -> PivotData {
        let config = PivotConfig::new(vec!["Region".to_string()], vec!["Quarter".to_string()], values);
        build_pivot(&records(), &config)
    }

    fn texts(row: &[ViewCell]) -> Vec<&str> {
        row.iter().map(|c| c.text.as_str()).collect()
    }

    fn display(grand_totals: GrandTotals) -> DisplayOptions {
        DisplayOptions {
            grand_totals,
            ..DisplayOptions::default()
        }
    }

    #[test]
    fn test_cross_tab_layout() {
        let data = cross_tab(vec![ValueSpec::new("Sales", AggregationKind::Sum)]);
        let view = render_view(&data, &CellFormat::plain(0), &[], &DisplayOptions::default());

        assert_eq!(view.header_rows.len(), 1);
        assert_eq!(texts(&view.header_rows[0]), vec!["Region", "Q1", "Q2", "Total"]);

        // "(empty)" row key sorts first as ""
        assert_eq!(texts(&view.body_rows[0]), vec!["(empty)", "0", "50", "50"]);
        assert_eq!(texts(&view.body_rows[1]), vec!["North", "100", "150", "250"]);
        assert_eq!(texts(&view.body_rows[3]), vec!["Grand total", "300", "200", "500"]);
        assert_eq!(view.body_rows[3][3].cell_type, ViewCellType::GrandTotal);

        let widths = view.row_widths();
        assert!(widths.iter().all(|&w| w == view.col_count()), "{:?}", widths);
    }

    #[test]
    fn test_multiple_values_add_second_header_row() {
        let data = cross_tab(vec![
            ValueSpec::new("Sales", AggregationKind::Sum),
            ValueSpec::new("Sales", AggregationKind::Count),
        ]);
        let view = render_view(&data, &CellFormat::plain(0), &[], &DisplayOptions::default());

        assert_eq!(view.header_rows.len(), 2);
        assert_eq!(view.header_rows[0][1].col_span, 2);
        assert_eq!(
            texts(&view.header_rows[1]),
            vec!["", "Sales (Sum)", "Sales (Count)", "Sales (Sum)", "Sales (Count)", "Sales (Sum)", "Sales (Count)"]
        );
        let widths = view.row_widths();
        assert!(widths.iter().all(|&w| w == 7), "{:?}", widths);
    }

    #[test]
    fn test_grand_totals_modes() {
        let data = cross_tab(vec![ValueSpec::new("Sales", AggregationKind::Sum)]);
        let format = CellFormat::plain(0);

        let hidden = render_view(&data, &format, &[], &display(GrandTotals::Hide));
        assert_eq!(hidden.body_rows.len(), 3);
        assert_eq!(hidden.col_count(), 3);

        let rows_only = render_view(&data, &format, &[], &display(GrandTotals::Rows));
        assert_eq!(rows_only.body_rows.len(), 3);
        assert_eq!(rows_only.col_count(), 4);

        let cols_only = render_view(&data, &format, &[], &display(GrandTotals::Cols));
        assert_eq!(cols_only.body_rows.len(), 4);
        assert_eq!(texts(cols_only.body_rows.last().unwrap()), vec!["Grand total", "300", "200"]);
    }

    #[test]
    fn test_total_only_view() {
        let config = PivotConfig::new(vec![], vec![], vec![ValueSpec::new("Sales", AggregationKind::Avg)]);
        let data = build_pivot(&records(), &config);
        let view = render_view(&data, &CellFormat::plain(1), &[], &DisplayOptions::default());

        assert_eq!(texts(&view.header_rows[0]), vec!["", "Sales (Average)"]);
        assert_eq!(view.body_rows.len(), 1);
        assert_eq!(texts(&view.body_rows[0]), vec!["Total", "125.0"]);
    }

    #[test]
    fn test_conditional_style_only_on_data_cells() {
        let data = cross_tab(vec![ValueSpec::new("Sales", AggregationKind::Sum)]);
        let rules = vec![ConditionalRule::new(ComparisonOperator::GreaterThanOrEqual, 150.0)];
        let view = render_view(&data, &CellFormat::default(), &rules, &DisplayOptions::default());

        let north = &view.body_rows[1];
        assert_eq!(north[1].style, None);
        assert_eq!(north[2].style, Some(CellStyle::new("#000000", "#ffcccc")));
        assert_eq!(north[3].cell_type, ViewCellType::RowTotal);
        assert_eq!(north[3].style, None);
        assert_eq!(north[2].align, Some(TextAlign::Right));
        assert_eq!(north[2].text, "150,00");
    }

    #[test]
    fn test_value_cells_carry_drill_down_keys() {
        let data = cross_tab(vec![ValueSpec::new("Sales", AggregationKind::Sum)]);
        let view = render_view(&data, &CellFormat::default(), &[], &DisplayOptions::default());

        let cell = &view.body_rows[2][1];
        assert_eq!(cell.row_key, Some(CompositeKey::from_components(["South"])));
        assert_eq!(cell.col_key, Some(CompositeKey::from_components(["Q1"])));
        assert_eq!(cell.value, Some(200.0));
    }

    #[test]
    fn test_only_aggregate_cells_are_values() {
        let data = cross_tab(vec![ValueSpec::new("Sales", AggregationKind::Sum)]);
        let view = render_view(&data, &CellFormat::plain(0), &[], &DisplayOptions::default());

        assert!(view.header_rows[0].iter().all(|c| !c.is_value()));
        let north = &view.body_rows[1];
        assert!(!north[0].is_value());
        assert!(north[1..].iter().all(ViewCell::is_value));
        assert!(view.body_rows[3][3].is_value());
        assert!(!view.body_rows[3][0].is_value());
        assert!(!ViewCell::blank().is_value());
    }
}
