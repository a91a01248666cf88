//! FILENAME: tests/common/mod.rs
//! Fixtures and assertion helpers for pivot engine integration tests.

#![allow(dead_code)]

use pivot_data::Record;
use pivot_engine::{CompositeKey, PivotView, ViewCell};

// ============================================================================
// FIXTURES
// ============================================================================

/// Standard sales dataset for pivot tests.
pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    /// The dataset as records, with a sequential `id`.
    pub fn records() -> Vec<Record> {
        Self::data()
            .into_iter()
            .enumerate()
            .map(|(i, (region, product, quarter, sales, quantity))| {
                Record::new()
                    .with("id", (i + 1) as i64)
                    .with("Region", region)
                    .with("Product", product)
                    .with("Quarter", quarter)
                    .with("Sales", sales)
                    .with("Quantity", quantity)
            })
            .collect()
    }
}

pub fn key(parts: &[&str]) -> CompositeKey {
    CompositeKey::from_components(parts.iter().copied())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert that two numbers are equal within a small tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.001,
        "expected {} but got {}",
        expected,
        actual
    );
}

pub fn row_texts(row: &[ViewCell]) -> Vec<&str> {
    row.iter().map(|c| c.text.as_str()).collect()
}

/// Assert that every header and body row spans the same number of columns.
pub fn assert_rectangular(view: &PivotView) {
    let width = view.col_count();
    for (i, w) in view.row_widths().into_iter().enumerate() {
        assert_eq!(w, width, "row {} spans {} columns, expected {}", i, w, width);
    }
}
