//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("unknown aggregation kind: {0}")]
    UnknownAggregation(String),

    #[error("unknown comparison operator: {0}")]
    UnknownOperator(String),

    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("invalid pivot settings: {0}")]
    Settings(#[from] serde_json::Error),
}
