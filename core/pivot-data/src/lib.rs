//! FILENAME: core/pivot-data/src/lib.rs
//! Shared data types for the pivot engine.
//!
//! - `value`: the scalar a record field holds, plus its coercions
//! - `record`: a source row and the pivotable-field catalog
//! - `field_type`: per-field type inference used for defaults
//! - `style`: cell format and cell style settings
//! - `number_format`: numeric display formatting

pub mod field_type;
pub mod number_format;
pub mod record;
pub mod style;
pub mod value;

pub use field_type::{infer_field_type, infer_field_types, looks_like_date, FieldType};
pub use number_format::{format_number, format_optional, EXPONENT_THRESHOLD, PLACEHOLDER};
pub use record::{
    is_pivotable_field, pivotable_fields, records_from_columns, Record, ID_FIELD,
    MANUAL_SORT_FIELD,
};
pub use style::{CellFormat, CellStyle, CurrencyPosition, TextAlign};
pub use value::{number_to_string, parse_number_prefix, Value};
