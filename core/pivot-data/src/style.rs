//! FILENAME: core/pivot-data/src/style.rs
//! PURPOSE: Display settings for aggregated value cells.
//! CONTEXT: `CellFormat` drives `number_format::format_number`; `CellStyle`
//! is what a matching conditional rule hands to the renderer.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of value cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    #[default]
    Right,
}

/// Which side of the number the currency symbol goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPosition {
    Before, // $ 100
    #[default]
    After, // 100 $
}

/// Numeric display configuration shared by every value cell.
///
/// Field aliases accept the short names older saved settings used
/// (`thousands`, `currency`, `currencyPos`, `align`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellFormat {
    /// Fixed number of fraction digits.
    pub decimals: u8,

    /// Inserted between digit groups of the integer part. Empty disables grouping.
    #[serde(alias = "thousands")]
    pub thousands_separator: String,

    /// Placed between the integer and fraction parts. When unset, `,` is
    /// used with a thousands separator and `.` without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_separator: Option<String>,

    /// Empty means no currency.
    #[serde(alias = "currency")]
    pub currency_symbol: String,

    #[serde(alias = "currencyPos")]
    pub currency_position: CurrencyPosition,

    #[serde(alias = "align")]
    pub alignment: TextAlign,
}

impl Default for CellFormat {
    fn default() -> Self {
        CellFormat {
            decimals: 2,
            thousands_separator: " ".to_string(),
            decimal_separator: None,
            currency_symbol: String::new(),
            currency_position: CurrencyPosition::After,
            alignment: TextAlign::Right,
        }
    }
}

impl CellFormat {
    /// Plain format: no grouping, no currency, `decimals` fraction digits.
    pub fn plain(decimals: u8) -> Self {
        CellFormat {
            decimals,
            thousands_separator: String::new(),
            ..CellFormat::default()
        }
    }

    pub fn with_decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = Some(separator.into());
        self
    }

    /// The separator actually placed before the fraction digits.
    pub fn effective_decimal_separator(&self) -> &str {
        match &self.decimal_separator {
            Some(separator) => separator.as_str(),
            None if self.thousands_separator.is_empty() => ".",
            None => ",",
        }
    }

    pub fn with_currency(mut self, symbol: impl Into<String>, position: CurrencyPosition) -> Self {
        self.currency_symbol = symbol.into();
        self.currency_position = position;
        self
    }
}

/// Text and background colors (CSS color strings) for a styled cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    pub text_color: String,
    pub background_color: String,
}

impl CellStyle {
    pub fn new(text_color: impl Into<String>, background_color: impl Into<String>) -> Self {
        CellStyle {
            text_color: text_color.into(),
            background_color: background_color.into(),
        }
    }

    /// Inline CSS fragment, e.g. `color:#000000;background:#ffcccc;`.
    pub fn to_css(&self) -> String {
        format!("color:{};background:{};", self.text_color, self.background_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_format_defaults_fill_missing_fields() {
        let format: CellFormat = serde_json::from_str(r#"{"decimals": 0}"#).unwrap();
        assert_eq!(format.decimals, 0);
        assert_eq!(format.thousands_separator, " ");
        assert_eq!(format.currency_position, CurrencyPosition::After);
        assert_eq!(format.alignment, TextAlign::Right);
    }

    #[test]
    fn test_cell_format_accepts_short_names() {
        let format: CellFormat = serde_json::from_str(
            r#"{"decimals": 1, "thousands": ",", "currency": "EUR", "currencyPos": "before", "align": "center"}"#,
        )
        .unwrap();
        assert_eq!(format.thousands_separator, ",");
        assert_eq!(format.currency_symbol, "EUR");
        assert_eq!(format.currency_position, CurrencyPosition::Before);
        assert_eq!(format.alignment, TextAlign::Center);
    }

    #[test]
    fn test_decimal_separator_follows_grouping_when_unset() {
        assert_eq!(CellFormat::default().effective_decimal_separator(), ",");
        assert_eq!(CellFormat::plain(2).effective_decimal_separator(), ".");

        let explicit = CellFormat::default().with_decimal_separator(".");
        assert_eq!(explicit.effective_decimal_separator(), ".");

        let legacy: CellFormat = serde_json::from_str(r#"{"decimals": 2, "thousands": ","}"#).unwrap();
        assert_eq!(legacy.decimal_separator, None);
        assert_eq!(legacy.effective_decimal_separator(), ",");
    }

    #[test]
    fn test_style_css() {
        let style = CellStyle::new("#000000", "#ffcccc");
        assert_eq!(style.to_css(), "color:#000000;background:#ffcccc;");
    }
}
