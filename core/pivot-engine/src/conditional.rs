//! FILENAME: core/pivot-engine/src/conditional.rs
//! PURPOSE: Conditional styling rules for aggregated pivot values.
//!
//! Rules are evaluated in order and the first match wins. A rule without a
//! field applies to every value field.

use std::fmt;
use std::str::FromStr;

use pivot_data::{CellStyle, Value};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PivotError;

// ============================================================================
// OPERATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ComparisonOperator {
    #[default]
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Equal,
    NotEqual,
    /// Inclusive range between `value` and `value2`, in either order.
    Between,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::LessThan => "lt",
            ComparisonOperator::LessThanOrEqual => "lte",
            ComparisonOperator::GreaterThan => "gt",
            ComparisonOperator::GreaterThanOrEqual => "gte",
            ComparisonOperator::Equal => "eq",
            ComparisonOperator::NotEqual => "neq",
            ComparisonOperator::Between => "between",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lt" => Ok(ComparisonOperator::LessThan),
            "lte" => Ok(ComparisonOperator::LessThanOrEqual),
            "gt" => Ok(ComparisonOperator::GreaterThan),
            "gte" => Ok(ComparisonOperator::GreaterThanOrEqual),
            "eq" => Ok(ComparisonOperator::Equal),
            "neq" => Ok(ComparisonOperator::NotEqual),
            "between" => Ok(ComparisonOperator::Between),
            other => Err(PivotError::UnknownOperator(other.to_string())),
        }
    }
}

impl TryFrom<String> for ComparisonOperator {
    type Error = PivotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComparisonOperator> for &'static str {
    fn from(operator: ComparisonOperator) -> Self {
        operator.as_str()
    }
}

// ============================================================================
// RULES
// ============================================================================

fn default_text_color() -> String {
    "#000000".to_string()
}

fn default_background_color() -> String {
    "#ffcccc".to_string()
}

/// An empty field name means "any field".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<String>::deserialize(deserializer)?;
    Ok(field.filter(|f| !f.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub operator: ComparisonOperator,
    /// Threshold; coerced to a number when evaluated.
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_background_color", alias = "bgColor")]
    pub background_color: String,
}

impl Default for ConditionalRule {
    fn default() -> Self {
        ConditionalRule {
            field: None,
            operator: ComparisonOperator::default(),
            value: Value::Number(0.0),
            value2: None,
            text_color: default_text_color(),
            background_color: default_background_color(),
        }
    }
}

impl ConditionalRule {
    pub fn new(operator: ComparisonOperator, value: impl Into<Value>) -> Self {
        ConditionalRule {
            operator,
            value: value.into(),
            ..ConditionalRule::default()
        }
    }

    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_upper(mut self, value2: impl Into<Value>) -> Self {
        self.value2 = Some(value2.into());
        self
    }

    pub fn with_colors(mut self, text_color: impl Into<String>, background_color: impl Into<String>) -> Self {
        self.text_color = text_color.into();
        self.background_color = background_color.into();
        self
    }

    pub fn applies_to(&self, field_name: &str) -> bool {
        self.field.as_deref().map_or(true, |f| f == field_name)
    }

    /// Compares an aggregated number against the threshold(s).
    pub fn matches(&self, number: f64) -> bool {
        let threshold = self.value.to_number();
        match self.operator {
            ComparisonOperator::LessThan => number < threshold,
            ComparisonOperator::LessThanOrEqual => number <= threshold,
            ComparisonOperator::GreaterThan => number > threshold,
            ComparisonOperator::GreaterThanOrEqual => number >= threshold,
            ComparisonOperator::Equal => number == threshold,
            ComparisonOperator::NotEqual => number != threshold,
            ComparisonOperator::Between => match &self.value2 {
                Some(upper) => {
                    let upper = upper.to_number();
                    let min = threshold.min(upper);
                    let max = threshold.max(upper);
                    number >= min && number <= max
                }
                None => false,
            },
        }
    }

    pub fn style(&self) -> CellStyle {
        CellStyle::new(self.text_color.clone(), self.background_color.clone())
    }
}

/// Style of the first rule that applies to `field_name` and matches
/// `value`, or `None`.
pub fn style_for(value: &Value, field_name: &str, rules: &[ConditionalRule]) -> Option<CellStyle> {
    let number = value.to_number();
    rules
        .iter()
        .find(|rule| rule.applies_to(field_name) && rule.matches(number))
        .map(ConditionalRule::style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            ConditionalRule::new(ComparisonOperator::GreaterThan, 100.0).with_colors("#fff", "#080"),
            ConditionalRule::new(ComparisonOperator::GreaterThan, 10.0).with_colors("#000", "#ff0"),
        ];
        let style = style_for(&Value::from(150.0), "Sales", &rules).unwrap();
        assert_eq!(style, CellStyle::new("#fff", "#080"));

        let style = style_for(&Value::from(50.0), "Sales", &rules).unwrap();
        assert_eq!(style.background_color, "#ff0");

        assert_eq!(style_for(&Value::from(5.0), "Sales", &rules), None);
    }

    #[test]
    fn test_field_scoped_rule() {
        let rules = vec![ConditionalRule::new(ComparisonOperator::LessThan, 0.0).for_field("Profit")];
        assert!(style_for(&Value::from(-1.0), "Profit", &rules).is_some());
        assert!(style_for(&Value::from(-1.0), "Sales", &rules).is_none());
    }

    #[test]
    fn test_operators() {
        let check = |op, threshold: f64, number: f64| ConditionalRule::new(op, threshold).matches(number);
        assert!(check(ComparisonOperator::LessThanOrEqual, 5.0, 5.0));
        assert!(!check(ComparisonOperator::LessThan, 5.0, 5.0));
        assert!(check(ComparisonOperator::GreaterThanOrEqual, 5.0, 5.0));
        assert!(check(ComparisonOperator::Equal, 5.0, 5.0));
        assert!(check(ComparisonOperator::NotEqual, 5.0, 4.0));
    }

    #[test]
    fn test_between_needs_upper_bound() {
        let open = ConditionalRule::new(ComparisonOperator::Between, 10.0);
        assert!(!open.matches(15.0));

        let closed = open.with_upper(20.0);
        assert!(closed.matches(10.0));
        assert!(closed.matches(20.0));
        assert!(!closed.matches(21.0));

        let reversed = ConditionalRule::new(ComparisonOperator::Between, 20.0).with_upper(10.0);
        assert!(reversed.matches(15.0));
    }

    #[test]
    fn test_threshold_text_coerces() {
        let rule = ConditionalRule::new(ComparisonOperator::GreaterThan, "abc");
        assert!(rule.matches(0.5));
    }

    #[test]
    fn test_rule_wire_format() {
        let json = r##"{"field": "", "operator": "gte", "value": 3, "textColor": "#111", "bgColor": "#eee"}"##;
        let rule: ConditionalRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.field, None);
        assert_eq!(rule.operator, ComparisonOperator::GreaterThanOrEqual);
        assert_eq!(rule.background_color, "#eee");

        let bad: Result<ConditionalRule, _> = serde_json::from_str(r#"{"operator": "like"}"#);
        assert!(bad.unwrap_err().to_string().contains("unknown comparison operator: like"));
    }
}
