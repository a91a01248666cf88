//! FILENAME: core/pivot-data/src/number_format.rs
//! PURPOSE: Number formatting for aggregated pivot values.
//! CONTEXT: Converts the f64 an aggregator produced into the display string
//! a value cell shows, according to the caller's `CellFormat`.

use crate::style::{CellFormat, CurrencyPosition};
use crate::value::number_to_string;

/// Shown instead of NaN, infinities and missing values.
pub const PLACEHOLDER: &str = "-";

/// Magnitude from which numbers render in exponent notation.
pub const EXPONENT_THRESHOLD: f64 = 1e21;

/// Format a number according to the cell format.
pub fn format_number(value: f64, format: &CellFormat) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    // Exponent notation takes no grouping.
    if value.abs() >= EXPONENT_THRESHOLD {
        return apply_currency(number_to_string(value), &format.currency_symbol, format.currency_position);
    }

    let fixed = to_fixed(value, format.decimals);
    let grouped = group_digits(&fixed, &format.thousands_separator, format.effective_decimal_separator());
    apply_currency(grouped, &format.currency_symbol, format.currency_position)
}

/// Format an optional number; `None` renders as the placeholder.
pub fn format_optional(value: Option<f64>, format: &CellFormat) -> String {
    match value {
        Some(v) => format_number(v, format),
        None => PLACEHOLDER.to_string(),
    }
}

/// Fixed-point rendering of the exact binary value. Only an exact decimal
/// tie (2.5, 0.125, ...) rounds, and it rounds away from zero.
/// Integral values with zero decimals print without a fraction.
fn to_fixed(value: f64, decimals: u8) -> String {
    if decimals == 0 && value.fract() == 0.0 {
        return format!("{:.0}", normalize_zero(value));
    }

    let precision = decimals as usize;
    let magnitude = value.abs();
    let digits = if is_decimal_tie(magnitude, decimals) {
        // A tie ends exactly one digit past the cut, on a 5.
        let exact = format!("{:.prec$}", magnitude, prec = precision + 1);
        let kept = exact[..exact.len() - 1].trim_end_matches('.');
        round_up_last_digit(kept)
    } else {
        format!("{:.prec$}", magnitude, prec = precision)
    };

    let is_zero = !digits.bytes().any(|b| matches!(b, b'1'..=b'9'));
    if value < 0.0 && !is_zero {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Whether `magnitude * 10^decimals` lies exactly halfway between two
/// integers, i.e. `magnitude * 10^decimals * 2` is an odd integer.
fn is_decimal_tie(magnitude: f64, decimals: u8) -> bool {
    if magnitude == 0.0 || !magnitude.is_finite() {
        return false;
    }
    let bits = magnitude.to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };
    // 5^decimals is odd, so only the power of two decides.
    mantissa.trailing_zeros() as i32 + exponent + decimals as i32 + 1 == 0
}

/// Adds one unit in the last place of a plain decimal string.
fn round_up_last_digit(digits: &str) -> String {
    let mut chars: Vec<char> = digits.chars().collect();
    for i in (0..chars.len()).rev() {
        match chars[i] {
            '.' => continue,
            '9' => chars[i] = '0',
            c => {
                chars[i] = char::from(c as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }
    chars.insert(0, '1');
    chars.into_iter().collect()
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Inserts `thousands` between groups of three integer digits and swaps the
/// decimal point for `decimal`.
fn group_digits(s: &str, thousands: &str, decimal: &str) -> String {
    let (integer_part, fraction_part) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut result = String::with_capacity(s.len() + digits.len() / 3 * thousands.len());
    result.push_str(sign);

    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(thousands);
        }
        result.push(c);
    }

    if let Some(fraction) = fraction_part {
        result.push_str(decimal);
        result.push_str(fraction);
    }

    result
}

fn apply_currency(formatted: String, symbol: &str, position: CurrencyPosition) -> String {
    if symbol.is_empty() {
        return formatted;
    }
    match position {
        CurrencyPosition::Before => format!("{} {}", symbol, formatted),
        CurrencyPosition::After => format!("{} {}", formatted, symbol),
    }
}
