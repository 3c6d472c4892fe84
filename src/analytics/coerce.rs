//! Field coercion
//!
//! Total functions turning raw JSON field values into display numbers and
//! strings. Malformed input degrades to `0` or a fallback, never an error.

use serde_json::Value;

/// Decimal places used when no precision is given
pub const DEFAULT_DECIMALS: u32 = 2;

/// Display string for a missing field
pub const MISSING: &str = "-";

/// Extra digits rendered when checking for an exact rounding tie
const TIE_PROBE_DIGITS: usize = 24;

/// Coerce a raw value to a finite number rounded to `decimals` places.
///
/// Numbers pass through. Strings are parsed from their leading decimal
/// literal (`"12.5%"` is 12.5). Anything else, including a missing field,
/// a non-numeric string or a non-finite result, yields `0.0`.
pub fn coerce_number(value: Option<&Value>, decimals: u32) -> f64 {
    let parsed = match value {
        Some(Value::Number(num)) => num.as_f64(),
        Some(Value::String(s)) => parse_leading_float(s),
        _ => None,
    };

    parsed.map_or(0.0, |x| coerce_f64(x, decimals))
}

/// Round an already-numeric value, mapping NaN and infinities to `0.0`.
pub fn coerce_f64(x: f64, decimals: u32) -> f64 {
    if x.is_finite() {
        round_to(x, decimals)
    } else {
        0.0
    }
}

/// String form of a raw value, or [`MISSING`] when absent or null.
pub fn present(value: Option<&Value>) -> String {
    present_or(value, MISSING)
}

/// String form of a raw value, or `fallback` when absent or null.
pub fn present_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) => fallback.to_string(),
        Some(v) => display_string(v),
    }
}

fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(num) => match num.as_f64() {
            // 2019.0 renders as "2019"
            Some(f) if num.is_f64() => f.to_string(),
            _ => num.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Parse the longest leading decimal literal of `s`, after leading whitespace.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };

    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_count = frac_end - (end + 1);
        if digit_count > 0 || frac_count > 0 {
            digit_count += frac_count;
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Round to `decimals` places on the exact decimal value of `x`.
/// Exact ties round away from zero.
fn round_to(x: f64, decimals: u32) -> f64 {
    let places = decimals as usize;
    let magnitude = x.abs();

    let probe = format!("{:.*}", places + TIE_PROBE_DIGITS, magnitude);
    let target = if is_exact_tie(&probe, places) {
        f64::from_bits(magnitude.to_bits() + 1)
    } else {
        magnitude
    };

    let rounded: f64 = format!("{:.*}", places, target).parse().unwrap_or(0.0);
    if rounded == 0.0 {
        0.0
    } else {
        rounded.copysign(x)
    }
}

fn is_exact_tie(probe: &str, places: usize) -> bool {
    let Some((_, frac)) = probe.split_once('.') else {
        return false;
    };
    let frac = frac.as_bytes();
    frac.get(places) == Some(&b'5') && frac[places + 1..].iter().all(|&d| d == b'0')
}
