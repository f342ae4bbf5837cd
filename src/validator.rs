//! Bounded coercion of untrusted pattern values.
//!
//! Model output is arbitrary JSON. Nothing here fails: a value that cannot
//! be read as a number becomes the caller's default, and a number outside
//! the allowed range is clamped to the nearest bound.

use serde_json::Value;

use crate::pattern::{Behavior, FieldRange};

/// Reads `raw` as a real number.
///
/// JSON numbers are taken as-is and strings are trimmed and parsed. Every
/// other shape (missing, `null`, booleans, arrays, objects) and NaN yield
/// `None`.
pub fn parse_number(raw: Option<&Value>) -> Option<f64> {
    let number = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (!number.is_nan()).then_some(number)
}

/// Coerces `raw` into `[min, max]`, substituting `default` when it is not a
/// number.
pub fn coerce(raw: Option<&Value>, default: f64, min: f64, max: f64) -> f64 {
    debug_assert!(
        (min..=max).contains(&default),
        "default {default} outside [{min}, {max}]"
    );
    match parse_number(raw) {
        Some(n) => n.clamp(min, max),
        None => default,
    }
}

/// [`coerce`] against a [`FieldRange`].
pub fn coerce_in(raw: Option<&Value>, default: f64, range: FieldRange) -> f64 {
    coerce(raw, default, range.min, range.max)
}

/// Restricts `raw` to one of the four behavior labels, else
/// [`Behavior::Standard`].
pub fn validate_behavior(raw: Option<&Value>) -> Behavior {
    raw.and_then(Value::as_str)
        .and_then(Behavior::from_label)
        .unwrap_or_default()
}
