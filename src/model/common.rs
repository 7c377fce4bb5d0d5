use serde::{Deserialize, Serialize};

/// Dynamic attribute value. Symbols from the declaring side are plain strings here.
pub type Value = serde_json::Value;

/// Ordered name -> value mapping used for snapshots and bulk assignment.
pub type ValueMap = serde_json::Map<String, Value>;

/// Index of a class record in the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Blank values are null, false, whitespace-only strings and empty collections.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

pub fn is_present(value: &Value) -> bool {
    !is_blank(value)
}

/// Anything but null and false.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Blank input collapses to null.
pub fn presence(value: Value) -> Value {
    if is_blank(&value) {
        Value::Null
    } else {
        value
    }
}

/// Lenient numeric coercion: numbers as-is, strings by their leading numeric
/// prefix, everything else 0.0.
pub fn to_f(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s),
        _ => 0.0,
    }
}

/// Builds a JSON number, null for non-finite input.
pub fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Strict numeric check used by numericality validation: numbers, and
/// strings that are a complete decimal literal (`"1_000"`, `" -2.5e3 "`,
/// `".5"`; not `"5."`, `"0x1A"` or `"inf"`).
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => is_decimal_literal(s.trim()),
        _ => false,
    }
}

fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let integer = digit_run(bytes, sign);
    let mut end = integer.unwrap_or(sign);
    if bytes.get(end) == Some(&b'.') {
        match digit_run(bytes, end + 1) {
            Some(fraction) => end = fraction,
            None => return false,
        }
    } else if integer.is_none() {
        return false;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exponent = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        match digit_run(bytes, exponent) {
            Some(exponent_end) => end = exponent_end,
            None => return false,
        }
    }
    end == bytes.len()
}

fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let mut end = digit_run(bytes, sign).unwrap_or(sign);
    if bytes.get(end) == Some(&b'.') {
        if let Some(fraction) = digit_run(bytes, end + 1) {
            end = fraction;
        }
    }
    if end == sign {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exponent = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        if let Some(exponent_end) = digit_run(bytes, exponent) {
            end = exponent_end;
        }
    }

    s[..end].replace('_', "").parse().unwrap_or(0.0)
}

/// End of a digit run starting at `start`; single underscores may separate
/// digits (`1_000`). `None` when no digit starts there.
fn digit_run(bytes: &[u8], start: usize) -> Option<usize> {
    let mut end = start;
    while end < bytes.len() {
        let separator = bytes[end] == b'_'
            && end > start
            && bytes[end - 1].is_ascii_digit()
            && bytes.get(end + 1).is_some_and(u8::is_ascii_digit);
        if !(bytes[end].is_ascii_digit() || separator) {
            break;
        }
        end += 1;
    }
    (end > start).then_some(end)
}
