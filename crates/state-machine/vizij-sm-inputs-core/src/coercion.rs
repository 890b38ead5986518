//! Coercion helpers between host values and input payloads.
//!
//! Two rule sets exist:
//! - strict (`as_*`): used by `set_value`; only the matching kind is accepted
//! - lenient (`to_*`): used when routing host property notifications, where the
//!   host may store numbers as text or booleans as numbers

use crate::Value;

/// Float and Int only.
pub fn as_number(v: &Value) -> Option<f32> {
    match v {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f32),
        _ => None,
    }
}

/// Bool only.
pub fn as_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Attempt to read a Value as a number.
/// Rules:
/// - Float / Int -> numeric value
/// - Bool -> 1.0 / 0.0
/// - Text -> parsed after trimming, `None` when it does not parse
pub fn to_number(v: &Value) -> Option<f32> {
    match v {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f32),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => s.trim().parse::<f32>().ok(),
    }
}

/// Attempt to read a Value as a boolean.
/// Rules:
/// - Bool -> itself
/// - Float / Int -> non-zero
/// - Text -> "true"/"false"/"1"/"0" (case-insensitive)
pub fn to_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Float(f) => Some(*f != 0.0),
        Value::Int(i) => Some(*i != 0),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_rules_reject_other_kinds() {
        assert_eq!(as_number(&Value::Int(2)), Some(2.0));
        assert_eq!(as_number(&Value::Bool(true)), None);
        assert_eq!(as_bool(&Value::Float(1.0)), None);
        assert_eq!(as_bool(&Value::Bool(false)), Some(false));
    }

    #[test]
    fn lenient_rules_convert_text_and_numbers() {
        assert_eq!(to_number(&Value::Text(" 1.5 ".into())), Some(1.5));
        assert_eq!(to_number(&Value::Text("fast".into())), None);
        assert_eq!(to_number(&Value::Bool(true)), Some(1.0));
        assert_eq!(to_bool(&Value::Text("TRUE".into())), Some(true));
        assert_eq!(to_bool(&Value::Int(0)), Some(false));
        assert_eq!(to_bool(&Value::Text("maybe".into())), None);
    }
}
