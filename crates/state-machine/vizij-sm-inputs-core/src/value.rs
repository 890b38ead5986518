//! Value: dynamically typed values exchanged with the host.
//! Numbers use f32 to match engine input storage.

use serde::{Deserialize, Serialize};

use crate::machine::InputKind;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Integer as produced by host bindings that keep ints apart from floats
    Int(i64),

    /// Boolean
    Bool(bool),

    /// Text; never accepted by `set_value`, only coerced by change routing
    Text(String),
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Current value of a queryable (non-trigger) state-machine input.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum InputValue {
    Number(f32),
    Boolean(bool),
}

impl InputValue {
    #[inline]
    pub fn kind(&self) -> InputKind {
        match self {
            InputValue::Number(_) => InputKind::Number,
            InputValue::Boolean(_) => InputKind::Boolean,
        }
    }

    /// True when `value` carries the same payload. Ints compare numerically
    /// against numbers and NaN matches NaN; anything else of the wrong type
    /// never matches.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (InputValue::Number(n), Value::Float(f)) => n == f || (n.is_nan() && f.is_nan()),
            (InputValue::Number(n), Value::Int(i)) => *n == *i as f32,
            (InputValue::Boolean(b), Value::Bool(v)) => b == v,
            _ => false,
        }
    }
}

impl From<InputValue> for Value {
    fn from(v: InputValue) -> Self {
        match v {
            InputValue::Number(n) => Value::Float(n),
            InputValue::Boolean(b) => Value::Bool(b),
        }
    }
}
