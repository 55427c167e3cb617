//! Minimal wire value model for point definitions.
//!
//! Point definitions arrive either as JSON text or as a tree built by a host
//! through the C boundary. Both are lowered into [`Value`] before parsing, so
//! the parser only deals with numbers, strings, nulls and arrays.

use serde_json::Value as JsonValue;

use crate::error::ParseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Null,
    String,
    Array,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Null,
    String(String),
    Array(Vec<Value>),
}

impl Value {
    #[inline]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::Null => ValueType::Null,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
        }
    }

    /// Convenience constructors
    pub fn number(v: f64) -> Self {
        Value::Number(v)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Build a flat numeric array, the common shape of a single keyframe.
    pub fn numbers(items: &[f64]) -> Self {
        Value::Array(items.iter().copied().map(Value::Number).collect())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Parse JSON text into the value model.
    pub fn from_json_str(s: &str) -> Result<Value, ParseError> {
        let json: JsonValue =
            serde_json::from_str(s).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
        Ok(Value::from(json))
    }

    /// Serialize back to compact JSON text.
    pub fn to_json_string(&self) -> String {
        JsonValue::from(self).to_string()
    }
}

/// Booleans collapse to `0`/`1` and objects to `Null`; neither shape carries
/// meaning inside a point definition.
impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Number(if b { 1.0 } else { 0.0 }),
            JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(_) => Value::Null,
        }
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Null => JsonValue::Null,
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(items) => JsonValue::Array(items.iter().map(JsonValue::from).collect()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
