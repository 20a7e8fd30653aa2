//! In-memory values flowing through mapping rules and transforms.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// A value extracted from a raw record, produced by a transform, or stored
/// in a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Convert a JSON value without going through floating point.
    ///
    /// A number outside the range `Decimal` can hold (`1.5e300`) is kept as
    /// its JSON text in a `Value::Text`, so a transform chain sees the digits
    /// the supplier sent rather than a rounded value.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Bool(*flag),
            JsonValue::Number(number) => number_to_value(number),
            JsonValue::String(text) => Value::Text(text.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(decimal) => Some(*decimal),
            Value::Integer(int) => Some(Decimal::from(*int)),
            _ => None,
        }
    }

    /// Short variant name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

fn number_to_value(number: &serde_json::Number) -> Value {
    if let Some(int) = number.as_i64() {
        return Value::Integer(int);
    }
    if let Some(unsigned) = number.as_u64() {
        return Value::Decimal(Decimal::from(unsigned));
    }
    let text = number.to_string();
    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(decimal) => Value::Decimal(decimal),
        Err(error) => {
            tracing::debug!(number = %text, %error, "number out of decimal range; kept as text");
            Value::Text(text)
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::Integer(int) => write!(f, "{}", int),
            Value::Decimal(decimal) => write!(f, "{}", decimal),
            Value::Text(text) => write!(f, "{:?}", text),
            Value::List(items) => write!(f, "<list of {}>", items.len()),
            Value::Map(map) => write!(f, "<map of {}>", map.len()),
        }
    }
}
