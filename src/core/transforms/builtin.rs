use super::{Transform, TransformError, TransformParams};
use crate::core::value::Value;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// The transforms every registry built with builtins starts from.
pub fn builtin_transforms() -> Vec<Arc<dyn Transform>> {
    vec![
        Arc::new(Trim),
        Arc::new(Upper),
        Arc::new(ParsePrice),
        Arc::new(MapCategory),
    ]
}

fn expected_text(transform: &str, value: &Value) -> TransformError {
    TransformError::new(format!(
        "{} expects text, got {}",
        transform,
        value.type_name()
    ))
}

/// Strips surrounding whitespace.
pub struct Trim;

impl Transform for Trim {
    fn name(&self) -> &str {
        "trim"
    }

    fn apply(&self, value: Value, _params: &TransformParams) -> Result<Value, TransformError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => Ok(Value::Text(text.trim().to_string())),
            other => Err(expected_text(self.name(), &other)),
        }
    }
}

/// Upper-cases text.
pub struct Upper;

impl Transform for Upper {
    fn name(&self) -> &str {
        "upper"
    }

    fn apply(&self, value: Value, _params: &TransformParams) -> Result<Value, TransformError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => Ok(Value::Text(text.to_uppercase())),
            other => Err(expected_text(self.name(), &other)),
        }
    }
}

/// Turns numbers or currency text such as `"$1,299.00"` into a decimal.
pub struct ParsePrice;

fn price_pattern() -> Result<&'static Regex, TransformError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?"))
        .as_ref()
        .map_err(|err| TransformError::new(format!("invalid price pattern: {}", err)))
}

impl Transform for ParsePrice {
    fn name(&self) -> &str {
        "parse_price"
    }

    fn apply(&self, value: Value, _params: &TransformParams) -> Result<Value, TransformError> {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::Integer(int) => return Ok(Value::Decimal(Decimal::from(int))),
            Value::Decimal(decimal) => return Ok(Value::Decimal(decimal)),
            Value::Text(text) => text,
            other => {
                return Err(TransformError::new(format!(
                    "parse_price expects text or a number, got {}",
                    other.type_name()
                )))
            }
        };

        let cleaned = text.replace(',', "");
        let cleaned = cleaned.trim();
        let found = price_pattern()?
            .find(cleaned)
            .ok_or_else(|| TransformError::new(format!("parse_price could not parse {:?}", text)))?;
        Decimal::from_str(found.as_str())
            .map(Value::Decimal)
            .map_err(|err| {
                TransformError::new(format!("parse_price could not parse {:?}: {}", text, err))
            })
    }
}

/// Looks text up in the `mapping` param, falling back to `default` or the input.
pub struct MapCategory;

impl Transform for MapCategory {
    fn name(&self) -> &str {
        "map_category"
    }

    fn apply(&self, value: Value, params: &TransformParams) -> Result<Value, TransformError> {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::Text(text) => text,
            other => return Err(expected_text(self.name(), &other)),
        };
        let mapping = match params.get("mapping") {
            Some(JsonValue::Object(mapping)) => mapping,
            Some(_) => return Err(TransformError::new("map_category mapping must be an object")),
            None => return Err(TransformError::new("map_category requires a mapping param")),
        };

        if let Some(mapped) = mapping.get(&text) {
            return Ok(Value::from_json(mapped));
        }
        match params.get("default") {
            Some(default) if !default.is_null() => Ok(Value::from_json(default)),
            _ => Ok(Value::Text(text)),
        }
    }
}
