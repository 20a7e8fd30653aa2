use super::record::CanonicalProduct;
use super::schema::{
    Destination, FieldKind, Group, MEDIA_FIELDS, OPTION_VALUES, VARIANTS, VARIANT_FIELDS,
};
use crate::core::path::{FieldPath, PathError};
use crate::core::value::Value;
use serde::Serialize;
use std::fmt;

/// Fields a canonical record needs before it is useful downstream.
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &["identifiers.sku", "basic_info.title"];

/// A problem found in a finished canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Checks canonical records for required values and field kinds.
///
/// The parsing engine never calls this; callers decide what to do with the
/// issues (log them, drop records, fail a batch).
#[derive(Debug, Clone)]
pub struct CanonicalValidator {
    required: Vec<Destination>,
}

impl Default for CanonicalValidator {
    fn default() -> Self {
        Self::with_required_fields(DEFAULT_REQUIRED_FIELDS)
            .unwrap_or(Self { required: Vec::new() })
    }
}

impl CanonicalValidator {
    pub fn with_required_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, PathError> {
        let required = fields
            .iter()
            .map(|field| Destination::compile(&FieldPath::parse(field.as_ref())?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { required })
    }

    pub fn validate(&self, product: &CanonicalProduct) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for destination in &self.required {
            if is_missing(product.get(destination)) {
                issues.push(ValidationIssue {
                    path: destination.to_string(),
                    message: "missing required value".to_string(),
                });
            }
        }

        for group in Group::ALL {
            for &(name, kind) in group.fields() {
                let destination = Destination::Field { group, name };
                check_kind(&destination, product.get(&destination), kind, &mut issues);
            }
        }

        for (index, variant) in product.variants.iter().enumerate() {
            for &(name, kind) in VARIANT_FIELDS {
                let destination = Destination::Variant { index, name };
                check_kind(&destination, product.get(&destination), kind, &mut issues);
            }
            for (key, value) in &variant.option_values {
                if !kind_matches(FieldKind::Text, value) {
                    issues.push(ValidationIssue {
                        path: format!("{}.{}.{}.{}", VARIANTS, index, OPTION_VALUES, key),
                        message: format!("expected text, got {}", value.type_name()),
                    });
                }
            }
        }

        for index in 0..product.media.len() {
            for &(name, kind) in MEDIA_FIELDS {
                let destination = Destination::Media { index, name };
                check_kind(&destination, product.get(&destination), kind, &mut issues);
            }
        }

        issues
    }

    pub fn is_valid(&self, product: &CanonicalProduct) -> bool {
        self.validate(product).is_empty()
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Text(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_kind(
    destination: &Destination,
    value: Option<&Value>,
    kind: FieldKind,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(value) = value else {
        return;
    };
    if !kind_matches(kind, value) {
        issues.push(ValidationIssue {
            path: destination.to_string(),
            message: format!("expected {}, got {}", kind, value.type_name()),
        });
    }
}

fn kind_matches(kind: FieldKind, value: &Value) -> bool {
    match (kind, value) {
        (_, Value::Null) => true,
        (FieldKind::Text, Value::Text(_)) => true,
        (FieldKind::Decimal, Value::Decimal(_) | Value::Integer(_)) => true,
        (FieldKind::Integer, Value::Integer(_)) => true,
        (FieldKind::TextList, Value::List(items)) => {
            items.iter().all(|item| matches!(item, Value::Text(_)))
        }
        _ => false,
    }
}
