//! Per-supplier mapping configuration: data model, loader and validation.

use crate::core::canonical::Destination;
use crate::core::path::FieldPath;
use crate::core::transforms::TransformParams;
use crate::core::types::ErrorPolicy;
use crate::core::value::Value;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::PathBuf;

pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

/// Where a supplier configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A JSON file on disk.
    Path(PathBuf),
    /// JSON text already in memory.
    Text(String),
    /// An already parsed JSON document.
    Json(JsonValue),
}

impl ConfigSource {
    /// Label used in error messages.
    pub fn origin(&self) -> String {
        match self {
            ConfigSource::Path(path) => path.display().to_string(),
            ConfigSource::Text(_) => "<inline>".to_string(),
            ConfigSource::Json(_) => "<json>".to_string(),
        }
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::Path(path)
    }
}

impl From<JsonValue> for ConfigSource {
    fn from(json: JsonValue) -> Self {
        ConfigSource::Json(json)
    }
}

/// One problem found while validating a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigViolation {
    pub code: String,
    /// Location in the document, e.g. `mappings[2].transforms[0].name`.
    pub location: String,
    pub message: String,
}

impl ConfigViolation {
    pub fn new(
        code: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.location, self.message, self.code)
    }
}

/// A transform invocation with its final, merged parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSpec {
    name: String,
    params: TransformParams,
}

impl TransformSpec {
    pub fn new(name: impl Into<String>, params: TransformParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }
}

/// One source-to-destination instruction, compiled at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRule {
    index: usize,
    source: FieldPath,
    destination: Destination,
    transforms: Vec<TransformSpec>,
    default: Option<Value>,
}

impl MappingRule {
    pub fn new(
        index: usize,
        source: FieldPath,
        destination: Destination,
        transforms: Vec<TransformSpec>,
        default: Option<Value>,
    ) -> Self {
        Self {
            index,
            source,
            destination,
            transforms,
            default,
        }
    }

    /// Position of the rule in the `mappings` array.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> &FieldPath {
        &self.source
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn transforms(&self) -> &[TransformSpec] {
        &self.transforms
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Display for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mappings[{}] ({} -> {})",
            self.index, self.source, self.destination
        )
    }
}

/// A validated supplier configuration. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierConfig {
    provider_id: String,
    error_policy: ErrorPolicy,
    mappings: Vec<MappingRule>,
    transform_params: serde_json::Map<String, JsonValue>,
}

impl SupplierConfig {
    pub(crate) fn new(
        provider_id: String,
        error_policy: ErrorPolicy,
        mappings: Vec<MappingRule>,
        transform_params: serde_json::Map<String, JsonValue>,
    ) -> Self {
        Self {
            provider_id,
            error_policy,
            mappings,
            transform_params,
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Rules in evaluation order.
    pub fn mappings(&self) -> &[MappingRule] {
        &self.mappings
    }

    /// Shared parameter bundles as they appeared in the document.
    pub fn transform_params(&self) -> &serde_json::Map<String, JsonValue> {
        &self.transform_params
    }
}
