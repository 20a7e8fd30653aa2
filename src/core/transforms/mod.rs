//! Named, stateless value transforms referenced from supplier configurations.

use crate::core::value::Value;
use serde_json::{Map, Value as JsonValue};

mod builtin;
mod registry;

pub use builtin::{builtin_transforms, MapCategory, ParsePrice, Trim, Upper};
pub use registry::{RegistryError, TransformRegistry, TransformRegistryBuilder};

/// Parameters handed to a transform, already merged with shared bundles.
pub type TransformParams = Map<String, JsonValue>;

/// Raised by a transform that cannot handle its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A pure function from one value to another.
pub trait Transform: Send + Sync + 'static {
    /// Name used in supplier configurations.
    fn name(&self) -> &str;

    /// Convert `value`; must not depend on anything but its arguments.
    fn apply(&self, value: Value, params: &TransformParams) -> Result<Value, TransformError>;
}

/// Adapter that lets a closure be registered as a transform.
pub(crate) struct FnTransform<F> {
    name: String,
    func: F,
}

impl<F> FnTransform<F> {
    pub(crate) fn new(name: String, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(Value, &TransformParams) -> Result<Value, TransformError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: Value, params: &TransformParams) -> Result<Value, TransformError> {
        (self.func)(value, params)
    }
}
