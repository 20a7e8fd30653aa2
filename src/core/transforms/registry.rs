use super::{builtin_transforms, FnTransform, Transform, TransformError, TransformParams};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::core::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("transform name must be a non-empty string")]
    EmptyName,
    #[error("transform already registered: {0}")]
    Duplicate(String),
    #[error("unknown transform: {0}")]
    UnknownTransform(String),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        let category = match err {
            RegistryError::UnknownTransform(_) => ErrorCategory::UnknownTransform,
            RegistryError::EmptyName | RegistryError::Duplicate(_) => ErrorCategory::InternalError,
        };
        AppError::new(category, err.to_string())
    }
}

/// Builder used to register transforms before any pipeline run.
pub struct TransformRegistryBuilder {
    transforms: HashMap<String, Arc<dyn Transform>>,
}

impl Default for TransformRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformRegistryBuilder {
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Start from the built-in transform set.
    pub fn with_builtins() -> Self {
        let transforms = builtin_transforms()
            .into_iter()
            .map(|transform| (transform.name().to_string(), transform))
            .collect();
        Self { transforms }
    }

    pub fn register_transform<T: Transform>(
        &mut self,
        transform: T,
    ) -> Result<&mut Self, RegistryError> {
        let name = transform.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.transforms.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.transforms.insert(name, Arc::new(transform));
        Ok(self)
    }

    /// Bind `name` to a closure `(value, params) -> value`.
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(Value, &TransformParams) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        self.register_transform(FnTransform::new(name.into(), func))
    }

    pub fn build(self) -> TransformRegistry {
        TransformRegistry {
            inner: Arc::new(self.transforms),
        }
    }
}

/// Immutable name-to-transform lookup shared by the loader and the engine.
#[derive(Clone)]
pub struct TransformRegistry {
    inner: Arc<HashMap<String, Arc<dyn Transform>>>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TransformRegistry {
    /// An empty registry; mostly useful in tests.
    pub fn empty() -> Self {
        TransformRegistryBuilder::new().build()
    }

    pub fn with_builtins() -> Self {
        TransformRegistryBuilder::with_builtins().build()
    }

    pub fn builder() -> TransformRegistryBuilder {
        TransformRegistryBuilder::new()
    }

    pub fn builder_with_builtins() -> TransformRegistryBuilder {
        TransformRegistryBuilder::with_builtins()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Transform>, RegistryError> {
        self.inner
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTransform(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.names())
            .finish()
    }
}
