#![allow(clippy::result_large_err)]

use super::{ConfigSource, ConfigValidator, ConfigViolation, SupplierConfig};
use crate::core::error::AppError;
use crate::core::transforms::TransformRegistry;
use crate::core::types::ErrorCategory;
use serde_json::Value as JsonValue;

/// Loads and validates supplier configurations against a transform registry.
pub struct ConfigLoader<'r> {
    registry: &'r TransformRegistry,
}

impl<'r> ConfigLoader<'r> {
    pub fn new(registry: &'r TransformRegistry) -> Self {
        Self { registry }
    }

    /// Load a configuration, reporting every violation at once.
    ///
    /// Never returns a partially valid configuration.
    pub fn load(&self, source: ConfigSource) -> Result<SupplierConfig, AppError> {
        let origin = source.origin();
        let raw = Self::read_source(source, &origin)?;

        match ConfigValidator::new(self.registry).validate(&raw) {
            Ok(config) => {
                tracing::info!(
                    origin = %origin,
                    provider_id = %config.provider_id(),
                    error_policy = %config.error_policy(),
                    rules = config.mappings().len(),
                    "supplier configuration loaded"
                );
                Ok(config)
            }
            Err(violations) => {
                tracing::error!(
                    origin = %origin,
                    violations = violations.len(),
                    "supplier configuration rejected"
                );
                Err(AppError::config_validation(origin, violations))
            }
        }
    }

    fn read_source(source: ConfigSource, origin: &str) -> Result<JsonValue, AppError> {
        let text = match source {
            ConfigSource::Json(json) => return Ok(json),
            ConfigSource::Text(text) => text,
            ConfigSource::Path(path) => std::fs::read_to_string(&path).map_err(|e| {
                let mut error = AppError::new(
                    ErrorCategory::IoError,
                    format!("Failed to read config file {}: {}", path.display(), e),
                );
                error.add_context("origin", origin);
                error
            })?,
        };

        serde_json::from_str(&text).map_err(|e| {
            AppError::config_validation(
                origin,
                vec![ConfigViolation::new(
                    super::validation::ROOT_NOT_OBJECT,
                    "$",
                    format!("invalid JSON: {}", e),
                )],
            )
        })
    }
}
