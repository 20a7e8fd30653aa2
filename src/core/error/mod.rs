use crate::core::config::ConfigViolation;
use crate::core::parser::{ParseError, ParseErrorKind};
use crate::core::types::{ErrorCategory, ErrorSeverity};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: HashMap<String, String>,
    /// Every configuration problem found in one validation pass.
    pub violations: Vec<ConfigViolation>,
    pub recovery_suggestions: Vec<String>,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        AppError {
            category,
            severity: ErrorSeverity::Error,
            code: default_code(category).to_string(),
            message: message.into(),
            context: HashMap::new(),
            violations: Vec::new(),
            recovery_suggestions: vec![],
            occurred_at: Utc::now(),
            source: None,
        }
    }

    /// Build the batched configuration failure carrying every violation.
    pub fn config_validation<T: Into<String>>(
        origin: T,
        violations: Vec<ConfigViolation>,
    ) -> Self {
        let origin = origin.into();
        let summary = violations
            .iter()
            .map(|violation| violation.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let mut error = AppError::new(
            ErrorCategory::ConfigValidationError,
            format!(
                "invalid supplier configuration ({}): {} violation(s): {}",
                origin,
                violations.len(),
                summary
            ),
        );
        error.add_context("origin", &origin);
        error.violations = violations;
        error.recovery_suggestions =
            vec!["Fix every listed violation, then reload the configuration".to_string()];
        error
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }
}

fn default_code(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::ConfigValidationError => "CONFIG_INVALID",
        ErrorCategory::UnknownTransform => "UNKNOWN_TRANSFORM",
        ErrorCategory::TransformError => "TRANSFORM_FAILED",
        ErrorCategory::PathResolutionError => "PATH_INVALID",
        ErrorCategory::PersistenceError => "PERSIST_FAILED",
        ErrorCategory::SerializationError => "SERIALIZATION_ERROR",
        ErrorCategory::IoError => "IO_ERROR",
        ErrorCategory::InternalError => "INTERNAL_ERROR",
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

/// A recorded per-field error, lifted for reporting.
///
/// The run carried on past it, so it is a warning until the caller knows it
/// aborted the run.
impl From<&ParseError> for AppError {
    fn from(e: &ParseError) -> Self {
        let category = match e.kind {
            ParseErrorKind::Transform => ErrorCategory::TransformError,
            ParseErrorKind::UnknownTransform => ErrorCategory::UnknownTransform,
            ParseErrorKind::PathResolution => ErrorCategory::PathResolutionError,
        };
        let mut error = AppError::new(category, e.to_string());
        error.severity = ErrorSeverity::Warning;
        error.add_context("provider_id", &e.provider_id);
        error.add_context("record_index", &e.record_index.to_string());
        error.add_context("rule_index", &e.rule_index.to_string());
        if let Some(transform) = &e.transform {
            error.add_context("transform", transform);
        }
        error
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        let mut error = AppError::new(ErrorCategory::InternalError, e.to_string());
        error.recovery_suggestions = vec!["Check the error details".to_string()];
        error.source = Some(e);
        error
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        let mut error = AppError::new(ErrorCategory::IoError, e.to_string());
        error.recovery_suggestions = vec!["Check file permissions and paths".to_string()];
        error.source = Some(anyhow::anyhow!(e));
        error
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        let mut error = AppError::new(ErrorCategory::SerializationError, e.to_string());
        error.source = Some(anyhow::anyhow!(e));
        error
    }
}

pub trait ErrorReporter {
    fn report_error(&self, error: &AppError);
    fn report_warning(&self, message: &str, context: Option<String>);
}

pub struct DefaultErrorReporter;

impl DefaultErrorReporter {
    pub fn new() -> Self {
        DefaultErrorReporter
    }
}

impl Default for DefaultErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for DefaultErrorReporter {
    fn report_error(&self, error: &AppError) {
        let label = match error.severity {
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Warning => "WARNING",
        };
        eprintln!("[{}] {}: {}", label, error.code, error.message);
        for violation in &error.violations {
            eprintln!("  - {}", violation);
        }
        if let Some(ref source) = error.source {
            eprintln!("  Caused by: {}", source);
        }
    }

    fn report_warning(&self, message: &str, context: Option<String>) {
        eprintln!("[WARNING] {}", message);
        if let Some(ref ctx) = context {
            eprintln!("  Context: {}", ctx);
        }
    }
}
