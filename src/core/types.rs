use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    ConfigValidationError,
    UnknownTransform,
    TransformError,
    PathResolutionError,
    PersistenceError,
    SerializationError,
    IoError,
    InternalError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Error,
    /// Recorded and carried past; the run went on.
    Warning,
}

/// Run-wide handling of per-field errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the error, skip the rule, keep going.
    #[default]
    Continue,
    /// Abort the run at the first per-field error.
    Fail,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Continue => "continue",
            ErrorPolicy::Fail => "fail",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "continue" => Ok(ErrorPolicy::Continue),
            "fail" => Ok(ErrorPolicy::Fail),
            other => Err(format!(
                "expected 'continue' or 'fail', got '{}'",
                other
            )),
        }
    }
}

/// Terminal state of a parsing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunStatus {
    #[default]
    Completed,
    Aborted { record_index: usize },
}

impl RunStatus {
    pub fn is_aborted(&self) -> bool {
        matches!(self, RunStatus::Aborted { .. })
    }
}
