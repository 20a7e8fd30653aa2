use serde::Serialize;
use std::fmt;

/// What went wrong while applying a mapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Transform,
    UnknownTransform,
    PathResolution,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParseErrorKind::Transform => "transform",
            ParseErrorKind::UnknownTransform => "unknown_transform",
            ParseErrorKind::PathResolution => "path_resolution",
        };
        f.write_str(label)
    }
}

/// A per-field failure attributed to one record and one mapping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub provider_id: String,
    pub record_index: usize,
    pub rule_index: usize,
    pub source: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    pub kind: ParseErrorKind,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {} rule {} ({} -> {})",
            self.record_index, self.rule_index, self.source, self.destination
        )?;
        if let Some(transform) = &self.transform {
            write!(f, " transform '{}'", transform)?;
        }
        write!(f, ": {} [{}]", self.message, self.kind)
    }
}

/// Append-only record of per-field errors plus run counters.
///
/// Only the parsing engine mutates a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    records_attempted: usize,
    records_completed: usize,
    records_partial: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    aborted_at: Option<usize>,
    errors: Vec<ParseError>,
}

impl ErrorReport {
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn records_attempted(&self) -> usize {
        self.records_attempted
    }

    /// Records whose every rule succeeded or was skipped.
    pub fn records_completed(&self) -> usize {
        self.records_completed
    }

    /// Records produced with at least one recorded error.
    pub fn records_partial(&self) -> usize {
        self.records_partial
    }

    /// Index of the record that triggered a fail-policy abort.
    pub fn aborted_at(&self) -> Option<usize> {
        self.aborted_at
    }

    pub(crate) fn start_record(&mut self) {
        self.records_attempted += 1;
    }

    pub(crate) fn finish_record(&mut self, partial: bool) {
        if partial {
            self.records_partial += 1;
        } else {
            self.records_completed += 1;
        }
    }

    pub(crate) fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub(crate) fn mark_aborted(&mut self, record_index: usize) {
        self.aborted_at = Some(record_index);
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} completed, {} partial, {} error(s)",
            self.records_attempted,
            self.records_completed,
            self.records_partial,
            self.errors.len()
        )?;
        if let Some(index) = self.aborted_at {
            write!(f, ", aborted at record {}", index)?;
        }
        Ok(())
    }
}
