//! Dotted field paths, parsed once at configuration load time.

use serde_json::Value as JsonValue;
use std::fmt;

/// Errors raised while parsing or resolving a field path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path '{path}' contains an empty segment")]
    EmptySegment { path: String },
    #[error("'{segment}' is not a field of {parent} (path '{path}')")]
    UnknownField {
        path: String,
        parent: String,
        segment: String,
    },
    #[error("expected a sequence index after {parent}, got '{segment}' (path '{path}')")]
    ExpectedIndex {
        path: String,
        parent: String,
        segment: String,
    },
    #[error("index {index} exceeds the maximum of {max} (path '{path}')")]
    IndexTooLarge { path: String, index: usize, max: usize },
    #[error("path '{path}' does not address a single field")]
    Incomplete { path: String },
    #[error("path '{path}' continues past a field at '{segment}'")]
    TooDeep { path: String, segment: String },
}

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    fn parse(raw: &str) -> PathSegment {
        match raw.parse::<usize>() {
            // "02" stays a key so lookups by text stay exact.
            Ok(index) if index.to_string() == raw => PathSegment::Index(index),
            _ => PathSegment::Key(raw.to_string()),
        }
    }

    /// The segment as it appeared in the dotted form.
    pub fn as_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            PathSegment::Key(key) => std::borrow::Cow::Borrowed(key.as_str()),
            PathSegment::Index(index) => std::borrow::Cow::Owned(index.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Result of looking a path up in a raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a JsonValue),
    Missing,
}

/// A parsed dotted path such as `variants.2.price`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        for raw in text.split('.') {
            if raw.is_empty() {
                return Err(PathError::EmptySegment {
                    path: text.to_string(),
                });
            }
            segments.push(PathSegment::parse(raw));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walk nested objects and arrays of a raw record.
    ///
    /// A JSON `null` at the end of the walk counts as missing.
    pub fn lookup<'a>(&self, record: &'a JsonValue) -> Lookup<'a> {
        let mut current = record;
        for segment in &self.segments {
            let next = match (current, segment) {
                (JsonValue::Object(map), segment) => map.get(&*segment.as_key()),
                (JsonValue::Array(items), PathSegment::Index(index)) => items.get(*index),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Lookup::Missing,
            }
        }
        if current.is_null() {
            Lookup::Missing
        } else {
            Lookup::Found(current)
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
