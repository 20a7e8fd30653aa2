use super::{PersistSummary, PersistenceAdapter};
use crate::core::canonical::{CanonicalProduct, Destination, Group};
use crate::core::error::AppError;
use crate::core::path::{FieldPath, PathError};
use crate::core::types::ErrorCategory;
use crate::core::value::Value;
use indexmap::IndexMap;
use std::io::Write;

/// In-memory store that upserts records by an identity field.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    identity: Destination,
    records: IndexMap<String, CanonicalProduct>,
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdapter {
    /// Records are keyed by `identifiers.sku`.
    pub fn new() -> Self {
        Self {
            identity: Destination::Field {
                group: Group::Identifiers,
                name: "sku",
            },
            records: IndexMap::new(),
        }
    }

    pub fn with_identity(path: &str) -> Result<Self, PathError> {
        let identity = Destination::compile(&FieldPath::parse(path)?)?;
        Ok(Self {
            identity,
            records: IndexMap::new(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalProduct> {
        self.records.get(key)
    }

    /// Stored records in first-seen order.
    pub fn records(&self) -> impl Iterator<Item = &CanonicalProduct> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn key_of(&self, product: &CanonicalProduct) -> Option<String> {
        match product.get(&self.identity)? {
            Value::Text(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Integer(int) => Some(int.to_string()),
            Value::Decimal(decimal) => Some(decimal.normalize().to_string()),
            _ => None,
        }
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn persist(&mut self, records: Vec<CanonicalProduct>) -> Result<PersistSummary, AppError> {
        let mut summary = PersistSummary::default();
        for product in records {
            let Some(key) = self.key_of(&product) else {
                tracing::debug!(identity = %self.identity, "record has no identity; skipped");
                summary.skipped += 1;
                continue;
            };
            if self.records.insert(key, product).is_some() {
                summary.updated += 1;
            } else {
                summary.created += 1;
            }
        }
        Ok(summary)
    }
}

/// Writes one JSON document per record.
pub struct JsonLinesAdapter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesAdapter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PersistenceAdapter for JsonLinesAdapter<W> {
    fn persist(&mut self, records: Vec<CanonicalProduct>) -> Result<PersistSummary, AppError> {
        let mut summary = PersistSummary::default();
        for (index, product) in records.iter().enumerate() {
            let line = match serde_json::to_string(product) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(record_index = index, "failed to serialize record: {}", e);
                    summary.errors += 1;
                    continue;
                }
            };
            writeln!(self.writer, "{}", line).map_err(|e| write_failed(index, e))?;
            summary.created += 1;
        }
        self.writer
            .flush()
            .map_err(|e| write_failed(records.len(), e))?;
        Ok(summary)
    }
}

fn write_failed(index: usize, e: std::io::Error) -> AppError {
    let mut error = AppError::new(
        ErrorCategory::PersistenceError,
        format!("Failed to write canonical record: {}", e),
    );
    error.add_context("record_index", &index.to_string());
    error
}
