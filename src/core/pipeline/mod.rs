#![allow(clippy::result_large_err)]
//! Load a configuration, parse records, and hand the results to persistence.

use crate::core::canonical::{CanonicalProduct, CanonicalValidator};
use crate::core::config::{ConfigLoader, ConfigSource, SupplierConfig};
use crate::core::error::AppError;
use crate::core::parser::{ErrorReport, ParsingEngine};
use crate::core::transforms::TransformRegistry;
use crate::core::types::RunStatus;
use serde::Serialize;
use serde_json::Value as JsonValue;

mod adapters;

pub use adapters::{JsonLinesAdapter, MemoryAdapter};

/// Counts reported by a persistence adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Boundary to whatever stores canonical records.
///
/// Implementations own identity resolution and all storage interaction.
pub trait PersistenceAdapter {
    fn persist(&mut self, records: Vec<CanonicalProduct>) -> Result<PersistSummary, AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Persist the records parsed before a fail-policy abort.
    pub persist_partial_on_abort: bool,
    /// Check finished records and log every issue as a warning.
    pub canonical_check: Option<CanonicalValidator>,
}

#[derive(Debug, Default)]
pub struct PipelineOutcome {
    /// Adapter counts; all zero when the adapter was skipped or failed.
    pub summary: PersistSummary,
    pub report: ErrorReport,
    pub status: RunStatus,
    /// Whether the adapter was invoked at all.
    pub persisted: bool,
    /// Set when the adapter was invoked and returned an error.
    pub persist_error: Option<AppError>,
    /// Issues found by the canonical check, if enabled.
    pub validation_issues: usize,
}

impl PipelineOutcome {
    /// True when the run was not aborted and the adapter stored the batch.
    pub fn is_success(&self) -> bool {
        !self.status.is_aborted() && self.persisted && self.persist_error.is_none()
    }
}

pub struct Pipeline<'r> {
    registry: &'r TransformRegistry,
    options: PipelineOptions,
}

impl<'r> Pipeline<'r> {
    pub fn new(registry: &'r TransformRegistry) -> Self {
        Self {
            registry,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Load `source`, then parse and persist `records`.
    ///
    /// Configuration problems are the error path. Per-field problems are in
    /// the returned report, which survives an adapter failure through
    /// [`PipelineOutcome::persist_error`].
    pub fn run<I, A>(
        &self,
        records: I,
        source: ConfigSource,
        adapter: &mut A,
    ) -> Result<PipelineOutcome, AppError>
    where
        I: IntoIterator<Item = JsonValue>,
        A: PersistenceAdapter + ?Sized,
    {
        let config = ConfigLoader::new(self.registry).load(source)?;
        self.run_with_config(&config, records, adapter)
    }

    /// Same as [`Pipeline::run`] for an already loaded configuration.
    pub fn run_with_config<I, A>(
        &self,
        config: &SupplierConfig,
        records: I,
        adapter: &mut A,
    ) -> Result<PipelineOutcome, AppError>
    where
        I: IntoIterator<Item = JsonValue>,
        A: PersistenceAdapter + ?Sized,
    {
        let parsed = ParsingEngine::new(config, self.registry).parse(records);

        let mut outcome = PipelineOutcome {
            report: parsed.report,
            status: parsed.status,
            ..PipelineOutcome::default()
        };

        if let Some(validator) = &self.options.canonical_check {
            outcome.validation_issues = check_records(validator, &parsed.records);
        }

        if outcome.status.is_aborted() && !self.options.persist_partial_on_abort {
            tracing::warn!(
                provider_id = %config.provider_id(),
                discarded = parsed.records.len(),
                "run aborted; skipping persistence"
            );
            return Ok(outcome);
        }

        outcome.persisted = true;
        match adapter.persist(parsed.records) {
            Ok(summary) => outcome.summary = summary,
            Err(error) => {
                tracing::error!(
                    provider_id = %config.provider_id(),
                    code = %error.code,
                    parse_errors = outcome.report.error_count(),
                    "persistence failed: {}",
                    error.message
                );
                outcome.persist_error = Some(error);
                return Ok(outcome);
            }
        }
        tracing::info!(
            provider_id = %config.provider_id(),
            created = outcome.summary.created,
            updated = outcome.summary.updated,
            skipped = outcome.summary.skipped,
            errors = outcome.summary.errors,
            "records persisted"
        );
        Ok(outcome)
    }
}

fn check_records(validator: &CanonicalValidator, records: &[CanonicalProduct]) -> usize {
    let mut total = 0;
    for (index, record) in records.iter().enumerate() {
        for issue in validator.validate(record) {
            tracing::warn!(record_index = index, path = %issue.path, "{}", issue.message);
            total += 1;
        }
    }
    total
}
