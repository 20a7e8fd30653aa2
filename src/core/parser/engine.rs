use super::report::{ErrorReport, ParseError, ParseErrorKind};
use crate::core::canonical::CanonicalProduct;
use crate::core::config::{MappingRule, SupplierConfig};
use crate::core::path::Lookup;
use crate::core::transforms::TransformRegistry;
use crate::core::types::{ErrorPolicy, RunStatus};
use crate::core::value::Value;
use serde_json::Value as JsonValue;

/// Everything a parsing run hands back to its caller.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// One canonical record per processed input record, in input order.
    pub records: Vec<CanonicalProduct>,
    pub report: ErrorReport,
    pub status: RunStatus,
}

/// Result of running every rule against one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordResult {
    Done(CanonicalProduct),
    /// Some rules failed under the continue policy.
    Partial {
        product: CanonicalProduct,
        errors: Vec<ParseError>,
    },
    /// A rule failed under the fail policy; the record is discarded.
    Aborted(ParseError),
}

enum RuleOutcome {
    Assigned,
    Skipped,
}

/// Interprets a supplier configuration against raw records.
pub struct ParsingEngine<'a> {
    config: &'a SupplierConfig,
    registry: &'a TransformRegistry,
}

impl<'a> ParsingEngine<'a> {
    pub fn new(config: &'a SupplierConfig, registry: &'a TransformRegistry) -> Self {
        Self { config, registry }
    }

    /// Parse records in order, honouring the configured error policy.
    pub fn parse<I>(&self, records: I) -> ParseOutcome
    where
        I: IntoIterator<Item = JsonValue>,
    {
        let mut outcome = ParseOutcome::default();

        for (index, raw) in records.into_iter().enumerate() {
            outcome.report.start_record();
            match self.parse_record(index, &raw) {
                RecordResult::Done(product) => {
                    outcome.report.finish_record(false);
                    outcome.records.push(product);
                }
                RecordResult::Partial { product, errors } => {
                    for error in errors {
                        outcome.report.push(error);
                    }
                    outcome.report.finish_record(true);
                    outcome.records.push(product);
                }
                RecordResult::Aborted(error) => {
                    outcome.report.push(error);
                    outcome.report.mark_aborted(index);
                    outcome.status = RunStatus::Aborted {
                        record_index: index,
                    };
                    tracing::error!(
                        provider_id = %self.config.provider_id(),
                        record_index = index,
                        "parsing aborted by fail policy"
                    );
                    break;
                }
            }
        }

        tracing::info!(
            provider_id = %self.config.provider_id(),
            attempted = outcome.report.records_attempted(),
            completed = outcome.report.records_completed(),
            partial = outcome.report.records_partial(),
            errors = outcome.report.error_count(),
            aborted = outcome.status.is_aborted(),
            "parsing finished"
        );
        outcome
    }

    /// Run every rule, in declared order, against one raw record.
    pub fn parse_record(&self, index: usize, raw: &JsonValue) -> RecordResult {
        tracing::debug!(
            provider_id = %self.config.provider_id(),
            record_index = index,
            "parsing record"
        );

        let mut product = CanonicalProduct::new();
        let mut errors = Vec::new();

        for rule in self.config.mappings() {
            let error = match self.apply_rule(rule, raw, &mut product) {
                Ok(RuleOutcome::Assigned | RuleOutcome::Skipped) => continue,
                Err(failure) => failure.into_error(self.config.provider_id(), index, rule),
            };
            tracing::warn!(
                provider_id = %error.provider_id,
                record_index = index,
                rule_index = error.rule_index,
                destination = %error.destination,
                kind = %error.kind,
                "{}",
                error.message
            );
            match self.config.error_policy() {
                ErrorPolicy::Fail => return RecordResult::Aborted(error),
                ErrorPolicy::Continue => errors.push(error),
            }
        }

        if errors.is_empty() {
            RecordResult::Done(product)
        } else {
            RecordResult::Partial { product, errors }
        }
    }

    fn apply_rule(
        &self,
        rule: &MappingRule,
        raw: &JsonValue,
        product: &mut CanonicalProduct,
    ) -> Result<RuleOutcome, RuleFailure> {
        let extracted = if raw.is_object() {
            rule.source().lookup(raw)
        } else {
            Lookup::Missing
        };

        let mut value = match (extracted, rule.default_value()) {
            (Lookup::Found(json), _) => Value::from_json(json),
            (Lookup::Missing, Some(default)) => default.clone(),
            (Lookup::Missing, None) => return Ok(RuleOutcome::Skipped),
        };

        for spec in rule.transforms() {
            let transform = self.registry.resolve(spec.name()).map_err(|err| RuleFailure {
                kind: ParseErrorKind::UnknownTransform,
                transform: Some(spec.name().to_string()),
                message: err.to_string(),
            })?;
            value = transform
                .apply(value, spec.params())
                .map_err(|err| RuleFailure {
                    kind: ParseErrorKind::Transform,
                    transform: Some(spec.name().to_string()),
                    message: err.message,
                })?;
            if value.is_null() {
                return Ok(RuleOutcome::Skipped);
            }
        }

        product
            .assign(rule.destination(), value)
            .map_err(|err| RuleFailure {
                kind: ParseErrorKind::PathResolution,
                transform: None,
                message: err.to_string(),
            })?;
        Ok(RuleOutcome::Assigned)
    }
}

struct RuleFailure {
    kind: ParseErrorKind,
    transform: Option<String>,
    message: String,
}

impl RuleFailure {
    fn into_error(self, provider_id: &str, record_index: usize, rule: &MappingRule) -> ParseError {
        ParseError {
            provider_id: provider_id.to_string(),
            record_index,
            rule_index: rule.index(),
            source: rule.source().to_string(),
            destination: rule.destination().to_string(),
            transform: self.transform,
            kind: self.kind,
            message: self.message,
        }
    }
}
