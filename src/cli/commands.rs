use crate::{
    cli::args::{CheckArgs, RunArgs},
    core::{
        canonical::CanonicalValidator,
        config::{ConfigLoader, ConfigSource},
        parser::ErrorReport,
        pipeline::{JsonLinesAdapter, PersistSummary, Pipeline, PipelineOptions},
        records::load_records,
        transforms::TransformRegistry,
        types::{ErrorSeverity, RunStatus},
        AppError, DefaultErrorReporter, ErrorReporter,
    },
    Result,
};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

/// Machine-readable result of `feedmap run --report`.
#[derive(Serialize)]
struct RunReport<'a> {
    provider_config: String,
    #[serde(flatten)]
    status: RunStatus,
    persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    persist_error: Option<String>,
    summary: PersistSummary,
    validation_issues: usize,
    report: &'a ErrorReport,
}

pub fn run(args: RunArgs, registry: &TransformRegistry) -> Result<()> {
    tracing::info!(
        config = %args.config.display(),
        records = %args.records.display(),
        "Starting feedmap run"
    );
    let records = load_records(&args.records)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("failed to create output file {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut adapter = JsonLinesAdapter::new(writer);

    let options = PipelineOptions {
        persist_partial_on_abort: args.persist_partial,
        canonical_check: args.check_canonical.then(CanonicalValidator::default),
    };
    let reporter = DefaultErrorReporter::new();
    let outcome = match Pipeline::new(registry).with_options(options).run(
        records,
        ConfigSource::Path(args.config.clone()),
        &mut adapter,
    ) {
        Ok(outcome) => outcome,
        Err(error) => {
            reporter.report_error(&error);
            return Err(anyhow!("run failed: {}", error.message));
        }
    };

    for error in outcome.report.errors() {
        let mut lifted = AppError::from(error);
        if outcome.status == (RunStatus::Aborted { record_index: error.record_index }) {
            lifted.severity = ErrorSeverity::Error;
        }
        reporter.report_error(&lifted);
    }
    if let Some(error) = &outcome.persist_error {
        reporter.report_error(error);
    }

    if let Some(path) = &args.report {
        let report = RunReport {
            provider_config: args.config.display().to_string(),
            status: outcome.status,
            persisted: outcome.persisted,
            persist_error: outcome.persist_error.as_ref().map(|e| e.to_string()),
            summary: outcome.summary,
            validation_issues: outcome.validation_issues,
            report: &outcome.report,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    eprintln!("Records: {}", outcome.report);
    if outcome.persist_error.is_some() {
        eprintln!("Persisted: nothing (adapter failed)");
    } else if outcome.persisted {
        eprintln!(
            "Persisted: {} created, {} updated, {} skipped, {} error(s)",
            outcome.summary.created,
            outcome.summary.updated,
            outcome.summary.skipped,
            outcome.summary.errors
        );
    } else {
        eprintln!("Persisted: nothing (run aborted)");
    }
    if outcome.validation_issues > 0 {
        reporter.report_warning(
            &format!("canonical check found {} issue(s)", outcome.validation_issues),
            Some("each issue is logged as a warning with its record index".to_string()),
        );
    }

    if let RunStatus::Aborted { record_index } = outcome.status {
        return Err(anyhow!("run aborted at record {}", record_index));
    }
    if let Some(error) = &outcome.persist_error {
        return Err(anyhow!("persistence failed: {}", error.message));
    }
    Ok(())
}

pub fn check(args: CheckArgs, registry: &TransformRegistry) -> Result<()> {
    match ConfigLoader::new(registry).load(ConfigSource::Path(args.config.clone())) {
        Ok(config) => {
            println!(
                "{}: OK (provider {}, {} rule(s), error_policy {})",
                args.config.display(),
                config.provider_id(),
                config.mappings().len(),
                config.error_policy()
            );
            Ok(())
        }
        Err(error) => {
            DefaultErrorReporter::new().report_error(&error);
            Err(anyhow!(
                "{}: {} violation(s)",
                args.config.display(),
                error.violations.len()
            ))
        }
    }
}

pub fn transforms(registry: &TransformRegistry) -> Result<()> {
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(())
}
