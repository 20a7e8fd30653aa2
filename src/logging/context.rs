use crate::cli::Args;
use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A person at a terminal running a one-off command.
    Interactive,
    /// Scheduled or scripted runs where stderr belongs to the caller.
    Unattended,
    /// `--quiet` was passed.
    Quiet,
}

impl ExecutionContext {
    /// Returns `true` when console sinks should be disabled.
    pub fn disables_console(self) -> bool {
        matches!(self, ExecutionContext::Quiet)
    }
}

/// Derive the active execution context from parsed CLI arguments plus overrides.
pub fn detect_context(args: &Args) -> ExecutionContext {
    if args.quiet {
        return ExecutionContext::Quiet;
    }
    if unattended_override_enabled() {
        return ExecutionContext::Unattended;
    }
    ExecutionContext::Interactive
}

fn unattended_override_enabled() -> bool {
    env::var("FEEDMAP_UNATTENDED")
        .map(|value| value.trim() == "1")
        .unwrap_or(false)
}
