pub mod args;
pub mod commands;

pub use args::{CheckArgs, RunArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::transforms::TransformRegistry;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "feedmap")]
#[command(version = crate::VERSION)]
#[command(about = "Map supplier product records onto the canonical catalog shape")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: check a supplier configuration, then run it against a records file."
)]
pub struct Args {
    /// Disable console logging
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Workspace holding .feedmap/ (default: nearest parent with one, else the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Transform records with a supplier configuration",
        long_about = "Run loads the configuration, parses every record in order under its error policy, and writes the canonical records as JSON Lines.",
        after_help = "Example:\n    feedmap run --config acme.json --records acme.jsonl --output canonical.jsonl"
    )]
    Run(RunArgs),
    #[command(
        about = "Validate a supplier configuration",
        long_about = "Check reports every configuration violation at once and exits non-zero if there are any.",
        after_help = "Example:\n    feedmap check --config acme.json"
    )]
    Check(CheckArgs),
    #[command(about = "List registered transforms")]
    Transforms,
}

pub fn run(args: Args) -> crate::Result<()> {
    let registry = TransformRegistry::with_builtins();
    match args.command {
        Command::Run(run_args) => commands::run(run_args, &registry),
        Command::Check(check_args) => commands::check(check_args, &registry),
        Command::Transforms => commands::transforms(&registry),
    }
}
