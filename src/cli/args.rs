use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Supplier configuration (JSON)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: PathBuf,

    /// Raw supplier records: `.csv`, a JSON array, or JSON Lines
    #[arg(long, short = 'r', value_name = "FILE")]
    pub records: PathBuf,

    /// Write canonical records here as JSON Lines (default: stdout)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Persist records parsed before a fail-policy abort
    #[arg(long)]
    pub persist_partial: bool,

    /// Check canonical records for required fields and field kinds
    #[arg(long)]
    pub check_canonical: bool,

    /// Write the run summary and error report here as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Supplier configuration (JSON)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: PathBuf,
}
