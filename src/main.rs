use clap::Parser;
use feedmap::{cli, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    let _logging = match logging::init(&args) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: logging disabled: {:#}", err);
            None
        }
    };

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
