//! Applies a supplier configuration to raw records.

mod engine;
mod report;

pub use engine::{ParseOutcome, ParsingEngine, RecordResult};
pub use report::{ErrorReport, ParseError, ParseErrorKind};
