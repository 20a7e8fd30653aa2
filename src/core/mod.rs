pub mod canonical;
pub mod config;
pub mod error;
pub mod parser;
pub mod path;
pub mod pipeline;
pub mod records;
pub mod transforms;
pub mod types;
pub mod value;

pub use canonical::{CanonicalProduct, CanonicalValidator, Destination};
pub use config::{ConfigLoader, ConfigSource, ConfigViolation, SupplierConfig};
pub use error::{AppError, DefaultErrorReporter, ErrorReporter};
pub use parser::{ErrorReport, ParseError, ParseOutcome, ParsingEngine};
pub use path::FieldPath;
pub use pipeline::{
    JsonLinesAdapter, MemoryAdapter, PersistSummary, PersistenceAdapter, Pipeline,
    PipelineOptions, PipelineOutcome,
};
pub use transforms::{Transform, TransformError, TransformRegistry};
pub use types::*;
pub use value::Value;
