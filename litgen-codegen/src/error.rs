use std::path::PathBuf;

use litgen_core::NameError;
use thiserror::Error;

use crate::pipeline::Diagnostic;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running a generation pipeline.
///
/// Every error aborts the current run; no partial output is produced.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum Error {
    #[error("configuration error: {0}")]
    #[diagnostic(code(litgen::configuration))]
    Configuration(String),

    #[error("key '{key}' not found in source record")]
    #[diagnostic(
        code(litgen::lookup),
        help("the mapping rule for field '{field}' reads '{key}', which this record does not have")
    )]
    Lookup { field: String, key: String },

    #[error("pattern '{pattern}' for field '{field}' is invalid: {reason}")]
    #[diagnostic(code(litgen::pattern))]
    Pattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("field '{field}' could not be mapped: {reason}")]
    #[diagnostic(code(litgen::missing_field))]
    MissingField { field: String, reason: String },

    #[error(
        "no class name provided and none of the hints [{}] found in the source record",
        .hints.join(", ")
    )]
    #[diagnostic(
        code(litgen::naming),
        help("set an explicit class name or add one of the hint columns to the source")
    )]
    Naming { hints: Vec<String> },

    #[error("generated code rejected by validator '{validator}': {diagnostic}")]
    #[diagnostic(code(litgen::validation))]
    Validation {
        validator: String,
        diagnostic: Diagnostic,
    },

    #[error("formatter '{formatter}' failed: {reason}")]
    #[diagnostic(code(litgen::format))]
    Format { formatter: String, reason: String },

    #[error("failed to read records from {origin}: {reason}")]
    #[diagnostic(code(litgen::source))]
    Source { origin: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(litgen::name))]
    Name(#[from] NameError),

    #[error("failed to write '{path}'")]
    #[diagnostic(code(litgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Returns true for errors caused by invalid generator configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
