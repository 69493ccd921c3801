use thiserror::Error;

/// Errors raised by the naming and indentation helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("cannot derive an enum key from an empty name")]
    EmptyInput,

    #[error("indentation level must be non-negative, got {0}")]
    NegativeIndent(i32),
}
