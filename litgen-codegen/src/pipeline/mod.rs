//! The generation pipeline.
//!
//! A [`ModelGenerator`] parses its record source, synthesizes one literal
//! class per record plus the aggregate class, assembles the file and runs it
//! through the configured validators, then the formatters:
//!
//! ```text
//! source -> records -> blueprints + aggregate -> assemble -> validate -> format
//! ```
//!
//! Validators stop the run on the first error diagnostic. Formatters are
//! chained, each receiving the previous one's output.

mod diagnostic;
mod format;
mod generator;
mod validate;

pub use diagnostic::{Diagnostic, Severity};
pub use format::{CodeFormatter, CommandFormatter};
pub use generator::{
    DEFAULT_DISCRIMINATOR, DEFAULT_MODULE_NAME, DEFAULT_NAME_HINTS, ModelGenerator,
};
pub use validate::CodeValidator;
