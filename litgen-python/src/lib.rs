//! Python backend for litgen.
//!
//! Renders literal model classes as [pydantic](https://docs.pydantic.dev)
//! models and the aggregate as a plain class holding one instance per
//! record, an `ALL` tuple and a discriminated `ONE_OF` union.
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use litgen_codegen::{CsvSource, GenerationContext, ModelGenerator, TargetSchema};
//! use litgen_python::{ImportSortFormatter, LayoutFormatter, PythonSyntaxValidator, PythonTemplate};
//!
//! let schema = TargetSchema::new("models.platforms", "PlatformModel")
//!     .field("name", "str")
//!     .field("abbreviation", "str");
//! let generator = ModelGenerator::new(
//!     "Platform",
//!     schema,
//!     CsvSource::from_path("platforms.csv"),
//!     Arc::new(PythonTemplate::new()),
//! );
//!
//! let mut context = GenerationContext::new()
//!     .with_validator(PythonSyntaxValidator::new())
//!     .with_formatter(ImportSortFormatter::new())
//!     .with_formatter(LayoutFormatter::new());
//! context.add_generator(generator, None);
//! context.write_all("generated".as_ref(), true)?;
//! ```

mod formatters;
mod template;
mod validator;

pub use formatters::{ImportSortFormatter, LayoutFormatter};
pub use template::PythonTemplate;
pub use validator::PythonSyntaxValidator;
