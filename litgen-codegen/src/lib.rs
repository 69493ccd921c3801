//! Generation engine for literal model classes.
//!
//! Turns an ordered list of flat records into one literal class per record
//! plus an enum-like aggregate class that enumerates them, all derived from a
//! single base schema. Text rendering is delegated to a [`TemplateBackend`].
//!
//! # Module Organization
//!
//! - [`record`] - Parsed input records
//! - [`source`] - Record sources (parser contract, CSV, JSON)
//! - [`schema`] - Target schema descriptors
//! - [`reference`] - Type references and import resolution
//! - [`template`] - Text backend contract
//! - [`mapping`] - Field mapping rules and value resolution
//! - [`blueprint`] - Per-record blueprints and the aggregate class
//! - [`pipeline`] - The generation pipeline, validators and formatters
//! - [`context`] - Registry driving several pipelines at once
//! - [`testing`] - Test utilities (feature-gated)

pub mod blueprint;
pub mod context;
mod error;
pub mod imports;
pub mod mapping;
pub mod pipeline;
pub mod record;
pub mod reference;
pub mod schema;
pub mod source;
pub mod template;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use blueprint::{
    AggregateDescriptor, AggregateEntry, LiteralModelOptions, RecordBlueprint,
    generate_enum_like_class, generate_literal_model,
};
pub use context::{GenerationContext, GeneratorId};
pub use error::{Error, Result};
pub use imports::ImportCollector;
pub use mapping::{FieldMappingRule, SourceKeyHandler, Transform, resolve_field_value};
pub use pipeline::{
    CodeFormatter, CodeValidator, CommandFormatter, Diagnostic, ModelGenerator, Severity,
};
pub use record::ParsedRecord;
pub use reference::{ForwardReference, TypeDescriptor, TypeReference, solve_import};
pub use schema::TargetSchema;
pub use source::{CsvSource, JsonSource, RecordSource, StaticSource};
pub use template::TemplateBackend;
