//! `litgen.toml` support: parsing with source-span diagnostics, validation,
//! and conversion into a [`litgen_codegen::GenerationContext`].

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod build;
mod error;
mod manifest;
mod transform;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    FieldConfig, FormattersConfig, GeneratorConfig, ImportConfig, KeyConfig, LitgenToml, Manifest,
    OutputConfig, ParseContext, RuleConfig, SchemaConfig, SourceFormat, ValidatorsConfig,
};
pub use transform::{NamedTransform, UnknownTransform};
