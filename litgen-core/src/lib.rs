//! Core utilities for the litgen code generator.
//!
//! This crate holds the pure string helpers every other litgen crate leans
//! on: identifier casing and sanitization, enum key derivation, tab-based
//! indentation management, provenance strings and file writing.

mod error;
mod file;
mod indent;
mod naming;
mod provenance;

pub use error::NameError;
pub use file::write_file;
// Indentation utilities
pub use indent::{
    INDENT_WIDTH, count_indent_level, indent_block, indent_line, replace_tabs_with_spaces,
    unindent,
};
// Identifier utilities
pub use naming::{
    create_enum_key_from_class_name, is_pascal_case, is_valid_identifier, sanitize_class_name,
    to_pascal_case,
};
pub use provenance::{Provenance, normalize_model_source_provenance};
