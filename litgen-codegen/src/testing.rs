//! Test utilities.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use crate::template::TemplateBackend;

/// A minimal, language-neutral backend with one-line directives.
///
/// Its output is easy to assert on but is not meant to be valid in any
/// particular language.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTemplate;

impl TemplateBackend for PlainTemplate {
    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn import_statement(&self, module: &str, symbol: &str) -> String {
        format!("use {module}::{symbol}\n")
    }

    fn import_statements(&self) -> String {
        String::new()
    }

    fn file_header(&self, provenance: &str) -> String {
        format!("# {provenance}\n")
    }

    fn class_header(&self, class_name: &str, base: Option<&str>) -> String {
        match base {
            Some(base) => format!("class {class_name} : {base}\n"),
            None => format!("class {class_name}\n"),
        }
    }

    fn field_assignment(&self, name: &str, value: &str) -> String {
        format!("{name} = {value}\n")
    }

    fn enum_entry(&self, key: &str, value: &str) -> String {
        format!("{key} => {value}\n")
    }

    fn collect_subclasses(&self, parent: &str) -> String {
        format!("all: {parent}\n")
    }

    fn discriminated_union(&self, parent: &str, discriminator: &str) -> String {
        format!("one_of: {parent} by {discriminator}\n")
    }

    fn abbreviation_map(&self) -> String {
        "abbreviations\n".to_string()
    }
}
