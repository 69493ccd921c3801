//! Text backend contract.
//!
//! The engine never writes target-language syntax itself. Every directive
//! (class header, field assignment, import line, ...) is rendered by a
//! [`TemplateBackend`], which keeps the synthesis logic independent of the
//! language being generated.

use litgen_core::indent_block;

/// Module name of the target language's builtin namespace.
pub const BUILTIN_MODULE: &str = "builtins";

/// Module name of code executed directly as the entry script.
pub const ENTRY_MODULE: &str = "__main__";

/// Renders the structural directives of a generated file as text.
///
/// Implementations return text that may span several lines and must end
/// with a newline. Nested lines use tabs for indentation; the pipeline
/// expands them once the file is assembled.
pub trait TemplateBackend: Send + Sync {
    /// File extension for generated files, without the dot (e.g., "py").
    fn file_extension(&self) -> &'static str;

    /// Import statement for one symbol of a module.
    fn import_statement(&self, module: &str, symbol: &str) -> String;

    /// Imports every generated file needs regardless of its content.
    fn import_statements(&self) -> String;

    /// Header comment recording where the data came from.
    fn file_header(&self, provenance: &str) -> String;

    /// Class declaration line, with an optional base class.
    fn class_header(&self, class_name: &str, base: Option<&str>) -> String;

    /// Assignment of a literal value to a field.
    fn field_assignment(&self, name: &str, value: &str) -> String;

    /// Member of the aggregate class pointing at a literal class.
    fn enum_entry(&self, key: &str, value: &str) -> String;

    /// Accessor collecting every subclass of the schema.
    fn collect_subclasses(&self, parent: &str) -> String;

    /// Discriminated union over all subclasses of the schema.
    fn discriminated_union(&self, parent: &str, discriminator: &str) -> String;

    /// Accessor mapping labels to short names.
    fn abbreviation_map(&self) -> String;

    /// Indent a rendered directive by `level` steps.
    fn indent(&self, text: &str, level: usize) -> String {
        indent_block(text, level)
    }

    /// Quote a raw value as a string literal.
    fn string_literal(&self, value: &str) -> String {
        let mut literal = String::with_capacity(value.len() + 2);
        literal.push('"');
        for c in value.chars() {
            match c {
                '\\' => literal.push_str("\\\\"),
                '"' => literal.push_str("\\\""),
                '\n' => literal.push_str("\\n"),
                '\r' => literal.push_str("\\r"),
                '\t' => literal.push_str("\\t"),
                c => literal.push(c),
            }
        }
        literal.push('"');
        literal
    }

    /// Check if a declared schema type is a string type.
    fn is_string_type(&self, type_name: &str) -> bool {
        type_name == "str"
    }

    /// Check if a module is the builtin namespace (never imported).
    fn is_builtin_module(&self, module: &str) -> bool {
        module == BUILTIN_MODULE
    }

    /// Check if a module is the entry script (not importable by path).
    fn is_entry_module(&self, module: &str) -> bool {
        module == ENTRY_MODULE
    }
}
