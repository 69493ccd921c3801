//! Post-parse validation of litgen.toml.

use std::collections::HashSet;

use litgen_core::{is_pascal_case, is_valid_identifier};
use miette::SourceSpan;

use super::{GeneratorConfig, ImportConfig, Manifest, RuleConfig, SchemaConfig};
use crate::{Error, Result, error::SourceContext, transform::NamedTransform};

/// Source information plus the position inside the manifest being validated.
///
/// ```ignore
/// let ctx = ParseContext::new(src, "litgen.toml");
/// let generator_ctx = ctx.push("Platform");
/// generator_ctx.validate_identifier("name", "schema field")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    src: &'a str,
    filename: &'a str,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &'a str, filename: &'a str) -> Self {
        Self {
            src,
            filename,
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn filename(&self) -> &'a str {
        self.filename
    }

    /// Descend into a nested table.
    pub fn push<'b>(&self, segment: &'b str) -> ParseContext<'b>
    where
        'a: 'b,
    {
        let mut path: Vec<&'b str> = self.path.clone();
        path.push(segment);
        ParseContext {
            src: self.src,
            filename: self.filename,
            path,
        }
    }

    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Describe `kind` together with the current position, e.g. "rule field in 'Platform'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Span of the first quoted occurrence of `value`.
    pub fn find_span(&self, value: &str) -> Option<SourceSpan> {
        find_value_span(self.src, value, false)
    }

    /// Span of the last quoted occurrence of `value`.
    pub fn find_last_span(&self, value: &str) -> Option<SourceSpan> {
        find_value_span(self.src, value, true)
    }

    fn source(&self) -> SourceContext {
        SourceContext::new(self.src, self.filename)
    }

    pub fn error(&self, message: impl Into<String>, span: Option<SourceSpan>) -> Box<Error> {
        self.source().validation_error(message, span)
    }

    /// Fail unless `name` is a usable identifier.
    pub fn validate_identifier(&self, name: &str, kind: &str) -> Result<()> {
        if name.is_empty() {
            return Err(self.error(
                format!("{} cannot be empty", self.context_for(kind)),
                None,
            ));
        }
        if !is_valid_identifier(name) {
            return Err(self.error(
                format!(
                    "invalid {}: use only letters, numbers and underscores, starting with a letter or underscore",
                    self.describe(kind, name)
                ),
                self.find_span(name),
            ));
        }
        Ok(())
    }

    /// Describe a named item, e.g. "rule field 'kind' in 'Platform'".
    fn describe(&self, kind: &str, name: &str) -> String {
        if self.path.is_empty() {
            format!("{kind} '{name}'")
        } else {
            format!("{kind} '{name}' in '{}'", self.path_string())
        }
    }

    fn validate_not_empty(&self, value: &str, kind: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(self.error(
                format!("{} cannot be empty", self.context_for(kind)),
                None,
            ));
        }
        Ok(())
    }

    pub fn validate_manifest(&self, manifest: &Manifest) -> Result<()> {
        for (index, command) in manifest.formatters.commands.iter().enumerate() {
            if command.first().is_none_or(|program| program.is_empty()) {
                return Err(self.error(
                    format!("formatter command #{} is empty", index + 1),
                    None,
                ));
            }
        }

        let mut outputs = HashSet::new();
        for generator in &manifest.generators {
            self.validate_generator(generator)?;

            let output = generator.output_file();
            if !outputs.insert(output.clone()) {
                let name = output.display().to_string();
                return Err(self.error(
                    format!(
                        "generator '{}' writes to '{}', which another generator already writes to",
                        generator.class_name, name
                    ),
                    self.find_last_span(&name)
                        .or_else(|| self.find_span(&generator.class_name)),
                ));
            }
        }
        Ok(())
    }

    fn validate_generator(&self, generator: &GeneratorConfig) -> Result<()> {
        let class_name = generator.class_name.as_str();
        if class_name.is_empty() {
            return Err(self.error("generator class_name cannot be empty", None));
        }
        if !is_valid_identifier(class_name) || !is_pascal_case(class_name) {
            return Err(self.error(
                format!("generator class_name '{class_name}' must be a PascalCase identifier"),
                self.find_span(class_name),
            ));
        }

        let ctx = self.push(class_name);

        if generator.source_format().is_none() {
            let source = generator.source.display().to_string();
            return Err(ctx.error(
                format!(
                    "cannot detect the format of '{source}': use a .csv or .json file or set `format`"
                ),
                ctx.find_span(&source),
            ));
        }
        if let Some(delimiter) = generator.delimiter.filter(|d| !d.is_ascii()) {
            return Err(ctx.error(
                format!("delimiter '{delimiter}' must be a single ASCII character"),
                ctx.find_span(&delimiter.to_string()),
            ));
        }
        if let Some(discriminator) = &generator.discriminator {
            ctx.validate_identifier(discriminator, "discriminator")?;
        }
        if let Some(hints) = &generator.name_hints {
            if hints.is_empty() {
                return Err(ctx.error(
                    format!("{} needs at least one entry", ctx.context_for("name_hints")),
                    None,
                ));
            }
            for hint in hints {
                ctx.validate_not_empty(hint, "name hint")?;
            }
        }
        if let Some(module) = &generator.default_module_name {
            ctx.validate_not_empty(module, "default_module_name")?;
        }
        for import in &generator.additional_imports {
            ctx.validate_import(import, "additional import")?;
        }

        ctx.validate_schema(&generator.schema)?;

        let mut fields = HashSet::new();
        for rule in &generator.rules {
            ctx.validate_rule(rule)?;
            if !fields.insert(rule.field.as_str()) {
                return Err(ctx.error(
                    format!(
                        "{} is mapped by more than one rule",
                        ctx.describe("field", &rule.field)
                    ),
                    ctx.find_last_span(&rule.field),
                ));
            }
        }
        Ok(())
    }

    fn validate_schema(&self, schema: &SchemaConfig) -> Result<()> {
        self.validate_not_empty(&schema.module, "schema module")?;
        self.validate_identifier(&schema.name, "schema name")?;

        let mut seen = HashSet::new();
        for field in &schema.fields {
            self.validate_identifier(&field.name, "schema field")?;
            self.validate_not_empty(&field.type_name, "schema field type")?;
            if !seen.insert(field.name.as_str()) {
                return Err(self.error(
                    format!(
                        "{} is declared twice",
                        self.describe("schema field", &field.name)
                    ),
                    self.find_last_span(&field.name),
                ));
            }
        }
        Ok(())
    }

    fn validate_rule(&self, rule: &RuleConfig) -> Result<()> {
        self.validate_identifier(&rule.field, "rule field")?;
        for key in &rule.keys {
            self.validate_not_empty(key.key(), "rule key")?;
            if let Some(name) = key.transform() {
                if name.parse::<NamedTransform>().is_err() {
                    return Err(self
                        .source()
                        .unknown_transform_error(name, self.find_span(name)));
                }
            }
        }
        if let Some(reference) = &rule.reference {
            self.validate_import(reference, "rule reference")?;
        }
        Ok(())
    }

    fn validate_import(&self, import: &ImportConfig, kind: &str) -> Result<()> {
        self.validate_not_empty(&import.module, kind)?;
        self.validate_identifier(&import.symbol, kind)
    }
}

/// Find `value` written as a TOML string; the span covers the text between the quotes.
pub(crate) fn find_value_span(src: &str, value: &str, last: bool) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let needle = format!("{quote}{value}{quote}");
        let found = if last {
            src.rfind(&needle)
        } else {
            src.find(&needle)
        };
        if let Some(pos) = found {
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    None
}
