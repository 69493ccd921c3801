//! Field mapping rules and value resolution.
//!
//! A field of the target schema gets its literal value from, in priority
//! order: a [`FieldMappingRule`] targeting it, a record key of the same name,
//! or nothing at all.

use std::{fmt, sync::Arc};

use litgen_core::unindent;

use crate::{
    Error, Result, record::ParsedRecord, reference::TypeReference, template::TemplateBackend,
};

/// Pure transform applied to a raw record value before substitution.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Reads one key of a record, optionally transforming its value.
#[derive(Clone)]
pub struct SourceKeyHandler {
    key: String,
    transform: Option<Transform>,
}

impl SourceKeyHandler {
    /// Read `key` verbatim.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            transform: None,
        }
    }

    /// Read `key` and pass its value through `transform`.
    pub fn with_transform(
        key: impl Into<String>,
        transform: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            transform: Some(Arc::new(transform)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Read and transform this handler's value, or `None` when the record
    /// lacks the key.
    pub fn read(&self, record: &ParsedRecord) -> Option<String> {
        let raw = record.get(&self.key)?;
        Some(match &self.transform {
            Some(transform) => transform(raw),
            None => raw.to_string(),
        })
    }
}

impl fmt::Debug for SourceKeyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceKeyHandler")
            .field("key", &self.key)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl From<&str> for SourceKeyHandler {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SourceKeyHandler {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Derives the value of one schema field from one or more record keys.
///
/// Handler values are substituted positionally into `pattern`: `{0}`, `{1}`
/// pick a value by index, `{}` takes the next one, and `{{`/`}}` produce
/// literal braces. The result is emitted as-is, without quoting.
#[derive(Debug, Clone)]
pub struct FieldMappingRule {
    field_name: String,
    pattern: String,
    handlers: Vec<SourceKeyHandler>,
    reference: Option<TypeReference>,
}

impl FieldMappingRule {
    /// Create a rule for `field_name` with no source keys yet.
    pub fn new(field_name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            pattern: pattern.into(),
            handlers: Vec::new(),
            reference: None,
        }
    }

    /// Add one plain handler per key, in order.
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.handlers
            .extend(keys.into_iter().map(SourceKeyHandler::new));
        self
    }

    /// Append a handler.
    pub fn with_handler(mut self, handler: impl Into<SourceKeyHandler>) -> Self {
        self.handlers.push(handler.into());
        self
    }

    /// Declare a type the rule's output refers to, so generated code imports it.
    pub fn with_reference(mut self, reference: impl Into<TypeReference>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handlers(&self) -> &[SourceKeyHandler] {
        &self.handlers
    }

    pub fn reference(&self) -> Option<&TypeReference> {
        self.reference.as_ref()
    }

    /// Keys this rule reads from each record, in handler order.
    pub fn source_keys(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(SourceKeyHandler::key)
    }

    /// Render the rule's value for `record`.
    pub fn apply(&self, record: &ParsedRecord) -> Result<String> {
        let mut args = Vec::with_capacity(self.handlers.len());
        for handler in &self.handlers {
            let value = handler.read(record).ok_or_else(|| Error::Lookup {
                field: self.field_name.clone(),
                key: handler.key().to_string(),
            })?;
            args.push(value);
        }

        let rendered = substitute(&self.pattern, &args).map_err(|reason| Error::Pattern {
            field: self.field_name.clone(),
            pattern: self.pattern.clone(),
            reason,
        })?;
        Ok(unindent(&rendered))
    }
}

/// Fill the placeholders of `pattern` with `args`.
fn substitute(pattern: &str, args: &[String]) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut next_auto = 0;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut spec = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => spec.push(c),
                        None => return Err("unclosed '{'".to_string()),
                    }
                }
                let index = if spec.is_empty() {
                    next_auto += 1;
                    next_auto - 1
                } else {
                    spec.trim()
                        .parse::<usize>()
                        .map_err(|_| format!("'{{{spec}}}' is not a positional placeholder"))?
                };
                let value = args.get(index).ok_or_else(|| {
                    format!(
                        "placeholder {{{index}}} has no value; the rule reads {} source key(s)",
                        args.len()
                    )
                })?;
                out.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err("single '}' outside a placeholder".to_string()),
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Find the rule targeting `field`.
pub fn find_rule<'a>(field: &str, rules: &'a [FieldMappingRule]) -> Option<&'a FieldMappingRule> {
    rules.iter().find(|rule| rule.field_name() == field)
}

/// Resolve the literal value of one schema field for one record.
///
/// A matching rule always wins over a record key of the same name. Raw record
/// values are quoted when the declared type is a string type. Returns
/// `Ok(None)` when nothing provides a value and `require_all` is off.
pub fn resolve_field_value(
    backend: &dyn TemplateBackend,
    field: &str,
    declared_type: &str,
    record: &ParsedRecord,
    rules: &[FieldMappingRule],
    require_all: bool,
) -> Result<Option<String>> {
    if let Some(rule) = find_rule(field, rules) {
        return rule.apply(record).map(Some);
    }

    if let Some(raw) = record.get(field) {
        let value = if backend.is_string_type(declared_type) {
            backend.string_literal(raw)
        } else {
            raw.to_string()
        };
        return Ok(Some(value));
    }

    if require_all {
        return Err(Error::MissingField {
            field: field.to_string(),
            reason: "no mapping rule or source key provides a value".to_string(),
        });
    }

    Ok(None)
}
