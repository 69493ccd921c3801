//! Per-record blueprints and the enum-like aggregate class.

use litgen_core::{create_enum_key_from_class_name, sanitize_class_name};
use tracing::debug;

use crate::{
    Error, Result,
    mapping::{FieldMappingRule, find_rule, resolve_field_value},
    record::ParsedRecord,
    schema::TargetSchema,
    template::TemplateBackend,
};

/// Generated code for one record.
///
/// The sanitized identifier is derived from the original name when the
/// blueprint is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBlueprint {
    class_name: String,
    sanitized_class_name: String,
    code: String,
}

impl RecordBlueprint {
    pub fn new(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            sanitized_class_name: sanitize_class_name(&class_name),
            class_name,
            code: String::new(),
        }
    }

    /// The name as read from the record.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The identifier used for the generated class.
    pub fn sanitized_class_name(&self) -> &str {
        &self.sanitized_class_name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Append rendered code.
    pub fn push(&mut self, code: &str) {
        self.code.push_str(code);
    }
}

/// Options for [`generate_literal_model`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralModelOptions<'a> {
    /// Mapping rules; a rule wins over a record key of the same name.
    pub rules: &'a [FieldMappingRule],
    /// Explicit class name. When absent, `name_hints` are tried in order.
    pub class_name: Option<&'a str>,
    /// Record keys that may hold the class name.
    pub name_hints: &'a [String],
    /// Fail when a schema field gets no value.
    pub require_all_fields_mapped: bool,
}

/// Build the literal class for one record.
pub fn generate_literal_model(
    backend: &dyn TemplateBackend,
    record: &ParsedRecord,
    schema: &TargetSchema,
    options: LiteralModelOptions<'_>,
) -> Result<RecordBlueprint> {
    let class_name = match options.class_name {
        Some(name) => name,
        None => options
            .name_hints
            .iter()
            .find_map(|hint| record.get(hint))
            .ok_or_else(|| Error::Naming {
                hints: options.name_hints.to_vec(),
            })?,
    };
    let mut blueprint = RecordBlueprint::new(class_name);
    debug!(
        class_name,
        sanitized = blueprint.sanitized_class_name(),
        "synthesizing literal model"
    );

    if options.require_all_fields_mapped {
        check_coverage(record, schema, options.rules)?;
    }

    blueprint.push(&backend.indent(
        &backend.class_header(blueprint.sanitized_class_name(), Some(schema.name())),
        0,
    ));

    for (field, declared_type) in schema.fields() {
        let value = resolve_field_value(
            backend,
            field,
            declared_type,
            record,
            options.rules,
            options.require_all_fields_mapped,
        )?;
        if let Some(value) = value {
            blueprint.push(&backend.indent(&backend.field_assignment(field, &value), 1));
        }
    }

    Ok(blueprint)
}

/// Every schema field must be provided and every rule must target the schema.
fn check_coverage(
    record: &ParsedRecord,
    schema: &TargetSchema,
    rules: &[FieldMappingRule],
) -> Result<()> {
    if let Some((field, _)) = schema
        .fields()
        .find(|(field, _)| find_rule(field, rules).is_none() && !record.contains_key(field))
    {
        return Err(Error::MissingField {
            field: field.to_string(),
            reason: format!(
                "not found in the mapping rules or the source record of '{}'",
                schema.name()
            ),
        });
    }

    if let Some(rule) = rules.iter().find(|rule| !schema.has_field(rule.field_name())) {
        return Err(Error::MissingField {
            field: rule.field_name().to_string(),
            reason: format!("mapping rule targets a field '{}' does not declare", schema.name()),
        });
    }

    Ok(())
}

/// One member of the aggregate class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    /// Enum key derived from the record's original name.
    pub label: String,
    /// Identifier of the literal class the key points at.
    pub reference: String,
}

/// The enum-like class enumerating every literal class of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateDescriptor {
    name: String,
    discriminator: String,
    schema_name: String,
    entries: Vec<AggregateEntry>,
    render_abbreviation_map: bool,
}

impl AggregateDescriptor {
    pub fn new(
        name: impl Into<String>,
        discriminator: impl Into<String>,
        schema_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            discriminator: discriminator.into(),
            schema_name: schema_name.into(),
            entries: Vec::new(),
            render_abbreviation_map: false,
        }
    }

    /// Build a descriptor with one entry per blueprint, in order.
    pub fn from_blueprints(
        name: impl Into<String>,
        discriminator: impl Into<String>,
        schema_name: impl Into<String>,
        blueprints: &[RecordBlueprint],
    ) -> Result<Self> {
        let mut descriptor = Self::new(name, discriminator, schema_name);
        for blueprint in blueprints {
            descriptor.push_entry(AggregateEntry {
                label: create_enum_key_from_class_name(blueprint.class_name())?,
                reference: blueprint.sanitized_class_name().to_string(),
            });
        }
        Ok(descriptor)
    }

    pub fn with_abbreviation_map(mut self, render: bool) -> Self {
        self.render_abbreviation_map = render;
        self
    }

    pub fn push_entry(&mut self, entry: AggregateEntry) {
        self.entries.push(entry);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    pub fn renders_abbreviation_map(&self) -> bool {
        self.render_abbreviation_map
    }

    /// Render the class. Entries keep insertion order.
    pub fn render(&self, backend: &dyn TemplateBackend) -> String {
        let mut out = backend.indent(&backend.class_header(&self.name, None), 0);
        for entry in &self.entries {
            out.push_str(&backend.indent(&backend.enum_entry(&entry.label, &entry.reference), 1));
        }
        out.push_str(&backend.indent(&backend.collect_subclasses(&self.schema_name), 1));
        out.push_str(&backend.indent(
            &backend.discriminated_union(&self.schema_name, &self.discriminator),
            1,
        ));
        if self.render_abbreviation_map {
            out.push_str(&backend.indent(&backend.abbreviation_map(), 1));
        }
        out
    }
}

/// Render the enum-like aggregate class for `blueprints`.
pub fn generate_enum_like_class(
    backend: &dyn TemplateBackend,
    name: &str,
    discriminator: &str,
    schema_name: &str,
    blueprints: &[RecordBlueprint],
    render_abbreviation_map: bool,
) -> Result<String> {
    let descriptor = AggregateDescriptor::from_blueprints(name, discriminator, schema_name, blueprints)?
        .with_abbreviation_map(render_abbreviation_map);
    Ok(descriptor.render(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PlainTemplate;

    fn schema() -> TargetSchema {
        TargetSchema::new("models", "Base")
            .field("a", "str")
            .field("b", "int")
    }

    fn hints() -> Vec<String> {
        vec!["abbreviation".to_string(), "name".to_string()]
    }

    #[test]
    fn test_blueprint_sanitizes_name() {
        let blueprint = RecordBlueprint::new("9 My Mock Type");
        assert_eq!(blueprint.class_name(), "9 My Mock Type");
        assert_eq!(blueprint.sanitized_class_name(), "_9MyMockType");
        assert!(blueprint.code().is_empty());
    }

    #[test]
    fn test_literal_model_fields_in_schema_order() {
        let record = ParsedRecord::from([("b", "5"), ("a", "x"), ("name", "foo")]);
        let hints = hints();
        let options = LiteralModelOptions {
            name_hints: &hints,
            ..Default::default()
        };

        let blueprint = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap();
        assert_eq!(blueprint.class_name(), "foo");
        assert_eq!(blueprint.code(), "class Foo : Base\n\ta = \"x\"\n\tb = 5\n");
    }

    #[test]
    fn test_first_hint_wins() {
        let record = ParsedRecord::from([("name", "Long Name"), ("abbreviation", "LN")]);
        let hints = hints();
        let options = LiteralModelOptions {
            name_hints: &hints,
            ..Default::default()
        };

        let blueprint = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap();
        assert_eq!(blueprint.class_name(), "LN");
        assert_eq!(blueprint.sanitized_class_name(), "Ln");
    }

    #[test]
    fn test_explicit_name_and_missing_hints() {
        let record = ParsedRecord::from([("a", "x")]);
        let options = LiteralModelOptions {
            class_name: Some("Explicit"),
            ..Default::default()
        };
        let blueprint = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap();
        assert_eq!(blueprint.sanitized_class_name(), "Explicit");

        let hints = hints();
        let options = LiteralModelOptions {
            name_hints: &hints,
            ..Default::default()
        };
        let err = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap_err();
        assert!(matches!(err, Error::Naming { ref hints } if hints.len() == 2));
    }

    #[test]
    fn test_unmapped_field_is_omitted() {
        let record = ParsedRecord::from([("a", "x")]);
        let options = LiteralModelOptions {
            class_name: Some("Only A"),
            ..Default::default()
        };
        let blueprint = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap();
        assert_eq!(blueprint.code(), "class OnlyA : Base\n\ta = \"x\"\n");
    }

    #[test]
    fn test_require_all_fields_mapped_names_the_field() {
        let record = ParsedRecord::from([("a", "x")]);
        let options = LiteralModelOptions {
            class_name: Some("Strict"),
            require_all_fields_mapped: true,
            ..Default::default()
        };
        let err = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "b"));
    }

    #[test]
    fn test_require_all_fields_mapped_accepts_rule_coverage() {
        let record = ParsedRecord::from([("a", "x")]);
        let rules = [FieldMappingRule::new("b", "len({0})").with_keys(["a"])];
        let options = LiteralModelOptions {
            rules: &rules,
            class_name: Some("Covered"),
            require_all_fields_mapped: true,
            ..Default::default()
        };
        let blueprint = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap();
        assert_eq!(blueprint.code(), "class Covered : Base\n\ta = \"x\"\n\tb = len(x)\n");
    }

    #[test]
    fn test_require_all_fields_mapped_rejects_foreign_rule() {
        let record = ParsedRecord::from([("a", "x"), ("b", "1")]);
        let rules = [FieldMappingRule::new("c", "{0}").with_keys(["a"])];
        let options = LiteralModelOptions {
            rules: &rules,
            class_name: Some("Foreign"),
            require_all_fields_mapped: true,
            ..Default::default()
        };
        let err = generate_literal_model(&PlainTemplate, &record, &schema(), options).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "c"));
    }

    #[test]
    fn test_enum_like_class_keeps_input_order() {
        let blueprints: Vec<_> = ["foo", "bar", "baz"]
            .into_iter()
            .map(RecordBlueprint::new)
            .collect();

        let code =
            generate_enum_like_class(&PlainTemplate, "Things", "name", "Base", &blueprints, false)
                .unwrap();
        assert_eq!(
            code,
            "class Things\n\tFOO => Foo\n\tBAR => Bar\n\tBAZ => Baz\n\tall: Base\n\tone_of: Base by name\n"
        );
    }

    #[test]
    fn test_enum_like_class_abbreviation_map() {
        let blueprints = [RecordBlueprint::new("My Thing")];
        let code =
            generate_enum_like_class(&PlainTemplate, "Things", "name", "Base", &blueprints, true)
                .unwrap();
        assert!(code.contains("\tMY_THING => MyThing\n"));
        assert!(code.ends_with("\tabbreviations\n"));
    }

    #[test]
    fn test_aggregate_descriptor_entries() {
        let blueprints = [RecordBlueprint::new("_hidden"), RecordBlueprint::new("9lives")];
        let descriptor =
            AggregateDescriptor::from_blueprints("Things", "name", "Base", &blueprints).unwrap();

        let labels: Vec<_> = descriptor.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["__HIDDEN", "_9LIVES"]);
        assert!(!descriptor.renders_abbreviation_map());

        let empty = [RecordBlueprint::new("")];
        assert!(matches!(
            AggregateDescriptor::from_blueprints("Things", "name", "Base", &empty),
            Err(Error::Name(_))
        ));
    }
}
