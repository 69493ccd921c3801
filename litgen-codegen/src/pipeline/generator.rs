//! The model generator: one record source in, one generated file out.

use std::{collections::HashSet, fmt, path::Path, sync::Arc};

use litgen_core::{
    Provenance, is_pascal_case, normalize_model_source_provenance, replace_tabs_with_spaces,
    unindent, write_file,
};
use tracing::{debug, info, warn};

use super::{CodeFormatter, CodeValidator};
use crate::{
    Error, Result,
    blueprint::{LiteralModelOptions, RecordBlueprint, generate_enum_like_class, generate_literal_model},
    imports::ImportCollector,
    mapping::FieldMappingRule,
    record::ParsedRecord,
    reference::{TypeReference, resolve_reference},
    schema::TargetSchema,
    source::RecordSource,
    template::TemplateBackend,
};

/// Field the aggregate's discriminated union switches on.
pub const DEFAULT_DISCRIMINATOR: &str = "name";

/// Record keys tried, in order, for a literal class name.
pub const DEFAULT_NAME_HINTS: [&str; 2] = ["abbreviation", "name"];

/// Module substituted for references into the entry script.
pub const DEFAULT_MODULE_NAME: &str = "litgen.generated";

/// Provenance used when neither the caller nor the source names one.
const IN_MEMORY_PROVENANCE: &str = "in-memory records";

/// Generates the literal classes and the aggregate class for one source.
///
/// ```ignore
/// use std::sync::Arc;
///
/// use litgen_codegen::{ModelGenerator, ParsedRecord, StaticSource, TargetSchema};
/// use litgen_codegen::testing::PlainTemplate;
///
/// let schema = TargetSchema::new("models", "Base").field("name", "str");
/// let source = StaticSource::new(vec![ParsedRecord::from([("name", "foo")])]);
///
/// let mut generator = ModelGenerator::new("Things", schema, source, Arc::new(PlainTemplate));
/// let code = generator.generate(&[], &[])?;
/// assert!(code.contains("FOO => Foo"));
/// # Ok::<(), litgen_codegen::Error>(())
/// ```
pub struct ModelGenerator {
    class_name: String,
    schema: TargetSchema,
    source: Box<dyn RecordSource>,
    backend: Arc<dyn TemplateBackend>,
    provenance: Option<Provenance>,
    discriminator: String,
    name_hints: Vec<String>,
    preamble: Option<String>,
    additional_imports: Vec<TypeReference>,
    render_abbreviation_map: bool,
    rules: Vec<FieldMappingRule>,
    default_module_name: Option<String>,
    require_all_fields_mapped: bool,
    records: Option<Vec<ParsedRecord>>,
}

impl ModelGenerator {
    /// Create a generator for the aggregate class `class_name`.
    ///
    /// Nothing is parsed or validated until the first generation.
    pub fn new(
        class_name: impl Into<String>,
        schema: TargetSchema,
        source: impl RecordSource + 'static,
        backend: Arc<dyn TemplateBackend>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            schema,
            source: Box::new(source),
            backend,
            provenance: None,
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            name_hints: DEFAULT_NAME_HINTS.iter().map(|h| h.to_string()).collect(),
            preamble: None,
            additional_imports: Vec::new(),
            render_abbreviation_map: true,
            rules: Vec::new(),
            default_module_name: Some(DEFAULT_MODULE_NAME.to_string()),
            require_all_fields_mapped: false,
            records: None,
        }
    }

    /// Override the provenance written into the file header.
    pub fn with_provenance(mut self, provenance: impl Into<Provenance>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = discriminator.into();
        self
    }

    /// Replace the record keys tried for literal class names.
    pub fn with_name_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    /// Code inserted between the imports and the generated classes.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn with_import(mut self, reference: impl Into<TypeReference>) -> Self {
        self.additional_imports.push(reference.into());
        self
    }

    pub fn with_abbreviation_map(mut self, render: bool) -> Self {
        self.render_abbreviation_map = render;
        self
    }

    pub fn with_rule(mut self, rule: FieldMappingRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = FieldMappingRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Module substituted for references into the entry script. `None`
    /// makes such references a configuration error.
    pub fn with_default_module_name(mut self, module: Option<String>) -> Self {
        self.default_module_name = module;
        self
    }

    pub fn with_require_all_fields_mapped(mut self, require: bool) -> Self {
        self.require_all_fields_mapped = require;
        self
    }

    /// Name of the aggregate class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    pub fn rules(&self) -> &[FieldMappingRule] {
        &self.rules
    }

    pub fn backend(&self) -> &dyn TemplateBackend {
        self.backend.as_ref()
    }

    /// File name used when no explicit target path is given.
    pub fn default_file_name(&self) -> String {
        format!(
            "{}.{}",
            self.class_name.to_lowercase(),
            self.backend.file_extension()
        )
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if !is_pascal_case(&self.class_name) {
            return Err(Error::configuration(format!(
                "class name '{}' must be in PascalCase",
                self.class_name
            )));
        }

        self.schema.validate()?;

        let mut seen = HashSet::new();
        if let Some(rule) = self.rules.iter().find(|r| !seen.insert(r.field_name())) {
            let fields: Vec<_> = self.rules.iter().map(FieldMappingRule::field_name).collect();
            return Err(Error::configuration(format!(
                "mapping rule field '{}' is not unique across rules [{}]",
                rule.field_name(),
                fields.join(", ")
            )));
        }

        Ok(())
    }

    /// The parsed records, read from the source on first use.
    pub fn records(&mut self) -> Result<&[ParsedRecord]> {
        self.load()?;
        Ok(self.records.as_deref().unwrap_or_default())
    }

    /// Drop the memoized records and read the source again.
    pub fn reparse(&mut self) -> Result<&[ParsedRecord]> {
        self.records = None;
        self.records()
    }

    fn load(&mut self) -> Result<()> {
        if self.records.is_none() {
            let records = self.source.parse()?;
            debug!(class_name = %self.class_name, count = records.len(), "parsed records");
            self.records = Some(records);
        }
        Ok(())
    }

    /// One blueprint per record, in record order.
    pub fn blueprints(&mut self) -> Result<Vec<RecordBlueprint>> {
        self.load()?;
        let records = self.records.as_deref().unwrap_or_default();
        self.build_blueprints(records)
    }

    fn build_blueprints(&self, records: &[ParsedRecord]) -> Result<Vec<RecordBlueprint>> {
        let options = LiteralModelOptions {
            rules: &self.rules,
            class_name: None,
            name_hints: &self.name_hints,
            require_all_fields_mapped: self.require_all_fields_mapped,
        };
        records
            .iter()
            .map(|record| generate_literal_model(self.backend(), record, &self.schema, options))
            .collect()
    }

    /// Imports required by rule references, the schema and additional imports.
    fn collect_imports(&self) -> Result<ImportCollector> {
        let schema_reference = self.schema.reference();
        let references = self
            .rules
            .iter()
            .filter_map(FieldMappingRule::reference)
            .chain(std::iter::once(&schema_reference))
            .chain(&self.additional_imports);

        let mut imports = ImportCollector::new();
        for reference in references {
            let resolved =
                resolve_reference(self.backend(), reference, self.default_module_name.as_deref())?;
            if let Some((module, symbol)) = resolved {
                imports.add(&module, &symbol);
            }
        }
        Ok(imports)
    }

    fn provenance(&self) -> Provenance {
        self.provenance
            .clone()
            .or_else(|| self.source.provenance())
            .unwrap_or_else(|| Provenance::Label(IN_MEMORY_PROVENANCE.to_string()))
    }

    /// Generate the file, validate it, then format it.
    ///
    /// Validators run in order and the first error stops the run. Each
    /// formatter receives the previous one's output.
    pub fn generate(
        &mut self,
        validators: &[Box<dyn CodeValidator>],
        formatters: &[Box<dyn CodeFormatter>],
    ) -> Result<String> {
        self.validate()?;
        self.load()?;

        let records = self.records.as_deref().unwrap_or_default();
        let blueprints = self.build_blueprints(records)?;
        let aggregate = generate_enum_like_class(
            self.backend(),
            &self.class_name,
            &self.discriminator,
            self.schema.name(),
            &blueprints,
            self.render_abbreviation_map,
        )?;
        let imports = self.collect_imports()?;

        let backend = self.backend();
        let mut code = backend.file_header(&normalize_model_source_provenance(&self.provenance()));
        code.push_str(&backend.import_statements());
        code.push_str(&imports.render(backend));
        if let Some(preamble) = &self.preamble {
            code.push_str(preamble);
        }

        code.push_str("\n\n");
        if !blueprints.is_empty() {
            let body: Vec<_> = blueprints.iter().map(RecordBlueprint::code).collect();
            code.push_str(&body.join("\n\n"));
            code.push_str("\n\n");
        }
        code.push_str(&aggregate);

        let mut code = replace_tabs_with_spaces(&unindent(&code));

        for validator in validators {
            if let Err(diagnostic) = validator.validate(&code) {
                warn!(validator = validator.name(), class_name = %self.class_name, "{diagnostic}");
                return Err(Error::Validation {
                    validator: validator.name().to_string(),
                    diagnostic,
                });
            }
        }

        for formatter in formatters {
            debug!(formatter = formatter.name(), "formatting");
            code = formatter.format(&code)?;
        }

        info!(
            class_name = %self.class_name,
            records = blueprints.len(),
            "generated aggregate"
        );
        Ok(code)
    }

    /// Generate and fully overwrite `path`.
    pub fn write(
        &mut self,
        path: &Path,
        validators: &[Box<dyn CodeValidator>],
        formatters: &[Box<dyn CodeFormatter>],
    ) -> Result<()> {
        let code = self.generate(validators, formatters)?;
        write_file(path, &code).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(class_name = %self.class_name, path = %path.display(), "wrote generated file");
        Ok(())
    }
}

impl fmt::Debug for ModelGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGenerator")
            .field("class_name", &self.class_name)
            .field("schema", &self.schema)
            .field("discriminator", &self.discriminator)
            .field("name_hints", &self.name_hints)
            .field("rules", &self.rules)
            .field("default_module_name", &self.default_module_name)
            .field("require_all_fields_mapped", &self.require_all_fields_mapped)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        Diagnostic, StaticSource,
        reference::{ForwardReference, TypeDescriptor},
        testing::PlainTemplate,
    };

    fn schema() -> TargetSchema {
        TargetSchema::new("models.base", "Base")
            .field("name", "str")
            .field("id", "int")
    }

    fn records() -> Vec<ParsedRecord> {
        vec![
            ParsedRecord::from([("name", "foo"), ("id", "1")]),
            ParsedRecord::from([("name", "bar"), ("id", "2")]),
            ParsedRecord::from([("name", "baz"), ("id", "3")]),
        ]
    }

    fn generator() -> ModelGenerator {
        ModelGenerator::new(
            "Things",
            schema(),
            StaticSource::new(records()),
            Arc::new(PlainTemplate),
        )
        .with_provenance("things.csv")
        .with_abbreviation_map(false)
    }

    struct Reject;

    impl CodeValidator for Reject {
        fn name(&self) -> &str {
            "reject"
        }

        fn check(&self, _code: &str, diagnostics: &mut Vec<Diagnostic>) {
            diagnostics.push(Diagnostic::error(self.name(), "nope"));
        }
    }

    struct Append(&'static str);

    impl CodeFormatter for Append {
        fn name(&self) -> &str {
            "append"
        }

        fn format(&self, code: &str) -> Result<String> {
            Ok(format!("{code}{}", self.0))
        }
    }

    #[test]
    fn test_generate_assembles_file() {
        let code = generator().generate(&[], &[]).unwrap();
        let expected = r#"# things.csv
use models.base::Base


class Foo : Base
    name = "foo"
    id = 1


class Bar : Base
    name = "bar"
    id = 2


class Baz : Base
    name = "baz"
    id = 3


class Things
    FOO => Foo
    BAR => Bar
    BAZ => Baz
    all: Base
    one_of: Base by name
"#;
        assert_eq!(code, expected);
    }

    #[test]
    fn test_imports_are_deduplicated() {
        let org = ForwardReference::new("models.orgs", "Organization");
        let mut generator = generator()
            .with_rule(
                FieldMappingRule::new("id", "Organization.{0}")
                    .with_keys(["id"])
                    .with_reference(org.clone()),
            )
            .with_import(org)
            .with_import(TypeDescriptor::new("models.base", "Base"))
            .with_import(TypeDescriptor::builtin("int"));

        let code = generator.generate(&[], &[]).unwrap();
        assert_eq!(code.matches("use models.orgs::Organization\n").count(), 1);
        assert_eq!(code.matches("use models.base::Base\n").count(), 1);
        assert!(code.find("use models.orgs").unwrap() < code.find("use models.base").unwrap());
        assert!(!code.contains("builtins"));
    }

    #[test]
    fn test_entry_module_import_uses_default_module() {
        let mut generator = generator().with_import(TypeDescriptor::entry("Local"));
        let code = generator.generate(&[], &[]).unwrap();
        assert!(code.contains("use litgen.generated::Local\n"));

        let mut generator = generator.with_default_module_name(None);
        let err = generator.generate(&[], &[]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_preamble_precedes_body() {
        let mut generator = generator().with_preamble("CONSTANT = 1\n");
        let code = generator.generate(&[], &[]).unwrap();
        let preamble = code.find("CONSTANT = 1").unwrap();
        assert!(preamble > code.find("use models.base").unwrap());
        assert!(preamble < code.find("class Foo").unwrap());
    }

    #[test]
    fn test_class_name_must_be_pascal_case() {
        let mut generator = ModelGenerator::new(
            "not_pascal",
            schema(),
            StaticSource::default(),
            Arc::new(PlainTemplate),
        );
        assert!(generator.generate(&[], &[]).unwrap_err().is_configuration());
    }

    #[test]
    fn test_rule_fields_must_be_unique() {
        let generator = generator()
            .with_rule(FieldMappingRule::new("id", "{0}").with_keys(["id"]))
            .with_rule(FieldMappingRule::new("id", "{0}{0}").with_keys(["id"]));
        let err = generator.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_validator_failure_stops_before_formatting() {
        let validators: Vec<Box<dyn CodeValidator>> = vec![Box::new(Reject)];
        let formatters: Vec<Box<dyn CodeFormatter>> = vec![Box::new(Append("!"))];

        let err = generator().generate(&validators, &formatters).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { ref validator, ref diagnostic } if validator == "reject" && diagnostic.message == "nope"
        ));
    }

    #[test]
    fn test_formatters_are_chained_in_order() {
        let formatters: Vec<Box<dyn CodeFormatter>> =
            vec![Box::new(Append("a")), Box::new(Append("b"))];
        let code = generator().generate(&[], &formatters).unwrap();
        assert!(code.ends_with("by name\nab"));
    }

    #[test]
    fn test_source_is_parsed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = move || -> Result<Vec<ParsedRecord>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(records())
        };
        let mut generator =
            ModelGenerator::new("Things", schema(), source, Arc::new(PlainTemplate));

        generator.generate(&[], &[]).unwrap();
        generator.generate(&[], &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(generator.reparse().unwrap().len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_blueprints_are_rebuilt_per_run() {
        let mut generator = generator();
        let first = generator.generate(&[], &[]).unwrap();
        let second = generator.generate(&[], &[]).unwrap();
        assert_eq!(first, second);
        assert_eq!(generator.blueprints().unwrap().len(), 3);
    }

    #[test]
    fn test_naming_error_aborts_run() {
        let source = StaticSource::new(vec![ParsedRecord::from([("id", "1")])]);
        let mut generator =
            ModelGenerator::new("Things", schema(), source, Arc::new(PlainTemplate));
        assert!(matches!(generator.generate(&[], &[]), Err(Error::Naming { .. })));
    }

    #[test]
    fn test_write_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("things.txt");
        std::fs::write(&path, "stale content that is longer than nothing").unwrap();

        let mut generator = generator();
        generator.write(&path, &[], &[]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# things.csv\n"));
        assert!(!written.contains("stale"));
        assert_eq!(generator.default_file_name(), "things.txt");
    }
}
