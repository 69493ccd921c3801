//! Conversion of a parsed manifest into a ready-to-run generation context.

use std::{path::Path, sync::Arc};

use litgen_codegen::{
    CommandFormatter, CsvSource, FieldMappingRule, ForwardReference, GenerationContext,
    GeneratorId, JsonSource, ModelGenerator, SourceKeyHandler, TargetSchema, TemplateBackend,
};
use litgen_python::{ImportSortFormatter, LayoutFormatter, PythonSyntaxValidator, PythonTemplate};
use tracing::debug;

use crate::{
    Error, Result,
    manifest::{GeneratorConfig, ImportConfig, KeyConfig, Manifest, RuleConfig, SourceFormat},
    transform::NamedTransform,
};

impl Manifest {
    /// Build a context holding every `[[generator]]` plus the configured
    /// validators and formatters.
    ///
    /// Relative source paths are resolved against `base_dir`.
    pub fn build_context(&self, base_dir: &Path) -> Result<GenerationContext> {
        let mut context = GenerationContext::new();

        if self.validators.python_syntax {
            context.add_validator(PythonSyntaxValidator::new());
        }
        if self.formatters.sort_imports {
            let formatter = self
                .formatters
                .first_party
                .iter()
                .fold(ImportSortFormatter::new(), |f, module| {
                    f.with_first_party(module.as_str())
                });
            context.add_formatter(formatter);
        }
        if self.formatters.layout {
            context.add_formatter(LayoutFormatter::new());
        }
        for argv in &self.formatters.commands {
            let formatter = CommandFormatter::from_argv(argv.iter().map(String::as_str))
                .map_err(|source| {
                    Box::new(Error::Build {
                        context: format!("formatter command '{}'", argv.join(" ")),
                        source,
                    })
                })?;
            context.add_formatter(formatter);
        }

        let backend: Arc<dyn TemplateBackend> = Arc::new(PythonTemplate::new());
        for config in &self.generators {
            add_generator(&mut context, config, base_dir, Arc::clone(&backend))?;
        }
        Ok(context)
    }
}

fn add_generator(
    context: &mut GenerationContext,
    config: &GeneratorConfig,
    base_dir: &Path,
    backend: Arc<dyn TemplateBackend>,
) -> Result<GeneratorId> {
    let source_path = base_dir.join(&config.source);
    let schema = config
        .schema
        .fields
        .iter()
        .fold(
            TargetSchema::new(&config.schema.module, &config.schema.name),
            |schema, field| schema.field(&field.name, &field.type_name),
        );

    let mut generator = match config.source_format() {
        Some(SourceFormat::Json) => ModelGenerator::new(
            &config.class_name,
            schema,
            JsonSource::from_path(&source_path),
            backend,
        ),
        Some(SourceFormat::Csv) | None => {
            let mut source = CsvSource::from_path(&source_path);
            if let Some(delimiter) = config.delimiter {
                source = source.with_delimiter(delimiter as u8);
            }
            ModelGenerator::new(&config.class_name, schema, source, backend)
        }
    };

    generator = match &config.provenance {
        Some(label) => generator.with_provenance(label.as_str()),
        None => generator.with_provenance(config.source.as_path()),
    };
    if let Some(discriminator) = &config.discriminator {
        generator = generator.with_discriminator(discriminator);
    }
    if let Some(hints) = &config.name_hints {
        generator = generator.with_name_hints(hints.iter().map(String::as_str));
    }
    if let Some(preamble) = &config.preamble {
        generator = generator.with_preamble(preamble);
    }
    if config.default_module_name.is_some() {
        generator = generator.with_default_module_name(config.default_module_name.clone());
    }
    for import in &config.additional_imports {
        generator = generator.with_import(forward_reference(import));
    }

    let generator = generator
        .with_abbreviation_map(config.render_abbreviation_map)
        .with_require_all_fields_mapped(config.require_all_fields_mapped)
        .with_rules(config.rules.iter().map(build_rule));

    generator.validate().map_err(|source| {
        Box::new(Error::Build {
            context: format!("generator '{}'", config.class_name),
            source,
        })
    })?;

    debug!(
        class_name = %config.class_name,
        source = %source_path.display(),
        rules = config.rules.len(),
        "registered generator"
    );
    Ok(context.add_generator(generator, config.output.clone()))
}

fn build_rule(config: &RuleConfig) -> FieldMappingRule {
    let rule = config
        .keys
        .iter()
        .fold(FieldMappingRule::new(&config.field, &config.pattern), |rule, key| {
            rule.with_handler(build_handler(key))
        });
    match &config.reference {
        Some(reference) => rule.with_reference(forward_reference(reference)),
        None => rule,
    }
}

fn build_handler(key: &KeyConfig) -> SourceKeyHandler {
    // Transform names are checked during manifest validation.
    match key
        .transform()
        .and_then(|name| name.parse::<NamedTransform>().ok())
    {
        Some(transform) => {
            SourceKeyHandler::with_transform(key.key(), move |value: &str| transform.apply(value))
        }
        None => SourceKeyHandler::new(key.key()),
    }
}

fn forward_reference(import: &ImportConfig) -> ForwardReference {
    ForwardReference::new(&import.module, &import.symbol)
}
