//! Manifest types and parsing for litgen.toml files.

mod file;
mod parse;
mod validate;

use std::path::{Path, PathBuf};

pub use file::LitgenToml;
use litgen_codegen::TemplateBackend;
use litgen_python::PythonTemplate;
use serde::Deserialize;
pub use validate::ParseContext;

/// Root manifest for litgen.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub validators: ValidatorsConfig,

    #[serde(default)]
    pub formatters: FormattersConfig,

    /// One entry per generated file
    #[serde(default, rename = "generator")]
    pub generators: Vec<GeneratorConfig>,
}

impl Manifest {
    pub fn generator(&self, class_name: &str) -> Option<&GeneratorConfig> {
        self.generators.iter().find(|g| g.class_name == class_name)
    }
}

/// `[output]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory, relative to the manifest
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_true")]
    pub create_dir: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            create_dir: true,
        }
    }
}

/// `[validators]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorsConfig {
    #[serde(default = "default_true")]
    pub python_syntax: bool,
}

impl Default for ValidatorsConfig {
    fn default() -> Self {
        Self {
            python_syntax: true,
        }
    }
}

/// `[formatters]`, applied in the order sort_imports, layout, commands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormattersConfig {
    #[serde(default)]
    pub sort_imports: bool,

    /// Top-level packages the import sorter treats as first party
    #[serde(default)]
    pub first_party: Vec<String>,

    #[serde(default)]
    pub layout: bool,

    /// External formatters, each an argv reading stdin and writing stdout
    #[serde(default)]
    pub commands: Vec<Vec<String>>,
}

/// `[[generator]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Name of the aggregate class
    pub class_name: String,

    /// Record file, relative to the manifest
    pub source: PathBuf,

    /// Overrides detection from the source extension
    pub format: Option<SourceFormat>,

    /// CSV delimiter (single byte)
    pub delimiter: Option<char>,

    /// Free-form provenance written into the header instead of the source path
    pub provenance: Option<String>,

    pub discriminator: Option<String>,

    pub name_hints: Option<Vec<String>>,

    #[serde(default = "default_true")]
    pub render_abbreviation_map: bool,

    #[serde(default)]
    pub require_all_fields_mapped: bool,

    pub default_module_name: Option<String>,

    pub preamble: Option<String>,

    /// File name inside the output directory
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub additional_imports: Vec<ImportConfig>,

    pub schema: SchemaConfig,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl GeneratorConfig {
    /// Source format, explicit or detected from the file extension.
    pub fn source_format(&self) -> Option<SourceFormat> {
        self.format.or_else(|| SourceFormat::from_path(&self.source))
    }

    /// Output file name, falling back to the lowercased class name with the
    /// backend's extension.
    pub fn output_file(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!(
                "{}.{}",
                self.class_name.to_lowercase(),
                PythonTemplate::new().file_extension()
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(SourceFormat::Csv),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }
}

/// A `{ module, symbol }` pair naming something to import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    pub module: String,
    pub symbol: String,
}

/// `[generator.schema]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// `[[generator.rules]]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub field: String,
    pub pattern: String,
    #[serde(default)]
    pub keys: Vec<KeyConfig>,
    pub reference: Option<ImportConfig>,
}

/// A source key, either bare (`"org"`) or with a transform
/// (`{ key = "org", transform = "enum_key" }`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyConfig {
    Plain(String),
    Detailed {
        key: String,
        transform: Option<String>,
    },
}

impl KeyConfig {
    pub fn key(&self) -> &str {
        match self {
            KeyConfig::Plain(key) => key,
            KeyConfig::Detailed { key, .. } => key,
        }
    }

    pub fn transform(&self) -> Option<&str> {
        match self {
            KeyConfig::Plain(_) => None,
            KeyConfig::Detailed { transform, .. } => transform.as_deref(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_true() -> bool {
    true
}
