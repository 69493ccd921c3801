//! Python/pydantic rendering of generation directives.

use litgen_codegen::TemplateBackend;

const STANDARD_IMPORTS: &str = "\
from typing import Literal, Union

from pydantic import Field
from typing_extensions import Annotated

";

/// Renders generated files as Python modules of pydantic models.
///
/// Literal classes pin every field with `Literal[...]`; the aggregate class
/// exposes one instance per record plus `ALL` and `ONE_OF`.
#[derive(Debug, Clone, Default)]
pub struct PythonTemplate {
    generator_name: Option<String>,
}

impl PythonTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the tool in the file header instead of "litgen".
    pub fn with_generator_name(mut self, name: impl Into<String>) -> Self {
        self.generator_name = Some(name.into());
        self
    }
}

impl TemplateBackend for PythonTemplate {
    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn import_statement(&self, module: &str, symbol: &str) -> String {
        format!("from {module} import {symbol}\n")
    }

    fn import_statements(&self) -> String {
        STANDARD_IMPORTS.to_string()
    }

    fn file_header(&self, provenance: &str) -> String {
        let tool = self.generator_name.as_deref().unwrap_or("litgen");
        format!("\"\"\"Generated by {tool} from {provenance}. Do not edit by hand.\"\"\"\n\n")
    }

    fn class_header(&self, class_name: &str, base: Option<&str>) -> String {
        match base {
            Some(base) => format!("class {class_name}({base}):\n\t\"\"\"{class_name}\"\"\"\n\n"),
            None => format!("class {class_name}:\n\t\"\"\"{class_name}\"\"\"\n\n"),
        }
    }

    fn field_assignment(&self, name: &str, value: &str) -> String {
        format!("{name}: Literal[{value}] = {value}\n")
    }

    fn enum_entry(&self, key: &str, value: &str) -> String {
        format!("{key} = {value}()\n")
    }

    fn collect_subclasses(&self, parent: &str) -> String {
        format!("\nALL = tuple({parent}.__subclasses__())\n")
    }

    fn discriminated_union(&self, parent: &str, discriminator: &str) -> String {
        format!(
            "\nONE_OF = Annotated[Union[tuple({parent}.__subclasses__())], Field(discriminator=\"{discriminator}\")]\n"
        )
    }

    fn abbreviation_map(&self) -> String {
        "\nabbreviation_map = {m().abbreviation: m() for m in ALL}\n\
         \n\
         @classmethod\n\
         def from_abbreviation(cls, abbreviation: str):\n\
         \t\"\"\"Get class from abbreviation\"\"\"\n\
         \treturn cls.abbreviation_map[abbreviation]\n"
            .to_string()
    }
}
