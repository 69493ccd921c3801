//! Named value transforms available to `[[generator.rules]]` keys.

use std::{fmt, str::FromStr};

use litgen_codegen::TemplateBackend;
use litgen_core::{create_enum_key_from_class_name, sanitize_class_name, to_pascal_case};
use litgen_python::PythonTemplate;
use tracing::warn;

/// A transform referenced by name from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedTransform {
    Upper,
    Lower,
    Trim,
    Pascal,
    ClassName,
    EnumKey,
    Quote,
}

impl NamedTransform {
    pub const ALL: [NamedTransform; 7] = [
        NamedTransform::Upper,
        NamedTransform::Lower,
        NamedTransform::Trim,
        NamedTransform::Pascal,
        NamedTransform::ClassName,
        NamedTransform::EnumKey,
        NamedTransform::Quote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamedTransform::Upper => "upper",
            NamedTransform::Lower => "lower",
            NamedTransform::Trim => "trim",
            NamedTransform::Pascal => "pascal",
            NamedTransform::ClassName => "class_name",
            NamedTransform::EnumKey => "enum_key",
            NamedTransform::Quote => "quote",
        }
    }

    /// Apply the transform to one field value.
    ///
    /// `enum_key` has no key for an empty value and leaves it untouched.
    pub fn apply(&self, value: &str) -> String {
        match self {
            NamedTransform::Upper => value.to_uppercase(),
            NamedTransform::Lower => value.to_lowercase(),
            NamedTransform::Trim => value.trim().to_string(),
            NamedTransform::Pascal => to_pascal_case(value),
            NamedTransform::ClassName => sanitize_class_name(value),
            NamedTransform::EnumKey => match create_enum_key_from_class_name(value) {
                Ok(key) => key,
                Err(err) => {
                    warn!(value, "enum_key transform: {err}");
                    value.to_string()
                }
            },
            NamedTransform::Quote => PythonTemplate::new().string_literal(value),
        }
    }
}

impl fmt::Display for NamedTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a transform name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransform(pub String);

impl FromStr for NamedTransform {
    type Err = UnknownTransform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamedTransform::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTransform(s.to_string()))
    }
}
