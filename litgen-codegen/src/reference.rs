//! Type references and import resolution.

use std::fmt;

use crate::{
    Error, Result,
    template::{BUILTIN_MODULE, ENTRY_MODULE, TemplateBackend},
};

/// A concrete type known to the generator: the module defining it and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    module: String,
    name: String,
}

impl TypeDescriptor {
    /// Create a descriptor for `name` defined in `module`.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// A builtin type such as `int` or `str`.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(BUILTIN_MODULE, name)
    }

    /// A type defined in the entry script.
    pub fn entry(name: impl Into<String>) -> Self {
        Self::new(ENTRY_MODULE, name)
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An explicit `(module, symbol)` pair standing in for a type that cannot be
/// referenced directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardReference {
    module_name: String,
    symbol_name: String,
}

impl ForwardReference {
    pub fn new(module_name: impl Into<String>, symbol_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            symbol_name: symbol_name.into(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }
}

/// Something generated code has to import.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    /// A concrete type descriptor.
    Type(TypeDescriptor),
    /// A forward reference by module and symbol name.
    Forward(ForwardReference),
}

impl TypeReference {
    /// The module the referenced symbol lives in.
    pub fn module_name(&self) -> &str {
        match self {
            TypeReference::Type(ty) => ty.module(),
            TypeReference::Forward(fwd) => fwd.module_name(),
        }
    }

    /// The referenced symbol.
    pub fn symbol_name(&self) -> &str {
        match self {
            TypeReference::Type(ty) => ty.name(),
            TypeReference::Forward(fwd) => fwd.symbol_name(),
        }
    }
}

impl From<TypeDescriptor> for TypeReference {
    fn from(ty: TypeDescriptor) -> Self {
        TypeReference::Type(ty)
    }
}

impl From<ForwardReference> for TypeReference {
    fn from(fwd: ForwardReference) -> Self {
        TypeReference::Forward(fwd)
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module_name(), self.symbol_name())
    }
}

/// Resolve the `(module, symbol)` pair an import of `reference` needs.
///
/// Returns `None` for builtins. A reference into the entry script is
/// redirected to `default_module_name`; without one this is a configuration
/// error.
pub fn resolve_reference(
    backend: &dyn TemplateBackend,
    reference: &TypeReference,
    default_module_name: Option<&str>,
) -> Result<Option<(String, String)>> {
    let module = reference.module_name();
    let symbol = reference.symbol_name();

    if backend.is_builtin_module(module) {
        return Ok(None);
    }

    let module = if backend.is_entry_module(module) {
        default_module_name.ok_or_else(|| {
            Error::configuration(format!(
                "'{symbol}' is defined in the entry module '{module}' but no default module name was provided to override it"
            ))
        })?
    } else {
        module
    };

    Ok(Some((module.to_string(), symbol.to_string())))
}

/// Render the import statement `reference` needs, or an empty string for
/// builtins.
pub fn solve_import(
    backend: &dyn TemplateBackend,
    reference: &TypeReference,
    default_module_name: Option<&str>,
) -> Result<String> {
    Ok(resolve_reference(backend, reference, default_module_name)?
        .map(|(module, symbol)| backend.import_statement(&module, &symbol))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PlainTemplate;

    #[test]
    fn test_solve_import_from_forward_reference() {
        let reference = TypeReference::from(ForwardReference::new("my_module", "MyClass"));
        let import = solve_import(&PlainTemplate, &reference, None).unwrap();
        assert_eq!(import, PlainTemplate.import_statement("my_module", "MyClass"));
    }

    #[test]
    fn test_solve_import_from_type() {
        let reference = TypeReference::from(TypeDescriptor::new("models.base", "MyMockType"));
        let import = solve_import(&PlainTemplate, &reference, None).unwrap();
        assert_eq!(import, PlainTemplate.import_statement("models.base", "MyMockType"));
    }

    #[test]
    fn test_solve_import_from_builtin() {
        let reference = TypeReference::from(TypeDescriptor::builtin("int"));
        assert_eq!(solve_import(&PlainTemplate, &reference, None).unwrap(), "");
        assert_eq!(
            solve_import(&PlainTemplate, &reference, Some("ignored")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_solve_import_from_entry_module_uses_default() {
        let reference = TypeReference::from(TypeDescriptor::entry("LocalClass"));
        let import = solve_import(&PlainTemplate, &reference, Some("tests.local")).unwrap();
        assert_eq!(import, PlainTemplate.import_statement("tests.local", "LocalClass"));
    }

    #[test]
    fn test_solve_import_from_entry_module_without_default() {
        let reference = TypeReference::from(ForwardReference::new(ENTRY_MODULE, "MyClass"));
        let err = solve_import(&PlainTemplate, &reference, None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("MyClass"));
    }

    #[test]
    fn test_forward_references_compare_by_value() {
        let a = ForwardReference::new("mod", "Sym");
        let b = ForwardReference::new("mod", "Sym");
        assert_eq!(a, b);
        assert_ne!(a, ForwardReference::new("mod", "Other"));
        assert_eq!(TypeReference::from(a).to_string(), "mod.Sym");
    }
}
