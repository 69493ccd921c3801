//! Target schema descriptors.

use indexmap::IndexMap;
use litgen_core::is_valid_identifier;

use crate::{
    Error, Result,
    reference::{TypeDescriptor, TypeReference},
};

/// The common base type every generated literal class derives from.
///
/// Fields keep their declaration order, which is also the order field
/// assignments are emitted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSchema {
    descriptor: TypeDescriptor,
    fields: IndexMap<String, String>,
}

impl TargetSchema {
    /// Create a schema named `name` defined in `module`, with no fields.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            descriptor: TypeDescriptor::new(module, name),
            fields: IndexMap::new(),
        }
    }

    /// Declare a field with its semantic type name (e.g., "str", "int").
    ///
    /// Redeclaring a field replaces its type but keeps its position.
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), type_name.into());
        self
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn module(&self) -> &str {
        self.descriptor.module()
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Reference used to import the schema into generated code.
    pub fn reference(&self) -> TypeReference {
        TypeReference::Type(self.descriptor.clone())
    }

    /// Iterate over `(field, declared type)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn declared_type(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that the schema can serve as a base class for generated code.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_identifier(self.name()) {
            return Err(Error::configuration(format!(
                "schema name '{}' is not a valid identifier",
                self.name()
            )));
        }
        if self.module().is_empty() {
            return Err(Error::configuration(format!(
                "schema '{}' has no module",
                self.name()
            )));
        }
        if let Some(field) = self.fields.keys().find(|f| !is_valid_identifier(f)) {
            return Err(Error::configuration(format!(
                "schema '{}' declares field '{field}', which is not a valid identifier",
                self.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = TargetSchema::new("models", "Base")
            .field("name", "str")
            .field("abbreviation", "str")
            .field("id", "int");

        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "abbreviation", "id"]);
        assert_eq!(schema.declared_type("id"), Some("int"));
        assert!(!schema.has_field("missing"));
    }

    #[test]
    fn test_validate_rejects_bad_identifiers() {
        assert!(TargetSchema::new("models", "Base").validate().is_ok());

        let err = TargetSchema::new("models", "Not A Class").validate().unwrap_err();
        assert!(err.is_configuration());

        let err = TargetSchema::new("models", "Base")
            .field("bad-field", "str")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("bad-field"));

        assert!(TargetSchema::new("", "Base").validate().is_err());
    }
}
