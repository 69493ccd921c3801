//! Import collection for generated files.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::template::TemplateBackend;

/// Tracks imports and deduplicates them.
///
/// Modules keep insertion order; symbols within a module are sorted.
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Module path -> set of symbols
    imports: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a module.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.imports
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Iterate over all imports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.imports.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render one import statement per symbol through `backend`.
    pub fn render(&self, backend: &dyn TemplateBackend) -> String {
        self.iter()
            .flat_map(|(module, symbols)| {
                symbols
                    .iter()
                    .map(move |symbol| backend.import_statement(module, symbol))
            })
            .collect()
    }
}
