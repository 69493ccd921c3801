//! Sorting of the leading import block.

use std::collections::{BTreeMap, BTreeSet};

use litgen_codegen::{CodeFormatter, Result};
use tracing::debug;

use crate::validator::continued_string_lines;

/// Standard library modules recognized when grouping imports.
const STDLIB_MODULES: &[&str] = &[
    "abc", "collections", "contextlib", "dataclasses", "datetime", "decimal", "enum", "functools",
    "itertools", "json", "math", "os", "pathlib", "re", "sys", "typing", "uuid", "warnings",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Future,
    Stdlib,
    ThirdParty,
    FirstParty,
}

/// Parsed imports of one section.
#[derive(Debug, Default)]
struct SectionImports {
    /// `import x` / `import x as y` statements.
    plain: BTreeSet<String>,
    /// `from x import ...` statements, module -> names.
    from: BTreeMap<String, BTreeSet<String>>,
}

/// Merges and sorts the import block at the top of a module.
///
/// Imports are grouped into future, standard library, third-party and
/// first-party sections separated by one blank line. Within a section plain
/// `import` statements come first, then `from` imports sorted by module, and
/// names imported from the same module are merged into one statement.
///
/// Blocks containing parenthesized or continued imports, or comments between
/// imports, are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ImportSortFormatter {
    known_first_party: Vec<String>,
}

impl ImportSortFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `module` and its submodules as first-party.
    pub fn with_first_party(mut self, module: impl Into<String>) -> Self {
        self.known_first_party.push(module.into());
        self
    }

    fn section(&self, module: &str) -> Section {
        let root = module.split('.').next().unwrap_or(module);
        if root == "__future__" {
            Section::Future
        } else if root.is_empty() || self.known_first_party.iter().any(|m| m == root) {
            Section::FirstParty
        } else if STDLIB_MODULES.contains(&root) {
            Section::Stdlib
        } else {
            Section::ThirdParty
        }
    }
}

impl CodeFormatter for ImportSortFormatter {
    fn name(&self) -> &str {
        "import-sort"
    }

    fn format(&self, code: &str) -> Result<String> {
        let lines: Vec<&str> = code.lines().collect();
        let continued = continued_string_lines(code);
        let import_at = |i: usize| {
            !continued.get(i).copied().unwrap_or(false) && is_import(lines[i])
        };

        let Some(first) = (0..lines.len()).find(|&i| import_at(i)) else {
            return Ok(code.to_string());
        };
        let end = (first..lines.len())
            .find(|&i| !import_at(i) && !lines[i].trim().is_empty())
            .unwrap_or(lines.len());

        let mut sections: BTreeMap<Section, SectionImports> = BTreeMap::new();
        for line in &lines[first..end] {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.contains('(') || line.ends_with('\\') || line.contains('#') {
                debug!("import block has constructs the sorter does not handle, leaving it as is");
                return Ok(code.to_string());
            }

            if let Some(rest) = line.strip_prefix("from ") {
                let Some((module, names)) = rest.split_once(" import ") else {
                    return Ok(code.to_string());
                };
                let module = module.trim();
                sections
                    .entry(self.section(module))
                    .or_default()
                    .from
                    .entry(module.to_string())
                    .or_default()
                    .extend(
                        names
                            .split(',')
                            .map(str::trim)
                            .filter(|n| !n.is_empty())
                            .map(str::to_string),
                    );
            } else if let Some(rest) = line.strip_prefix("import ") {
                for module in rest.split(',').map(str::trim).filter(|m| !m.is_empty()) {
                    let root = module.split_whitespace().next().unwrap_or(module);
                    sections
                        .entry(self.section(root))
                        .or_default()
                        .plain
                        .insert(module.to_string());
                }
            }
        }

        let mut out = String::with_capacity(code.len());
        for line in &lines[..first] {
            out.push_str(line);
            out.push('\n');
        }

        let mut rendered_sections = Vec::new();
        for imports in sections.values() {
            let mut block = String::new();
            for module in sort_modules(imports.plain.iter()) {
                block.push_str(&format!("import {module}\n"));
            }
            for module in sort_modules(imports.from.keys()) {
                let mut names: Vec<&String> = imports.from[module].iter().collect();
                names.sort_by(|a, b| name_order(a, b));
                let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
                block.push_str(&format!("from {module} import {}\n", names.join(", ")));
            }
            rendered_sections.push(block);
        }
        out.push_str(&rendered_sections.join("\n"));

        let rest: Vec<&str> = lines[end..].to_vec();
        if let Some(next) = rest.first() {
            let blank_lines = if is_definition(next) { 2 } else { 1 };
            out.push_str(&"\n".repeat(blank_lines));
            for line in rest {
                out.push_str(line);
                out.push('\n');
            }
        }

        Ok(out)
    }
}

fn is_import(line: &str) -> bool {
    line.starts_with("import ") || line.starts_with("from ")
}

fn is_definition(line: &str) -> bool {
    line.starts_with("class ")
        || line.starts_with("def ")
        || line.starts_with("async def ")
        || line.starts_with('@')
}

/// Modules sorted case-insensitively, the way isort orders them by default.
fn sort_modules<'a>(modules: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
    let mut modules: Vec<_> = modules.collect();
    modules.sort_by_key(|m| (m.to_lowercase(), (*m).clone()));
    modules
}

/// Constants, then classes, then everything else; alphabetical within each.
fn name_order(a: &str, b: &str) -> std::cmp::Ordering {
    fn kind(name: &str) -> u8 {
        let name = name.split_whitespace().next().unwrap_or(name);
        if name.len() > 1 && name.chars().all(|c| !c.is_lowercase()) {
            0
        } else if name.starts_with(|c: char| c.is_uppercase()) {
            1
        } else {
            2
        }
    }
    (kind(a), a.to_lowercase()).cmp(&(kind(b), b.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_and_sorts_sections() {
        let code = "\"\"\"Doc.\"\"\"\n\n\
                    from models.base import Base\n\
                    from typing import Union, Literal\n\
                    import os\n\
                    from pydantic import Field\n\
                    from __future__ import annotations\n\
                    from typing import Literal\n\
                    \n\
                    \n\
                    class Foo(Base):\n    pass\n";
        let formatted = ImportSortFormatter::new()
            .with_first_party("models")
            .format(code)
            .unwrap();

        assert_eq!(
            formatted,
            "\"\"\"Doc.\"\"\"\n\n\
             from __future__ import annotations\n\
             \n\
             import os\n\
             from typing import Literal, Union\n\
             \n\
             from pydantic import Field\n\
             \n\
             from models.base import Base\n\
             \n\
             \n\
             class Foo(Base):\n    pass\n"
        );
    }

    #[test]
    fn test_unknown_modules_are_third_party() {
        let code = "from models.base import Base\nfrom pydantic import Field\nX = 1\n";
        let formatted = ImportSortFormatter::new().format(code).unwrap();
        assert_eq!(
            formatted,
            "from models.base import Base\nfrom pydantic import Field\n\nX = 1\n"
        );
    }

    #[test]
    fn test_name_order_constants_classes_functions() {
        let code = "from m import helper, Model, CONSTANT, Another\n";
        let formatted = ImportSortFormatter::new().format(code).unwrap();
        assert_eq!(formatted, "from m import CONSTANT, Another, Model, helper\n");
    }

    #[test]
    fn test_parenthesized_imports_are_left_alone() {
        let code = "from typing import (\n    Literal,\n)\nimport os\n";
        assert_eq!(ImportSortFormatter::new().format(code).unwrap(), code);
    }

    #[test]
    fn test_code_without_imports_is_unchanged() {
        let code = "class A:\n    pass\n";
        assert_eq!(ImportSortFormatter::new().format(code).unwrap(), code);
    }

    #[test]
    fn test_idempotent() {
        let formatter = ImportSortFormatter::new().with_first_party("models");
        let once = formatter
            .format("from typing import Union\nfrom models import A\n\n\nclass B(A):\n    x: Union[int, str]\n")
            .unwrap();
        assert_eq!(formatter.format(&once).unwrap(), once);
    }

    #[test]
    fn test_import_lines_inside_strings_are_ignored() {
        let code = "\"\"\"Module doc.\nfrom the registry import nothing\n\"\"\"\n\
                    import sys\nfrom typing import Literal\nimport os\n\nX = 1\n";
        assert_eq!(
            ImportSortFormatter::new().format(code).unwrap(),
            "\"\"\"Module doc.\nfrom the registry import nothing\n\"\"\"\n\
             import os\nimport sys\nfrom typing import Literal\n\nX = 1\n"
        );

        let only_text = "X = '''\nimport this\n'''\n";
        assert_eq!(ImportSortFormatter::new().format(only_text).unwrap(), only_text);
    }
}
