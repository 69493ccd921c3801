//! Provenance strings for generated file headers.

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Where the records of a generation run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// A file on disk.
    Path(PathBuf),
    /// A free-form identifier (URL, dataset name, ...).
    Label(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Path(path) => write!(f, "{}", path.display()),
            Provenance::Label(label) => f.write_str(label),
        }
    }
}

impl From<&str> for Provenance {
    fn from(label: &str) -> Self {
        Provenance::Label(label.to_string())
    }
}

impl From<String> for Provenance {
    fn from(label: String) -> Self {
        Provenance::Label(label)
    }
}

impl From<PathBuf> for Provenance {
    fn from(path: PathBuf) -> Self {
        Provenance::Path(path)
    }
}

impl From<&Path> for Provenance {
    fn from(path: &Path) -> Self {
        Provenance::Path(path.to_path_buf())
    }
}

/// Render a source identifier for use in a generated provenance comment.
pub fn normalize_model_source_provenance(source: &Provenance) -> String {
    source.to_string()
}
