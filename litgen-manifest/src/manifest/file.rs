use std::path::{Path, PathBuf};

use litgen_codegen::GenerationContext;

use super::Manifest;
use crate::{Error, Result};

/// A litgen.toml on disk together with its parsed manifest.
///
/// Relative paths inside the manifest are resolved against the directory
/// holding the file.
#[derive(Debug)]
pub struct LitgenToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl LitgenToml {
    /// Open and parse a litgen.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let manifest = Manifest::from_str_with_filename(&content, &path.display().to_string())?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory the manifest's relative paths start from.
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `[output] dir`, resolved against the manifest directory.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir().join(&self.manifest.output.dir)
    }

    pub fn build_context(&self) -> Result<GenerationContext> {
        self.manifest.build_context(self.base_dir())
    }
}
