//! Registry driving several generators with shared validators and formatters.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    Error, Result,
    pipeline::{CodeFormatter, CodeValidator, ModelGenerator},
};

/// Handle to a generator registered in a [`GenerationContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(usize);

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct ManagedGenerator {
    id: GeneratorId,
    generator: ModelGenerator,
    target_path: Option<PathBuf>,
}

/// An ordered set of generators plus the validators and formatters applied
/// to every one of them.
///
/// The context is an ordinary owned value. Callers that share one across
/// threads must serialize access themselves.
#[derive(Default)]
pub struct GenerationContext {
    generators: Vec<ManagedGenerator>,
    validators: Vec<Box<dyn CodeValidator>>,
    formatters: Vec<Box<dyn CodeFormatter>>,
    next_id: usize,
}

impl GenerationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(mut self, validator: impl CodeValidator + 'static) -> Self {
        self.add_validator(validator);
        self
    }

    pub fn with_formatter(mut self, formatter: impl CodeFormatter + 'static) -> Self {
        self.add_formatter(formatter);
        self
    }

    pub fn add_validator(&mut self, validator: impl CodeValidator + 'static) {
        self.validators.push(Box::new(validator));
    }

    pub fn add_formatter(&mut self, formatter: impl CodeFormatter + 'static) {
        self.formatters.push(Box::new(formatter));
    }

    pub fn validators(&self) -> &[Box<dyn CodeValidator>] {
        &self.validators
    }

    pub fn formatters(&self) -> &[Box<dyn CodeFormatter>] {
        &self.formatters
    }

    /// Register a generator. Without a target path, [`write_all`](Self::write_all)
    /// uses the generator's default file name.
    pub fn add_generator(
        &mut self,
        generator: ModelGenerator,
        target_path: Option<PathBuf>,
    ) -> GeneratorId {
        let id = GeneratorId(self.next_id);
        self.next_id += 1;
        self.generators.push(ManagedGenerator {
            id,
            generator,
            target_path,
        });
        id
    }

    /// Unregister a generator, handing it back.
    pub fn remove_generator(&mut self, id: GeneratorId) -> Option<ModelGenerator> {
        let index = self.generators.iter().position(|g| g.id == id)?;
        Some(self.generators.remove(index).generator)
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&ModelGenerator> {
        self.generators
            .iter()
            .find(|g| g.id == id)
            .map(|g| &g.generator)
    }

    pub fn generator_mut(&mut self, id: GeneratorId) -> Option<&mut ModelGenerator> {
        self.generators
            .iter_mut()
            .find(|g| g.id == id)
            .map(|g| &mut g.generator)
    }

    /// Registered generators in insertion order.
    pub fn generators(&self) -> impl Iterator<Item = &ModelGenerator> {
        self.generators.iter().map(|g| &g.generator)
    }

    /// Registered ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = GeneratorId> + '_ {
        self.generators.iter().map(|g| g.id)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Generate every registered file, in insertion order.
    ///
    /// The first failure aborts the batch and no output is returned.
    pub fn generate_all(&mut self) -> Result<Vec<String>> {
        self.generators
            .iter_mut()
            .map(|managed| {
                managed
                    .generator
                    .generate(&self.validators, &self.formatters)
            })
            .collect()
    }

    /// Write every registered file into `output_dir`, in insertion order.
    ///
    /// Files written before a failure are kept. Returns the written paths.
    pub fn write_all(&mut self, output_dir: &Path, create_dir: bool) -> Result<Vec<PathBuf>> {
        if create_dir {
            fs::create_dir_all(output_dir).map_err(|source| Error::Io {
                path: output_dir.to_path_buf(),
                source,
            })?;
        } else if !output_dir.is_dir() {
            return Err(Error::Io {
                path: output_dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
            });
        }

        let mut written = Vec::with_capacity(self.generators.len());
        for managed in &mut self.generators {
            let file_name = match &managed.target_path {
                Some(path) => path.clone(),
                None => PathBuf::from(managed.generator.default_file_name()),
            };
            let path = output_dir.join(file_name);
            managed
                .generator
                .write(&path, &self.validators, &self.formatters)?;
            written.push(path);
        }

        info!(count = written.len(), dir = %output_dir.display(), "wrote all generated files");
        Ok(written)
    }

    /// Remove every generator, validator and formatter.
    pub fn reset(&mut self) {
        self.generators.clear();
        self.validators.clear();
        self.formatters.clear();
    }
}

impl fmt::Debug for GenerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators: Vec<_> = self.validators.iter().map(|v| v.name()).collect();
        let formatters: Vec<_> = self.formatters.iter().map(|v| v.name()).collect();
        f.debug_struct("GenerationContext")
            .field("generators", &self.generators)
            .field("validators", &validators)
            .field("formatters", &formatters)
            .finish()
    }
}
