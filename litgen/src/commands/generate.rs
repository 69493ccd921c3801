use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use litgen_manifest::LitgenToml;
use tracing::debug;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to litgen.toml (defaults to ./litgen.toml)
    #[arg(short, long, default_value = "litgen.toml")]
    pub config: PathBuf,

    /// Output directory (overrides [output] dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print generated code instead of writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let litgen_toml = LitgenToml::open(&self.config).unwrap_or_exit();
        let manifest = litgen_toml.manifest();
        let mut context = litgen_toml.build_context().unwrap_or_exit();

        if context.is_empty() {
            println!("No generators defined in {}", self.config.display());
            return Ok(());
        }
        debug!(generators = context.len(), "context built");

        if self.dry_run {
            let files = context.generate_all().wrap_err("Generation failed")?;
            for (generator, code) in manifest.generators.iter().zip(&files) {
                println!("── {} ──", generator.output_file().display());
                println!("{code}");
            }
            return Ok(());
        }

        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| litgen_toml.output_dir());
        let written = context
            .write_all(&output_dir, manifest.output.create_dir)
            .wrap_err("Generation failed")?;

        println!(
            "Generated {} file{} in {}",
            written.len(),
            if written.len() == 1 { "" } else { "s" },
            output_dir.display()
        );
        for path in &written {
            println!("  + {}", path.display());
        }
        Ok(())
    }
}
