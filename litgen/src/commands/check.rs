use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use litgen_manifest::LitgenToml;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct CheckCommand {
    /// Path to litgen.toml (defaults to ./litgen.toml)
    #[arg(short, long, default_value = "litgen.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Parse the manifest and run every generator in memory.
    pub fn run(&self) -> Result<()> {
        let litgen_toml = LitgenToml::open(&self.config).unwrap_or_exit();
        let manifest = litgen_toml.manifest();
        let mut context = litgen_toml.build_context().unwrap_or_exit();

        context.generate_all().wrap_err("Check failed")?;

        println!("✓ {} is valid\n", self.config.display());

        let count = manifest.generators.len();
        println!("  {} generator{}:", count, if count == 1 { "" } else { "s" });
        for generator in &manifest.generators {
            println!(
                "    {} <- {} ({} rule{}) -> {}",
                generator.class_name,
                generator.source.display(),
                generator.rules.len(),
                if generator.rules.len() == 1 { "" } else { "s" },
                generator.output_file().display()
            );
        }

        if !context.validators().is_empty() || !context.formatters().is_empty() {
            let validators: Vec<_> = context.validators().iter().map(|v| v.name()).collect();
            let formatters: Vec<_> = context.formatters().iter().map(|f| f.name()).collect();
            println!();
            println!("  validators: {}", validators.join(", "));
            println!("  formatters: {}", formatters.join(", "));
        }
        Ok(())
    }
}
