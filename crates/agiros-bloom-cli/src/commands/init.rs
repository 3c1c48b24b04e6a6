//! Init command implementation

use std::path::PathBuf;

use agiros_bloom_config::Config;
use color_eyre::eyre::{Context, Result};
use tracing::info;

/// Init command implementation
pub struct InitCommand {
    output_path: PathBuf,
    force: bool,
    rosdistro: String,
}

impl InitCommand {
    pub fn new(output_path: PathBuf, force: bool, rosdistro: String) -> Self {
        Self { output_path, force, rosdistro }
    }

    pub fn execute(&self) -> Result<()> {
        info!("Initializing configuration file at {}", self.output_path.display());

        // Check if file already exists
        if self.output_path.exists() && !self.force {
            return Err(color_eyre::eyre::eyre!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                self.output_path.display()
            ));
        }

        let config = Config { rosdistro: self.rosdistro.clone(), ..Config::default() };

        let yaml_content =
            serde_yaml::to_string(&config).with_context(|| "Failed to serialize config to YAML")?;

        std::fs::write(&self.output_path, yaml_content)
            .with_context(|| format!("Failed to write config to {}", self.output_path.display()))?;

        println!("✓ Created configuration file: {}", self.output_path.display());
        println!("\nNext steps:");
        println!("1. Point 'index' at a local rosdistro checkout and list your rosdep sources");
        println!(
            "2. Run 'agiros-bloom validate -c {}' to validate the configuration",
            self.output_path.display()
        );
        println!(
            "3. Run 'agiros-bloom generate debian -c {}' inside a package",
            self.output_path.display()
        );

        Ok(())
    }
}
