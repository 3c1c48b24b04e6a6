//! Validate command implementation

use std::path::PathBuf;

use agiros_bloom_config::Config;
use agiros_bloom_core::PlatformCoordinate;
use agiros_bloom_rosdep::{InstallerContext, SourcesViewProvider, ViewProvider};
use agiros_bloom_rosdistro::{DescriptorSource, LocalIndex};
use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};

/// Validate command implementation
pub struct ValidateCommand {
    config_path: PathBuf,
}

impl ValidateCommand {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn execute(&self) -> Result<()> {
        info!("Validating configuration, rosdistro index and rosdep sources");

        let config = Config::from_file(&self.config_path).with_context(|| {
            format!("Failed to load config from {}", self.config_path.display())
        })?;
        println!("✓ Configuration loaded successfully");

        let index = LocalIndex::open(&config.index).context("Failed to open rosdistro index")?;
        println!(
            "✓ Rosdistro index version {}: {}",
            index.index_version(),
            index.path().display()
        );

        let distribution = index
            .distribution(&config.rosdistro)
            .with_context(|| {
                let known: Vec<String> = index.list_distributions().into_iter().collect();
                format!("Distribution '{}' is not usable (index lists: {})", config.rosdistro, known.join(", "))
            })?;
        println!(
            "✓ Distribution {} ({}, python {}): {} released packages",
            distribution.name,
            distribution.distribution_type,
            distribution.python_version,
            distribution.packages.len()
        );

        match distribution.release_platforms.get(&config.os_name) {
            Some(versions) if versions.contains(&config.os_version) => {
                println!("✓ Platform {}:{} is a release platform", config.os_name, config.os_version);
            }
            _ => warn!(
                "{}:{} is not listed in the release platforms of {}",
                config.os_name, config.os_version, distribution.name
            ),
        }

        let installers = InstallerContext::default();
        let default_installer = installers.default_installer_key(&config.os_name)?;
        println!("✓ Default installer for {}: {default_installer}", config.os_name);

        let coordinate =
            PlatformCoordinate::new(&config.os_name, &config.os_version, &config.rosdistro);
        let view = SourcesViewProvider::new(config.rosdep_sources.clone())
            .fetch_view(&coordinate)
            .context("Failed to load rosdep sources")?;
        println!(
            "✓ {} rosdep keys from {} sources",
            view.len(),
            config.rosdep_sources.len()
        );

        println!("\n✓ All validation checks passed!");
        Ok(())
    }
}
