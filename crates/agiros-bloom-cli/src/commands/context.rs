//! Resolution stack shared by the commands

use std::path::Path;
use std::sync::Arc;

use agiros_bloom_config::Config;
use agiros_bloom_rosdep::{CommandRefresher, KeyResolver, RetryPolicy, SourcesViewProvider};
use agiros_bloom_rosdistro::LocalIndex;
use color_eyre::eyre::{Context, Result};
use tracing::debug;

/// Configuration, rosdistro index and key resolver built from one config file
pub struct ReleaseContext {
    pub config: Config,
    pub index: Arc<LocalIndex>,
    pub resolver: KeyResolver,
    pub refresher: CommandRefresher,
}

impl ReleaseContext {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let index = Arc::new(
            LocalIndex::open(&config.index).context("Failed to open rosdistro index")?,
        );
        debug!("Loaded rosdistro index {}", index.path().display());

        let provider = SourcesViewProvider::new(config.rosdep_sources.clone())
            .with_descriptor_source(index.clone());
        let refresher = CommandRefresher::from_command_line(&config.update_command)?;

        Ok(Self { resolver: KeyResolver::new(provider), refresher, index, config })
    }

    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy { max_refreshes: self.config.max_refreshes }
    }
}
