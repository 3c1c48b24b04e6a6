//! Resolve command implementation

use std::collections::BTreeSet;
use std::path::PathBuf;

use agiros_bloom_core::{package_name, PlatformCoordinate};
use agiros_bloom_rosdep::{DefaultFallback, DependencyResolver, FallbackResolver};
use color_eyre::eyre::Result;
use tracing::info;

use super::context::ReleaseContext;
use super::prompt::retry_prompt;

/// Resolve command implementation
pub struct ResolveCommand {
    config_path: PathBuf,
    keys: Vec<String>,
    rosdistro: Option<String>,
    os_name: Option<String>,
    os_version: Option<String>,
    peers: BTreeSet<String>,
    interactive: bool,
}

impl ResolveCommand {
    pub fn new(config_path: PathBuf, keys: Vec<String>) -> Self {
        Self {
            config_path,
            keys,
            rosdistro: None,
            os_name: None,
            os_version: None,
            peers: BTreeSet::new(),
            interactive: true,
        }
    }

    pub fn with_platform(
        mut self,
        rosdistro: Option<String>,
        os_name: Option<String>,
        os_version: Option<String>,
    ) -> Self {
        self.rosdistro = rosdistro;
        self.os_name = os_name;
        self.os_version = os_version;
        self
    }

    pub fn with_peers(mut self, peers: Vec<String>) -> Self {
        self.peers = peers.into_iter().collect();
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn execute(&self) -> Result<()> {
        let context = ReleaseContext::load(&self.config_path)?;
        let config = &context.config;

        let distro = self.rosdistro.clone().unwrap_or_else(|| config.rosdistro.clone());
        let coordinate = PlatformCoordinate::new(
            self.os_name.clone().unwrap_or_else(|| config.os_name.clone()),
            self.os_version.clone().unwrap_or_else(|| config.os_version.clone()),
            distro.clone(),
        );
        info!("Resolving {} keys for {coordinate}", self.keys.len());

        let prompt = retry_prompt(self.interactive);
        let dependencies =
            DependencyResolver::new(&context.resolver, &context.refresher, prompt.as_ref())
                .with_policy(context.policy());

        // Peers resolve to their AGIROS package name when the rosdep data lacks them
        let fallback = move |key: &str, peers: &BTreeSet<String>| -> agiros_bloom_rosdep::Result<Vec<String>> {
            if peers.contains(key) {
                Ok(vec![package_name(key, &distro)])
            } else {
                DefaultFallback.resolve_fallback(key, peers)
            }
        };

        let answers = dependencies.resolve_all(&self.keys, &coordinate, &self.peers, &fallback)?;
        for (key, answer) in &answers {
            println!("{key}: {} ({})", answer.package_names.join(" "), answer.installer_key);
        }
        Ok(())
    }
}
