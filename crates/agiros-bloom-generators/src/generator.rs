//! The generator contract and the inputs shared by every backend

use std::collections::{BTreeMap, BTreeSet};

use agiros_bloom_core::{
    branching_arguments, install_prefix, release_tag, Backend, BranchArgument, PackageDescriptor,
    PlatformCoordinate,
};
use agiros_bloom_rosdistro::DistributionDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::substitution::SubstitutionRecord;

/// One changelog entry of a released version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub stamp: DateTime<Utc>,
    pub author: String,
    pub messages: Vec<String>,
}

/// Changelog entries by package version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseHistory {
    entries: BTreeMap<String, ChangelogEntry>,
}

impl ReleaseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, version: impl Into<String>, entry: ChangelogEntry) -> Self {
        self.entries.insert(version.into(), entry);
        self
    }

    /// Entries, newest first
    pub fn newest_first(&self) -> Vec<(&str, &ChangelogEntry)> {
        let mut entries: Vec<_> =
            self.entries.iter().map(|(version, entry)| (version.as_str(), entry)).collect();
        entries.sort_by(|a, b| b.1.stamp.cmp(&a.1.stamp).then_with(|| b.0.cmp(a.0)));
        entries
    }
}

/// What a generator releases for and how
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// OS the packages are generated for
    pub os_name: String,

    /// Distribution being released into
    pub distribution: DistributionDescriptor,

    /// OS versions that get their own branch
    pub target_os_versions: Vec<String>,

    /// Installation prefix; defaults to `/opt/agiros/<distro>`
    pub install_prefix: Option<String>,

    /// Keys dropped before resolution
    pub skip_keys: BTreeSet<String>,

    /// Packages released together
    pub peers: BTreeSet<String>,
}

impl GeneratorSettings {
    pub fn new(os_name: impl Into<String>, distribution: DistributionDescriptor) -> Self {
        Self {
            os_name: os_name.into(),
            distribution,
            target_os_versions: Vec::new(),
            install_prefix: None,
            skip_keys: BTreeSet::new(),
            peers: BTreeSet::new(),
        }
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.target_os_versions = targets;
        self
    }

    pub fn with_install_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.install_prefix = Some(prefix.into());
        self
    }

    pub fn with_skip_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.skip_keys.extend(keys);
        self
    }

    pub fn with_peers(mut self, peers: impl IntoIterator<Item = String>) -> Self {
        self.peers.extend(peers);
        self
    }

    pub fn distro(&self) -> &str {
        &self.distribution.name
    }

    pub fn coordinate(&self, os_version: &str) -> PlatformCoordinate {
        PlatformCoordinate::new(&self.os_name, os_version, self.distro())
    }

    pub fn install_prefix(&self) -> String {
        self.install_prefix.clone().unwrap_or_else(|| install_prefix(self.distro()))
    }
}

/// A packaging backend that turns a package into a substitution record
pub trait Generator {
    /// Generator name, e.g. `agirosdebian`
    fn title(&self) -> &'static str;

    fn backend(&self) -> Backend;

    fn settings(&self) -> &GeneratorSettings;

    /// Build the substitution record of a package for one OS version
    ///
    /// Fails as a whole if any dependency key stays unresolved.
    fn generate(
        &self,
        package: &PackageDescriptor,
        os_version: &str,
        history: &ReleaseHistory,
        increment: u32,
    ) -> Result<SubstitutionRecord>;

    /// Branches to create for a package, starting from `source_branch`
    fn branching_arguments(
        &self,
        package: &PackageDescriptor,
        source_branch: &str,
    ) -> Vec<BranchArgument> {
        let settings = self.settings();
        branching_arguments(
            self.backend(),
            &package.name,
            settings.distro(),
            &settings.target_os_versions,
            source_branch,
        )
    }

    /// Release tag of a package version
    fn release_tag(&self, package: &PackageDescriptor, increment: u32) -> String {
        release_tag(&package.name, self.settings().distro(), &package.version, increment)
    }
}
