//! Descriptor sources

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::distribution::{DistributionDescriptor, DistributionFile};
use crate::error::{Result, RosdistroError};
use crate::index::{DistributionType, IndexFile, MIN_INDEX_VERSION};

/// Read-only source of distribution descriptors
pub trait DescriptorSource: Send + Sync {
    /// Index format version
    fn index_version(&self) -> u32;

    /// Names of all distributions in the index
    fn list_distributions(&self) -> BTreeSet<String>;

    /// Descriptor of one distribution
    fn distribution(&self, distro: &str) -> Result<DistributionDescriptor>;
}

/// Reject indexes older than [`MIN_INDEX_VERSION`]
pub fn check_index_version(source: &dyn DescriptorSource) -> Result<()> {
    let found = source.index_version();
    if found < MIN_INDEX_VERSION {
        return Err(RosdistroError::UnsupportedIndexVersion { found, minimum: MIN_INDEX_VERSION });
    }
    Ok(())
}

/// A rosdistro index checked out on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalIndex {
    path: PathBuf,
    index: IndexFile,
}

impl LocalIndex {
    /// Open an `index.yaml`; fails on indexes older than the minimum version
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Loading rosdistro index from {}", path.display());

        let index: IndexFile = read_yaml(&path)?;
        if index.file_type != "index" {
            return Err(RosdistroError::invalid_format(
                &path,
                format!("expected type 'index', found '{}'", index.file_type),
            ));
        }

        let local = Self { path, index };
        check_index_version(&local)?;
        Ok(local)
    }

    /// Path of the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        let base = self.path.parent().unwrap_or_else(|| Path::new("."));
        base.join(relative)
    }
}

impl DescriptorSource for LocalIndex {
    fn index_version(&self) -> u32 {
        self.index.version
    }

    fn list_distributions(&self) -> BTreeSet<String> {
        self.index.distributions.keys().cloned().collect()
    }

    fn distribution(&self, distro: &str) -> Result<DistributionDescriptor> {
        let entry = self
            .index
            .distributions
            .get(distro)
            .ok_or_else(|| RosdistroError::unknown_distribution(distro))?;

        let mut merged = DistributionFile::default();
        for relative in &entry.distribution {
            let path = self.resolve(relative);
            debug!("Reading distribution file {}", path.display());
            let file: DistributionFile = read_yaml(&path)?;
            merged.merge(file);
        }

        let python_version = entry.python_version.unwrap_or(3);
        if !matches!(python_version, 2 | 3) {
            return Err(RosdistroError::invalid_format(
                &self.path,
                format!("python_version of '{distro}' must be 2 or 3, found {python_version}"),
            ));
        }

        Ok(DistributionDescriptor {
            name: distro.to_string(),
            distribution_type: entry.distribution_type.unwrap_or(DistributionType::Other),
            python_version,
            packages: merged.released_packages(),
            release_platforms: merged.release_platforms,
        })
    }
}

/// In-memory descriptor source
#[derive(Debug, Clone)]
pub struct StaticSource {
    version: u32,
    distributions: BTreeMap<String, DistributionDescriptor>,
}

impl StaticSource {
    pub fn new(version: u32) -> Self {
        Self { version, distributions: BTreeMap::new() }
    }

    pub fn with_distribution(mut self, descriptor: DistributionDescriptor) -> Self {
        self.distributions.insert(descriptor.name.clone(), descriptor);
        self
    }
}

impl DescriptorSource for StaticSource {
    fn index_version(&self) -> u32 {
        self.version
    }

    fn list_distributions(&self) -> BTreeSet<String> {
        self.distributions.keys().cloned().collect()
    }

    fn distribution(&self, distro: &str) -> Result<DistributionDescriptor> {
        self.distributions
            .get(distro)
            .cloned()
            .ok_or_else(|| RosdistroError::unknown_distribution(distro))
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| RosdistroError::Read { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&content)
        .map_err(|source| RosdistroError::Yaml { path: path.to_path_buf(), source })
}
