//! rosdistro `distribution.yaml` and the descriptor built from it

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::index::DistributionType;

/// A distribution file as found on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionFile {
    /// OS name to supported OS versions
    #[serde(default)]
    pub release_platforms: BTreeMap<String, Vec<String>>,

    /// Source repositories by name
    #[serde(default)]
    pub repositories: BTreeMap<String, Repository>,
}

/// One repository entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    /// Release repository information
    #[serde(default)]
    pub release: Option<ReleaseRepository>,

    /// Source repository information
    #[serde(default)]
    pub source: Option<SourceRepository>,

    /// Maintenance status
    #[serde(default)]
    pub status: Option<String>,
}

/// Release repository of a repository entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseRepository {
    /// Packages released from the repository; defaults to the repository name
    #[serde(default)]
    pub packages: Vec<String>,

    /// Release repository URL
    #[serde(default)]
    pub url: Option<String>,

    /// Released version including the increment, e.g. `1.2.3-1`
    #[serde(default)]
    pub version: Option<String>,

    /// Tag templates
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Source repository of a repository entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRepository {
    #[serde(rename = "type", default)]
    pub vcs_type: Option<String>,
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// A package released in a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasedPackage {
    /// Package name
    pub name: String,

    /// Repository the package is released from
    pub repository: String,

    /// Released version including the increment
    pub version: Option<String>,
}

/// Everything the resolver and generators need to know about one
/// distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionDescriptor {
    /// Distribution name
    pub name: String,

    /// Platform generation family
    pub distribution_type: DistributionType,

    /// Python major version (2 or 3)
    pub python_version: u32,

    /// OS name to supported OS versions
    pub release_platforms: BTreeMap<String, Vec<String>>,

    /// Released packages by name
    pub packages: BTreeMap<String, ReleasedPackage>,
}

impl DistributionFile {
    /// Merge another file into this one; entries of `other` win
    pub fn merge(&mut self, other: DistributionFile) {
        for (os, versions) in other.release_platforms {
            self.release_platforms.insert(os, versions);
        }
        for (name, repository) in other.repositories {
            self.repositories.insert(name, repository);
        }
    }

    /// Released packages by name
    pub fn released_packages(&self) -> BTreeMap<String, ReleasedPackage> {
        let mut packages = BTreeMap::new();
        for (repo_name, repository) in &self.repositories {
            let Some(release) = &repository.release else {
                continue;
            };

            let names = if release.packages.is_empty() {
                vec![repo_name.clone()]
            } else {
                release.packages.clone()
            };

            for name in names {
                packages.insert(
                    name.clone(),
                    ReleasedPackage {
                        name,
                        repository: repo_name.clone(),
                        version: release.version.clone(),
                    },
                );
            }
        }
        packages
    }
}

impl DistributionDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>, distribution_type: DistributionType) -> Self {
        Self {
            name: name.into(),
            distribution_type,
            python_version: 3,
            release_platforms: BTreeMap::new(),
            packages: BTreeMap::new(),
        }
    }

    /// Add a released package
    pub fn with_package(mut self, name: &str, repository: &str, version: Option<&str>) -> Self {
        self.packages.insert(
            name.to_string(),
            ReleasedPackage {
                name: name.to_string(),
                repository: repository.to_string(),
                version: version.map(str::to_string),
            },
        );
        self
    }

    /// Whether this is a ROS 2 generation distribution
    pub fn is_ros2(&self) -> bool {
        self.distribution_type == DistributionType::Ros2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTRIBUTION: &str = r#"
release_platforms:
  ubuntu: [noble]
repositories:
  demos:
    release:
      packages: [demo_nodes_cpp, demo_nodes_py]
      url: https://example.com/demos-release.git
      version: 0.33.1-1
    source:
      type: git
      url: https://example.com/demos.git
      version: loong
    status: maintained
  rclcpp:
    release:
      version: 28.1.0-1
  docs_only:
    source:
      type: git
      url: https://example.com/docs.git
type: distribution
version: 2
"#;

    #[test]
    fn test_released_packages() {
        let file: DistributionFile = serde_yaml::from_str(DISTRIBUTION).unwrap();
        let packages = file.released_packages();

        assert_eq!(packages.len(), 3);
        assert_eq!(packages["demo_nodes_cpp"].repository, "demos");
        assert_eq!(packages["rclcpp"].repository, "rclcpp");
        assert_eq!(packages["rclcpp"].version.as_deref(), Some("28.1.0-1"));
        assert!(!packages.contains_key("docs_only"));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base: DistributionFile = serde_yaml::from_str(DISTRIBUTION).unwrap();
        let overlay: DistributionFile = serde_yaml::from_str(
            "repositories:\n  rclcpp:\n    release:\n      version: 28.2.0-1\n",
        )
        .unwrap();
        base.merge(overlay);

        assert_eq!(base.released_packages()["rclcpp"].version.as_deref(), Some("28.2.0-1"));
        assert!(base.repositories.contains_key("demos"));
    }
}
