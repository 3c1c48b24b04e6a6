//! ROS package representation

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;

/// A package as read from its manifest. Read-only to the resolver and the
/// generators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    pub description: String,

    /// Package maintainers
    pub maintainers: Vec<Maintainer>,

    /// Package license(s)
    pub licenses: Vec<String>,

    /// Package URL(s)
    pub urls: Vec<Url>,

    /// Package dependencies
    pub dependencies: Dependencies,

    /// Groups this package is a member of
    pub member_of_groups: BTreeSet<String>,
}

/// Package maintainer information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Maintainer {
    /// Maintainer name
    pub name: String,

    /// Maintainer email
    pub email: String,
}

/// URL with type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Url {
    /// URL type (website, repository, bugtracker, etc.)
    #[serde(rename = "type")]
    pub url_type: Option<String>,

    /// The URL itself
    pub url: String,
}

/// Package dependencies categorized by type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependencies {
    /// Build dependencies
    pub build: Vec<Dependency>,

    /// Build export dependencies
    pub build_export: Vec<Dependency>,

    /// Build tool dependencies
    pub buildtool: Vec<Dependency>,

    /// Build tool export dependencies
    pub buildtool_export: Vec<Dependency>,

    /// Execution dependencies
    pub exec: Vec<Dependency>,

    /// Test dependencies
    pub test: Vec<Dependency>,

    /// Documentation dependencies
    pub doc: Vec<Dependency>,

    /// Packages this one replaces
    pub replaces: Vec<Dependency>,

    /// Packages this one conflicts with
    pub conflicts: Vec<Dependency>,
}

impl PackageDescriptor {
    /// Create an empty descriptor with a name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into(), ..Default::default() }
    }

    /// Check group membership
    pub fn is_member_of(&self, group: &str) -> bool {
        self.member_of_groups.contains(group)
    }

    /// First website URL, if any
    pub fn homepage(&self) -> Option<&str> {
        self.urls
            .iter()
            .find(|u| u.url_type.as_deref().unwrap_or("website") == "website")
            .map(|u| u.url.as_str())
    }
}

impl Dependencies {
    /// Run dependencies (exec + build_export)
    pub fn run(&self) -> impl Iterator<Item = &Dependency> {
        self.exec.iter().chain(self.build_export.iter())
    }
}

impl fmt::Display for Maintainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.email.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}
