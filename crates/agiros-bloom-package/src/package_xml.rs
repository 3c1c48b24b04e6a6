//! Package.xml parsing types and structures

use agiros_bloom_core::Dependency;
use serde::{Deserialize, Serialize};

/// ROS package manifest from package.xml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    /// Manifest format (1, 2 or 3)
    pub format: u32,

    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    pub description: String,

    /// Package maintainers
    pub maintainers: Vec<Person>,

    /// Package authors
    pub authors: Vec<Person>,

    /// Package license(s)
    pub licenses: Vec<String>,

    /// Package URL(s)
    pub urls: Vec<Url>,

    /// Build type (ament_cmake, ament_python, etc.)
    pub build_type: Option<String>,

    /// Package dependencies
    pub dependencies: PackageDependencies,

    /// Groups this package belongs to
    pub member_of_groups: Vec<String>,
}

/// Person information (maintainer or author)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Person's name
    pub name: String,

    /// Person's email (optional)
    pub email: Option<String>,
}

/// URL with type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Url {
    /// URL type (website, repository, bugtracker, etc.)
    #[serde(rename = "type")]
    pub url_type: Option<String>,

    /// The URL itself
    pub url: String,
}

/// All dependency types in package.xml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageDependencies {
    pub build_depend: Vec<Dependency>,
    pub build_export_depend: Vec<Dependency>,
    pub buildtool_depend: Vec<Dependency>,
    pub buildtool_export_depend: Vec<Dependency>,
    pub exec_depend: Vec<Dependency>,
    pub test_depend: Vec<Dependency>,
    pub doc_depend: Vec<Dependency>,

    /// Generic dependencies (maps to build, build_export, and exec)
    pub depend: Vec<Dependency>,

    /// Format 1 run dependencies (maps to build_export and exec)
    pub run_depend: Vec<Dependency>,

    pub replace: Vec<Dependency>,
    pub conflict: Vec<Dependency>,
}

impl PackageDependencies {
    /// Move generic `depend` and format 1 `run_depend` entries into the
    /// specific categories they stand for
    pub fn expand_generic_depends(&mut self) {
        for dep in self.depend.drain(..) {
            self.build_depend.push(dep.clone());
            self.build_export_depend.push(dep.clone());
            self.exec_depend.push(dep);
        }
        for dep in self.run_depend.drain(..) {
            self.build_export_depend.push(dep.clone());
            self.exec_depend.push(dep);
        }
    }
}
