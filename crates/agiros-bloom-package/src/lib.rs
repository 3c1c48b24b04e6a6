//! ROS package handling for agiros-bloom
//!
//! This crate provides functionality for discovering and parsing ROS
//! packages and for evaluating the conditions attached to their
//! dependencies.

pub mod condition;
pub mod package_xml;
pub mod parser;
pub mod scanner;

pub use condition::{evaluate, ConditionContext};
pub use package_xml::{PackageDependencies, PackageManifest, Person, Url};
pub use parser::{manifest_to_descriptor, parse_package_manifest, parse_package_xml};
pub use scanner::scan_workspace;
