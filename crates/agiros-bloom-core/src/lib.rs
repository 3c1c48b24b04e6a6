//! Core types and naming rules for agiros-bloom
//!
//! This crate provides the fundamental data structures, error types and the
//! AGIROS naming/branching conventions shared by the resolver and the
//! packaging generators.

pub mod code;
pub mod dependency;
pub mod error;
pub mod naming;
pub mod package;
pub mod platform;

pub use code::ExitClass;
pub use dependency::{Dependency, VersionConstraint};
pub use error::{Error, Result};
pub use naming::{
    branch_names, branching_arguments, install_prefix, package_name, release_tag, Backend,
    BranchArgument,
};
pub use package::{Dependencies, Maintainer, PackageDescriptor, Url};
pub use platform::PlatformCoordinate;
