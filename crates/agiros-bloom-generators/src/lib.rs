//! Debian and RPM substitution generators for AGIROS releases
//!
//! A generator takes a parsed package, resolves its dependency keys through
//! the rosdep [`DependencyResolver`](agiros_bloom_rosdep::DependencyResolver)
//! and produces the [`SubstitutionRecord`] used to render packaging
//! templates, plus the branches and tag of the release.
//!
//! # Modules
//!
//! - [`generator`]: the [`Generator`] contract and its inputs
//! - [`common`]: steps shared by both backends
//! - [`debian`]: `agirosdebian`
//! - [`rpm`]: `agirosrpm`
//! - [`substitution`]: the generated record

pub mod common;
pub mod debian;
pub mod error;
pub mod generator;
pub mod rpm;
pub mod substitution;

pub use common::{CommonGenerator, INTERFACE_GROUP, WORKSPACE_EXCLUSIONS};
pub use debian::DebianGenerator;
pub use error::{GeneratorError, Result};
pub use generator::{ChangelogEntry, Generator, GeneratorSettings, ReleaseHistory};
pub use rpm::RpmGenerator;
pub use substitution::{SubstitutionRecord, SubstitutionValue};
