//! Debian-like backend (`agirosdebian`)

use agiros_bloom_core::{Backend, PackageDescriptor, VersionConstraint};
use agiros_bloom_rosdep::DependencyResolver;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::common::{collapse_whitespace, format_depends, CommonGenerator};
use crate::error::Result;
use crate::generator::{Generator, GeneratorSettings, ReleaseHistory};
use crate::substitution::SubstitutionRecord;

/// Generates Debian substitutions tailored for AGIROS distributions
pub struct DebianGenerator<'a> {
    common: CommonGenerator<'a>,
    native: bool,
}

impl<'a> DebianGenerator<'a> {
    pub fn new(settings: GeneratorSettings, dependencies: DependencyResolver<'a>) -> Self {
        Self { common: CommonGenerator::new(settings, dependencies), native: false }
    }

    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.common = self.common.with_stamp(stamp);
        self
    }

    /// Generate a native package instead of a quilt one
    pub fn with_native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }
}

/// `name (op version)` with Debian relation operators
pub fn debian_constraint(name: &str, constraint: &VersionConstraint) -> String {
    let op = match constraint {
        VersionConstraint::LessThan(_) => "<<",
        VersionConstraint::LessOrEqual(_) => "<=",
        VersionConstraint::Exact(_) => "=",
        VersionConstraint::GreaterOrEqual(_) => ">=",
        VersionConstraint::GreaterThan(_) => ">>",
    };
    format!("{name} ({op} {})", constraint.version())
}

/// Debian control description: a synopsis line followed by the extended
/// description, one space indented, paragraphs separated by ` .`
pub fn format_description(description: &str) -> String {
    let paragraphs: Vec<String> = description
        .split("\n\n")
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect();

    let Some((first, rest)) = paragraphs.split_first() else {
        return String::new();
    };

    let (synopsis, remainder) = match first.split_once(". ") {
        Some((head, tail)) => (format!("{head}."), Some(tail.to_string())),
        None => (first.clone(), None),
    };

    let body: Vec<String> = remainder.into_iter().chain(rest.iter().cloned()).collect();
    if body.is_empty() {
        return synopsis;
    }

    let extended: Vec<String> = body.iter().map(|p| format!(" {p}")).collect();
    format!("{synopsis}\n{}", extended.join("\n .\n"))
}

impl Generator for DebianGenerator<'_> {
    fn title(&self) -> &'static str {
        "agirosdebian"
    }

    fn backend(&self) -> Backend {
        Backend::Debian
    }

    fn settings(&self) -> &GeneratorSettings {
        self.common.settings()
    }

    fn generate(
        &self,
        package: &PackageDescriptor,
        os_version: &str,
        history: &ReleaseHistory,
        increment: u32,
    ) -> Result<SubstitutionRecord> {
        info!("Generating {} substitutions for {} on {os_version}", self.title(), package.name);

        let filtered = self.common.filter_dependencies(package)?;
        let answers = self.common.resolve(package, &filtered, os_version, Backend::Debian)?;

        let mut record = self.common.base_substitutions(package, os_version, history)?;
        record.set_scalar("Description", format_description(&package.description));
        record.set_scalar("Date", self.common.stamp().to_rfc2822());
        record.set_scalar("DebianInc", increment.to_string());
        record.set_scalar("format", if self.native { "native" } else { "quilt" });

        record.set_list("Depends", format_depends(&filtered.run, &answers, debian_constraint));
        record.set_list("BuildDepends", format_depends(&filtered.build, &answers, debian_constraint));
        record.set_list("Replaces", format_depends(&filtered.replaces, &answers, debian_constraint));
        record.set_list("Conflicts", format_depends(&filtered.conflicts, &answers, debian_constraint));

        self.common.augment(package, &mut record);
        Ok(record)
    }
}
