//! RPM-like backend (`agirosrpm`)

use agiros_bloom_core::{package_name, Backend, PackageDescriptor, VersionConstraint};
use agiros_bloom_rosdep::DependencyResolver;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::common::{collapse_whitespace, format_depends, CommonGenerator};
use crate::error::Result;
use crate::generator::{Generator, GeneratorSettings, ReleaseHistory};
use crate::substitution::SubstitutionRecord;

const SUBPACKAGES: [&str; 3] = ["devel", "doc", "runtime"];

/// Generates RPM substitutions tailored for AGIROS distributions
pub struct RpmGenerator<'a> {
    common: CommonGenerator<'a>,
}

impl<'a> RpmGenerator<'a> {
    pub fn new(settings: GeneratorSettings, dependencies: DependencyResolver<'a>) -> Self {
        Self { common: CommonGenerator::new(settings, dependencies) }
    }

    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.common = self.common.with_stamp(stamp);
        self
    }
}

/// `name op version` with RPM comparison operators
pub fn rpm_constraint(name: &str, constraint: &VersionConstraint) -> String {
    let op = match constraint {
        VersionConstraint::LessThan(_) => "<",
        VersionConstraint::LessOrEqual(_) => "<=",
        VersionConstraint::Exact(_) => "=",
        VersionConstraint::GreaterOrEqual(_) => ">=",
        VersionConstraint::GreaterThan(_) => ">",
    };
    format!("{name} {op} {}", constraint.version())
}

impl Generator for RpmGenerator<'_> {
    fn title(&self) -> &'static str {
        "agirosrpm"
    }

    fn backend(&self) -> Backend {
        Backend::Rpm
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
        let answers = self.common.resolve(package, &filtered, os_version, Backend::Rpm)?;

        let mut record = self.common.base_substitutions(package, os_version, history)?;
        record.set_scalar("Description", collapse_whitespace(&package.description));
        record.set_scalar("Date", self.common.stamp().format("%a %b %d %Y").to_string());
        record.set_scalar("RPMInc", increment.to_string());

        record.set_list("Depends", format_depends(&filtered.run, &answers, rpm_constraint));
        record.set_list("BuildDepends", format_depends(&filtered.build, &answers, rpm_constraint));
        record.set_list("Replaces", format_depends(&filtered.replaces, &answers, rpm_constraint));
        record.set_list("Conflicts", format_depends(&filtered.conflicts, &answers, rpm_constraint));

        let distro = self.settings().distro();
        record.set_list(
            "Provides",
            SUBPACKAGES
                .iter()
                .map(|sub| format!("%{{name}}-{sub} = %{{version}}-%{{release}}"))
                .collect(),
        );
        record.set_list("Supplements", Vec::new());
        for group in &package.member_of_groups {
            let group_name = Backend::Rpm.sanitize(&package_name(group, distro));
            record.push_unique("Provides", format!("{group_name}(member)"));
            record.push_unique("Supplements", format!("{group_name}(all)"));
        }

        self.common.augment(package, &mut record);
        Ok(record)
    }
}
