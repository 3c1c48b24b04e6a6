//! Substitution pipeline shared by the Debian and RPM generators

use std::collections::{BTreeMap, BTreeSet};

use agiros_bloom_core::{package_name, Backend, Dependency, PackageDescriptor, VersionConstraint};
use agiros_bloom_package::ConditionContext;
use agiros_bloom_rosdep::{
    DefaultFallback, DependencyResolver, FallbackResolver, ResolvedAnswer, Result as RosdepResult,
};
use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info};

use crate::error::{GeneratorError, Result};
use crate::generator::{GeneratorSettings, ReleaseHistory};
use crate::substitution::SubstitutionRecord;

/// Packages that must not depend on the workspace package
pub const WORKSPACE_EXCLUSIONS: [&str; 3] = ["ament_cmake_core", "ament_package", "ros_workspace"];

/// Group whose members need the Fast-RTPS type support at build time
pub const INTERFACE_GROUP: &str = "rosidl_interface_packages";

const INTERFACE_DEPENDENCIES: [&str; 2] =
    ["rosidl-typesupport-fastrtps-c", "rosidl-typesupport-fastrtps-cpp"];

/// Package dependencies after conditions and skip keys were applied
#[derive(Debug, Clone, Default)]
pub struct FilteredDependencies {
    pub run: Vec<Dependency>,
    pub build: Vec<Dependency>,
    pub replaces: Vec<Dependency>,
    pub conflicts: Vec<Dependency>,
}

impl FilteredDependencies {
    fn keys(&self) -> BTreeSet<String> {
        self.run
            .iter()
            .chain(&self.build)
            .chain(&self.replaces)
            .chain(&self.conflicts)
            .map(|d| d.name.clone())
            .collect()
    }
}

/// State and steps shared by every backend
pub struct CommonGenerator<'a> {
    settings: GeneratorSettings,
    dependencies: DependencyResolver<'a>,
    stamp: DateTime<Utc>,
}

impl<'a> CommonGenerator<'a> {
    pub fn new(settings: GeneratorSettings, dependencies: DependencyResolver<'a>) -> Self {
        Self { settings, dependencies, stamp: Utc::now() }
    }

    /// Fix the time used for `Date` and `YYYY`
    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn stamp(&self) -> DateTime<Utc> {
        self.stamp
    }

    fn condition_context(&self) -> ConditionContext {
        let distribution = &self.settings.distribution;
        ConditionContext::for_distro(
            &distribution.name,
            distribution.distribution_type.ros_version(),
            distribution.python_version,
        )
    }

    /// Drop dependencies whose condition is false or whose key is skipped
    pub fn filter_dependencies(&self, package: &PackageDescriptor) -> Result<FilteredDependencies> {
        let context = self.condition_context();
        let deps = &package.dependencies;

        let keep = |group: Vec<&Dependency>| -> Result<Vec<Dependency>> {
            let mut kept = Vec::new();
            for dependency in group {
                if self.settings.skip_keys.contains(&dependency.name) {
                    debug!("Skipping key '{}' of {}", dependency.name, package.name);
                    continue;
                }
                let holds = context
                    .holds(dependency)
                    .map_err(|e| GeneratorError::condition(&package.name, e))?;
                if holds {
                    kept.push(dependency.clone());
                } else {
                    debug!("Condition of '{dependency}' is false, dropping it");
                }
            }
            Ok(kept)
        };

        Ok(FilteredDependencies {
            run: keep(deps.run().chain(&deps.buildtool_export).collect())?,
            build: keep(deps.build.iter().chain(&deps.buildtool).chain(&deps.test).collect())?,
            replaces: keep(deps.replaces.iter().collect())?,
            conflicts: keep(deps.conflicts.iter().collect())?,
        })
    }

    /// Peers of a package: the packages released with it plus the names it
    /// replaces or conflicts with
    pub fn peers(&self, filtered: &FilteredDependencies) -> BTreeSet<String> {
        let mut peers = self.settings.peers.clone();
        peers.extend(filtered.replaces.iter().chain(&filtered.conflicts).map(|d| d.name.clone()));
        peers
    }

    /// Resolve every remaining key of the package
    pub fn resolve(
        &self,
        package: &PackageDescriptor,
        filtered: &FilteredDependencies,
        os_version: &str,
        backend: Backend,
    ) -> Result<BTreeMap<String, ResolvedAnswer>> {
        let coordinate = self.settings.coordinate(os_version);
        let peers = self.peers(filtered);
        let distro = self.settings.distro().to_string();

        let fallback = move |key: &str, peers: &BTreeSet<String>| -> RosdepResult<Vec<String>> {
            if peers.contains(key) {
                let name = package_name(key, &distro);
                return Ok(vec![match backend {
                    Backend::Debian => name,
                    Backend::Rpm => backend.sanitize(&name),
                }]);
            }
            DefaultFallback.resolve_fallback(key, peers)
        };

        info!("Resolving dependencies of {} for {coordinate}", package.name);
        self.dependencies
            .resolve_all(filtered.keys(), &coordinate, &peers, &fallback)
            .map_err(|e| GeneratorError::resolution(&package.name, e))
    }

    /// Fields every backend shares; dependency lists are left to the caller
    pub fn base_substitutions(
        &self,
        package: &PackageDescriptor,
        os_version: &str,
        history: &ReleaseHistory,
    ) -> Result<SubstitutionRecord> {
        if package.name.is_empty() || package.version.is_empty() {
            return Err(GeneratorError::invalid_package(
                &package.name,
                "package name and version are required",
            ));
        }

        let mut record = SubstitutionRecord::new();
        record.set_scalar("Name", &package.name);
        record.set_scalar("Version", &package.version);
        record.set_scalar("Package", package_name(&package.name, self.settings.distro()));
        record.set_scalar("Rosdistro", self.settings.distro());
        record.set_scalar("Homepage", package.homepage().unwrap_or_default());
        record.set_scalar(
            "Maintainer",
            package.maintainers.first().map(ToString::to_string).unwrap_or_default(),
        );
        record.set_list("Maintainers", package.maintainers.iter().map(ToString::to_string).collect());
        record.set_list("Licenses", package.licenses.clone());
        record.set_scalar("Distribution", os_version);
        record.set_scalar("InstallationPrefix", self.settings.install_prefix());
        record.set_scalar("YYYY", self.stamp.year().to_string());
        record.set_list("Changelogs", changelogs(history));
        Ok(record)
    }

    /// Append the workspace and interface dependencies
    pub fn augment(&self, package: &PackageDescriptor, record: &mut SubstitutionRecord) {
        let distro = self.settings.distro();

        if !WORKSPACE_EXCLUSIONS.contains(&package.name.as_str()) {
            let workspace = package_name("ros-workspace", distro);
            record.push_unique("BuildDepends", workspace.as_str());
            record.push_unique("Depends", workspace);
        }

        if self.settings.distribution.is_ros2() && package.is_member_of(INTERFACE_GROUP) {
            record.extend_unique(
                "BuildDepends",
                INTERFACE_DEPENDENCIES.iter().map(|name| package_name(name, distro)),
            );
        }
    }
}

/// Resolved and formatted dependency list, sorted and de-duplicated
pub fn format_depends(
    dependencies: &[Dependency],
    answers: &BTreeMap<String, ResolvedAnswer>,
    format: impl Fn(&str, &VersionConstraint) -> String,
) -> Vec<String> {
    let mut formatted = BTreeSet::new();
    for dependency in dependencies {
        let Some(answer) = answers.get(&dependency.name) else {
            continue;
        };
        for name in &answer.package_names {
            if dependency.constraints.is_empty() {
                formatted.insert(name.clone());
            } else {
                formatted.extend(dependency.constraints.iter().map(|c| format(name, c)));
            }
        }
    }
    formatted.into_iter().collect()
}

/// Collapse all whitespace runs into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn changelogs(history: &ReleaseHistory) -> Vec<String> {
    history
        .newest_first()
        .into_iter()
        .map(|(version, entry)| {
            let mut text =
                format!("{version} ({}) {}", entry.stamp.format("%Y-%m-%d"), entry.author);
            for message in &entry.messages {
                text.push_str("\n  * ");
                text.push_str(&collapse_whitespace(message));
            }
            text
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::generator::ChangelogEntry;

    #[test]
    fn test_format_depends_sorted_and_deduplicated() {
        let mut answers = BTreeMap::new();
        answers.insert(
            "boost".to_string(),
            ResolvedAnswer::new(vec!["libboost-dev".to_string()], "apt", "apt"),
        );
        answers.insert(
            "eigen".to_string(),
            ResolvedAnswer::new(vec!["libeigen3-dev".to_string()], "apt", "apt"),
        );
        let deps = vec![
            Dependency::new("eigen"),
            Dependency::new("boost"),
            Dependency::with_min_version("boost", "1.74"),
            Dependency::new("eigen"),
        ];

        let formatted = format_depends(&deps, &answers, |name, c| format!("{name} {c}"));
        assert_eq!(formatted, vec!["libboost-dev", "libboost-dev >= 1.74", "libeigen3-dev"]);
    }

    #[test]
    fn test_changelogs_newest_first() {
        let history = ReleaseHistory::new()
            .with_entry(
                "1.0.0",
                ChangelogEntry {
                    stamp: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
                    author: "Jane Doe".to_string(),
                    messages: vec!["Initial release".to_string()],
                },
            )
            .with_entry(
                "1.1.0",
                ChangelogEntry {
                    stamp: Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap(),
                    author: "Jane Doe".to_string(),
                    messages: vec!["Fix   build".to_string(), "Add node".to_string()],
                },
            );

        let entries = changelogs(&history);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "1.1.0 (2025-03-04) Jane Doe\n  * Fix build\n  * Add node");
        assert!(entries[1].starts_with("1.0.0 "));
    }
}
