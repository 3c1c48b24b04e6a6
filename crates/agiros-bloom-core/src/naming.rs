//! AGIROS naming, branching and tagging conventions
//!
//! Every function here is pure: identical inputs always give identical
//! outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ecosystem tag prepended to every released package name
pub const ECOSYSTEM_PREFIX: &str = "agiros";

/// Upstream tag stripped from names coming from other ROS ecosystems
const UPSTREAM_PREFIX: &str = "ros";

/// Root of every AGIROS installation prefix
pub const INSTALL_ROOT: &str = "/opt/agiros";

/// Packaging backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Debian-like packaging (apt)
    Debian,
    /// RPM-like packaging (dnf/yum)
    Rpm,
}

impl Backend {
    /// First component of every branch created for this backend
    pub fn branch_prefix(self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Rpm => "rpm",
        }
    }

    /// Restrict a name to the backend's package identifier character set
    pub fn sanitize(self, name: &str) -> String {
        match self {
            Self::Debian => name.to_lowercase().replace('_', "-"),
            Self::Rpm => name
                .replace('_', "-")
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
                .collect(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.branch_prefix())
    }
}

/// Arguments for creating one packaging branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchArgument {
    /// Branch to create
    pub branch: String,

    /// Branch it is created from
    pub parent: String,

    /// Whether branch creation should prompt
    pub interactive: bool,
}

/// Apply the AGIROS package naming convention: `agiros-<distro>-<name>`
///
/// An existing `agiros-<distro>-` or `ros-<distro>-` prefix is removed first,
/// so the transformation is idempotent.
pub fn package_name(name: &str, distro: &str) -> String {
    let own = format!("{ECOSYSTEM_PREFIX}-{distro}-");
    let upstream = format!("{UPSTREAM_PREFIX}-{distro}-");
    let base = name
        .strip_prefix(own.as_str())
        .or_else(|| name.strip_prefix(upstream.as_str()))
        .unwrap_or(name);

    format!("{own}{}", base.replace('_', "-"))
}

/// Branch names for a package: the canonical `<backend>/<distro>/<name>`
/// branch followed by one `<backend>/<distro>/<target>/<name>` branch per
/// target distribution
pub fn branch_names<S: AsRef<str>>(
    backend: Backend,
    package: &str,
    distro: &str,
    targets: &[S],
) -> Vec<String> {
    let base = format!("{}/{distro}/{package}", backend.branch_prefix());
    let mut names = Vec::with_capacity(targets.len() + 1);
    names.push(base);
    names.extend(
        targets
            .iter()
            .map(|t| format!("{}/{distro}/{}/{package}", backend.branch_prefix(), t.as_ref())),
    );
    names
}

/// Branching arguments: the canonical branch is created from `source_branch`,
/// the per-target branches from the canonical branch
pub fn branching_arguments<S: AsRef<str>>(
    backend: Backend,
    package: &str,
    distro: &str,
    targets: &[S],
    source_branch: &str,
) -> Vec<BranchArgument> {
    let names = branch_names(backend, package, distro, targets);
    let base = names[0].clone();
    names
        .into_iter()
        .enumerate()
        .map(|(i, branch)| BranchArgument {
            branch,
            parent: if i == 0 { source_branch.to_string() } else { base.clone() },
            interactive: false,
        })
        .collect()
}

/// Release tag: `release/<distro>/<name>/<version>-<increment>`
///
/// Uses the raw package name, never the AGIROS-prefixed one.
pub fn release_tag(package: &str, distro: &str, version: &str, increment: impl fmt::Display) -> String {
    format!("release/{distro}/{package}/{version}-{increment}")
}

/// Default installation prefix for a distribution
pub fn install_prefix(distro: &str) -> String {
    format!("{INSTALL_ROOT}/{distro}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_naming_convention() {
        assert_eq!(package_name("my_robot_driver", "loong"), "agiros-loong-my-robot-driver");
        assert_eq!(package_name("ros-workspace", "loong"), "agiros-loong-ros-workspace");
        assert_eq!(package_name("ros-loong-rclcpp", "loong"), "agiros-loong-rclcpp");
    }

    #[test]
    fn test_package_naming_idempotent() {
        for name in ["my_robot_driver", "agiros-loong-foo", "ros-loong-bar_baz", "agiros_loong_x", ""] {
            let once = package_name(name, "loong");
            assert_eq!(package_name(&once, "loong"), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_package_naming_other_distro_prefix_kept() {
        assert_eq!(package_name("agiros-pixiu-foo", "loong"), "agiros-loong-agiros-pixiu-foo");
    }

    #[test]
    fn test_branch_names() {
        let names = branch_names(Backend::Debian, "my_pkg", "loong", &["noble"]);
        assert_eq!(names, vec!["debian/loong/my_pkg", "debian/loong/noble/my_pkg"]);

        let names = branch_names(Backend::Rpm, "my_pkg", "loong", &["24.03", "22.03"]);
        assert_eq!(names, vec!["rpm/loong/my_pkg", "rpm/loong/24.03/my_pkg", "rpm/loong/22.03/my_pkg"]);

        let none: [&str; 0] = [];
        assert_eq!(branch_names(Backend::Debian, "p", "loong", &none), vec!["debian/loong/p"]);
    }

    #[test]
    fn test_branching_arguments_parents() {
        let args = branching_arguments(Backend::Debian, "my_pkg", "loong", &["noble"], "upstream");
        assert_eq!(args[0].branch, "debian/loong/my_pkg");
        assert_eq!(args[0].parent, "upstream");
        assert_eq!(args[1].parent, "debian/loong/my_pkg");
        assert!(args.iter().all(|a| !a.interactive));
    }

    #[test]
    fn test_release_tag() {
        assert_eq!(release_tag("my_pkg", "loong", "1.2.3", "0"), "release/loong/my_pkg/1.2.3-0");
        assert_eq!(release_tag("my_pkg", "loong", "1.2.3", 2), "release/loong/my_pkg/1.2.3-2");
    }

    #[test]
    fn test_install_prefix() {
        assert_eq!(install_prefix("loong"), "/opt/agiros/loong");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(Backend::Debian.sanitize("Foo_Bar"), "foo-bar");
        assert_eq!(Backend::Rpm.sanitize("agiros-loong-foo_bar!"), "agiros-loong-foo-bar");
    }
}
