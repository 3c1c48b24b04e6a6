//! Platform coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies where a rosdep key is resolved: OS name, OS version and
/// AGIROS distribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformCoordinate {
    /// OS name (ubuntu, openeuler, ...)
    pub os_name: String,

    /// OS version or codename (noble, 24.03, ...)
    pub os_version: String,

    /// AGIROS distribution (loong, pixiu, ...)
    pub distro: String,
}

impl PlatformCoordinate {
    pub fn new(
        os_name: impl Into<String>,
        os_version: impl Into<String>,
        distro: impl Into<String>,
    ) -> Self {
        Self { os_name: os_name.into(), os_version: os_version.into(), distro: distro.into() }
    }
}

impl fmt::Display for PlatformCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.os_name, self.os_version, self.distro)
    }
}
