//! Error types for rosdep key resolution

use agiros_bloom_core::ExitClass;
use thiserror::Error;

/// Failures of resolving a rosdep key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosdepError {
    /// The key has no definition in the view
    #[error("Could not resolve rosdep key '{key}'")]
    KeyNotFound { key: String },

    /// The key is defined but has no usable rule for the platform
    #[error("Could not resolve rosdep key '{key}' for {os_name}:{os_version}: {reason}")]
    NoRuleForPlatform { key: String, os_name: String, os_version: String, reason: String },

    /// The rule data or the tooling around it misbehaved
    #[error("Rosdep tooling failure: {reason}")]
    Tooling { reason: String },

    /// A rule names an installer the platform does not support
    #[error("Installer '{installer}' is not available on OS '{os_name}'")]
    InvalidInstaller { installer: String, os_name: String },

    /// The key stayed unresolved after every retry and the fallback
    #[error("Failed to resolve rosdep key '{key}', aborting")]
    Unresolvable {
        key: String,
        #[source]
        cause: Box<RosdepError>,
    },

    /// The external rosdep data could not be refreshed
    #[error("Failed to refresh rosdep data: {reason}")]
    RefreshFailed { reason: String },
}

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, RosdepError>;

impl RosdepError {
    /// Create a key not found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Create a missing rule error
    pub fn no_rule(
        key: impl Into<String>,
        os_name: impl Into<String>,
        os_version: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::NoRuleForPlatform {
            key: key.into(),
            os_name: os_name.into(),
            os_version: os_version.into(),
            reason: reason.into(),
        }
    }

    /// Create a tooling error
    pub fn tooling(reason: impl Into<String>) -> Self {
        Self::Tooling { reason: reason.into() }
    }

    /// Create an invalid installer error
    pub fn invalid_installer(installer: impl Into<String>, os_name: impl Into<String>) -> Self {
        Self::InvalidInstaller { installer: installer.into(), os_name: os_name.into() }
    }

    /// Create a refresh failure
    pub fn refresh_failed(reason: impl Into<String>) -> Self {
        Self::RefreshFailed { reason: reason.into() }
    }

    /// Check if refreshing the rosdep data might fix the error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::KeyNotFound { .. } | Self::NoRuleForPlatform { .. } | Self::Tooling { .. } => {
                true
            }

            Self::InvalidInstaller { .. }
            | Self::Unresolvable { .. }
            | Self::RefreshFailed { .. } => false,
        }
    }

    /// Check if the outcome is a stable answer that may be cached
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. } | Self::NoRuleForPlatform { .. })
    }

    /// Exit class reported for this error
    pub fn exit_class(&self) -> ExitClass {
        match self {
            Self::KeyNotFound { .. } => ExitClass::NoSuchRosdepKey,
            Self::NoRuleForPlatform { .. } => ExitClass::NoRosdepKeyForDistro,
            Self::Tooling { .. } => ExitClass::Unknown,
            Self::InvalidInstaller { .. } => ExitClass::InvalidInstallerKey,
            Self::Unresolvable { cause, .. } => cause.exit_class(),
            Self::RefreshFailed { .. } => ExitClass::RefreshFailed,
        }
    }
}
