//! Error types for substitution generation

use agiros_bloom_core::ExitClass;
use agiros_bloom_rosdep::RosdepError;
use thiserror::Error;

/// Generator error types
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A dependency key could not be resolved
    #[error("Failed to resolve dependencies of {package}: {source}")]
    Resolution {
        package: String,
        #[source]
        source: RosdepError,
    },

    /// A dependency condition could not be evaluated
    #[error("Invalid dependency condition in {package}: {source}")]
    Condition {
        package: String,
        #[source]
        source: agiros_bloom_core::Error,
    },

    /// The package cannot be released as described
    #[error("Invalid package {package}: {reason}")]
    InvalidPackage { package: String, reason: String },
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

impl GeneratorError {
    /// Create a resolution error
    pub fn resolution(package: impl Into<String>, source: RosdepError) -> Self {
        Self::Resolution { package: package.into(), source }
    }

    /// Create a condition error
    pub fn condition(package: impl Into<String>, source: agiros_bloom_core::Error) -> Self {
        Self::Condition { package: package.into(), source }
    }

    /// Create an invalid package error
    pub fn invalid_package(package: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPackage { package: package.into(), reason: reason.into() }
    }

    /// The rosdep failure behind this error, if any
    pub fn rosdep_error(&self) -> Option<&RosdepError> {
        match self {
            Self::Resolution { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Exit class reported for this error
    pub fn exit_class(&self) -> ExitClass {
        self.rosdep_error().map_or(ExitClass::Unknown, RosdepError::exit_class)
    }
}
