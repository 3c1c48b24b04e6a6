//! Error types for rosdistro access

use std::path::PathBuf;

use thiserror::Error;

/// Rosdistro index errors
#[derive(Error, Debug)]
pub enum RosdistroError {
    /// Index or distribution file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML could not be parsed
    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The index format is older than this tool supports
    #[error("Unsupported rosdistro index version {found}, at least {minimum} is required")]
    UnsupportedIndexVersion { found: u32, minimum: u32 },

    /// The distribution is not listed in the index
    #[error("Distribution '{name}' is not listed in the rosdistro index")]
    UnknownDistribution { name: String },

    /// The file content is structurally wrong
    #[error("Invalid rosdistro data in {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

/// Result type alias for rosdistro operations
pub type Result<T> = std::result::Result<T, RosdistroError>;

impl RosdistroError {
    /// Create an invalid format error
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat { path: path.into(), reason: reason.into() }
    }

    /// Create an unknown distribution error
    pub fn unknown_distribution(name: impl Into<String>) -> Self {
        Self::UnknownDistribution { name: name.into() }
    }
}
