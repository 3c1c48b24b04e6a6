//! rosdistro `index.yaml` (REP 153)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Oldest index format this tool understands
pub const MIN_INDEX_VERSION: u32 = 4;

/// Top-level index file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    /// Always `index`
    #[serde(rename = "type")]
    pub file_type: String,

    /// Index format version
    pub version: u32,

    /// Distributions by name
    #[serde(default)]
    pub distributions: BTreeMap<String, IndexEntry>,
}

/// One distribution listed in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Distribution files, relative to the index
    #[serde(default)]
    pub distribution: Vec<String>,

    /// ros1 or ros2
    #[serde(default)]
    pub distribution_type: Option<DistributionType>,

    /// active, end-of-life, ...
    #[serde(default)]
    pub distribution_status: Option<String>,

    /// Python major version used by the distribution
    #[serde(default)]
    pub python_version: Option<u32>,
}

/// Platform generation family of a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionType {
    Ros1,
    Ros2,
    /// Unknown or missing type
    #[serde(other)]
    Other,
}

impl DistributionType {
    /// Value of `$ROS_VERSION` for conditions; unset for [`Self::Other`]
    pub fn ros_version(self) -> Option<u32> {
        match self {
            Self::Ros1 => Some(1),
            Self::Ros2 => Some(2),
            Self::Other => None,
        }
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ros1 => f.write_str("ros1"),
            Self::Ros2 => f.write_str("ros2"),
            Self::Other => f.write_str("other"),
        }
    }
}
