//! Dependency representation and version constraints

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dependency declared in a package manifest: a rosdep key with optional
/// version constraints and an optional condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    /// Rosdep key or package name
    pub name: String,

    /// Version constraints, in manifest attribute order (lt, lte, eq, gte, gt)
    #[serde(default)]
    pub constraints: Vec<VersionConstraint>,

    /// Optional condition (e.g., "$ROS_VERSION == 2")
    #[serde(default)]
    pub condition: Option<String>,
}

/// Version constraint for dependencies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VersionConstraint {
    /// Strictly lower version (<)
    LessThan(String),

    /// Maximum version (<=)
    LessOrEqual(String),

    /// Exact version match
    Exact(String),

    /// Minimum version (>=)
    GreaterOrEqual(String),

    /// Strictly greater version (>)
    GreaterThan(String),
}

impl Dependency {
    /// Create a simple dependency without version constraints
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), constraints: Vec::new(), condition: None }
    }

    /// Create a dependency with a minimum version requirement
    pub fn with_min_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: vec![VersionConstraint::GreaterOrEqual(version.into())],
            condition: None,
        }
    }

    /// Attach a condition expression
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Add a version constraint
    pub fn with_constraint(mut self, constraint: VersionConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

impl VersionConstraint {
    /// Version the constraint refers to
    pub fn version(&self) -> &str {
        match self {
            Self::LessThan(v)
            | Self::LessOrEqual(v)
            | Self::Exact(v)
            | Self::GreaterOrEqual(v)
            | Self::GreaterThan(v) => v,
        }
    }

    /// Build a constraint from a package.xml attribute name
    pub fn from_attribute(attribute: &str, version: impl Into<String>) -> Option<Self> {
        let version = version.into();
        Some(match attribute {
            "version_lt" => Self::LessThan(version),
            "version_lte" => Self::LessOrEqual(version),
            "version_eq" => Self::Exact(version),
            "version_gte" => Self::GreaterOrEqual(version),
            "version_gt" => Self::GreaterThan(version),
            _ => return None,
        })
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        if let Some(condition) = &self.condition {
            write!(f, " [{condition}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LessThan(v) => write!(f, "< {v}"),
            Self::LessOrEqual(v) => write!(f, "<= {v}"),
            Self::Exact(v) => write!(f, "= {v}"),
            Self::GreaterOrEqual(v) => write!(f, ">= {v}"),
            Self::GreaterThan(v) => write!(f, "> {v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::with_min_version("rclcpp", "1.0.0").with_condition("$ROS_VERSION == 2");
        assert_eq!(dep.to_string(), "rclcpp >= 1.0.0 [$ROS_VERSION == 2]");
    }

    #[test]
    fn test_constraint_from_attribute() {
        assert_eq!(
            VersionConstraint::from_attribute("version_lt", "2.0"),
            Some(VersionConstraint::LessThan("2.0".to_string()))
        );
        assert_eq!(VersionConstraint::from_attribute("condition", "x"), None);
    }
}
