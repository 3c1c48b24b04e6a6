//! Process exit classes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a failed run, surfaced as the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitClass {
    /// Success
    Ok,
    /// Anything not covered by a more specific class
    Unknown,
    /// The rosdep key has no entry at all
    NoSuchRosdepKey,
    /// The rosdep key exists but has no rule for the target platform
    NoRosdepKeyForDistro,
    /// A rule named an installer the platform does not know
    InvalidInstallerKey,
    /// The external rosdep data could not be refreshed
    RefreshFailed,
}

impl ExitClass {
    /// Numeric process exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Unknown => 1,
            Self::NoSuchRosdepKey => 31,
            Self::NoRosdepKeyForDistro => 32,
            Self::InvalidInstallerKey => 33,
            Self::RefreshFailed => 34,
        }
    }
}

impl fmt::Display for ExitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::Unknown => "unknown",
            Self::NoSuchRosdepKey => "no such rosdep key",
            Self::NoRosdepKeyForDistro => "no rosdep rule for platform",
            Self::InvalidInstallerKey => "invalid installer key",
            Self::RefreshFailed => "rosdep refresh failed",
        };
        write!(f, "{name} ({})", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let classes = [
            ExitClass::Ok,
            ExitClass::Unknown,
            ExitClass::NoSuchRosdepKey,
            ExitClass::NoRosdepKeyForDistro,
            ExitClass::InvalidInstallerKey,
            ExitClass::RefreshFailed,
        ];
        let mut codes: Vec<i32> = classes.iter().map(|c| c.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), classes.len());
        assert_eq!(ExitClass::Ok.code(), 0);
    }
}
