//! Rosdep key definitions and rule selection

use serde_yaml::{Mapping, Value};

use crate::error::{Result, RosdepError};
use crate::installer::InstallerContext;

/// The rules of one rosdep key, as read from a rule file
#[derive(Debug, Clone, PartialEq)]
pub struct RosdepDefinition {
    /// Rosdep key
    pub key: String,

    /// OS name to rule data
    pub data: Value,

    /// Where the definition came from
    pub origin: String,
}

/// Rule selected for a platform, with the installer that materializes it
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRule {
    pub installer_key: String,
    pub rule: Value,
}

impl RosdepDefinition {
    pub fn new(key: impl Into<String>, data: Value, origin: impl Into<String>) -> Self {
        Self { key: key.into(), data, origin: origin.into() }
    }

    /// Select the rule that applies to `os_name`/`os_version`
    ///
    /// The OS entry may name an installer directly, or map OS versions (or
    /// `*`) to rules that may in turn name an installer. Rules without an
    /// installer use the OS default.
    pub fn rule_for_platform(
        &self,
        os_name: &str,
        os_version: &str,
        context: &InstallerContext,
    ) -> Result<SelectedRule> {
        let no_rule = |reason: &str| RosdepError::no_rule(&self.key, os_name, os_version, reason);

        let Value::Mapping(data) = &self.data else {
            return Err(RosdepError::tooling(format!(
                "definition of '{}' in {} is not a mapping",
                self.key, self.origin
            )));
        };

        let os_data = lookup(data, os_name).ok_or_else(|| no_rule("no rule for OS"))?;
        let os_keys = context.os_installer_keys(os_name)?;
        let mut installer_key = context.default_installer_key(os_name)?.to_string();
        let mut rule = os_data;

        if let Value::Mapping(map) = os_data {
            if let Some((key, value)) = pick_installer(map, os_keys) {
                installer_key = key;
                rule = value;
            } else if let Some(value) = lookup(map, os_version).or_else(|| lookup(map, "*")) {
                rule = value;
                if let Value::Mapping(version_map) = value {
                    if let Some((key, value)) = pick_installer(version_map, os_keys) {
                        installer_key = key;
                        rule = value;
                    } else if let Some(foreign) = foreign_installer(version_map, context) {
                        return Err(RosdepError::invalid_installer(foreign, os_name));
                    }
                }
            } else if let Some(foreign) = foreign_installer(map, context) {
                return Err(RosdepError::invalid_installer(foreign, os_name));
            } else {
                return Err(no_rule("no rule for OS version"));
            }
        }

        if rule.is_null() {
            return Err(no_rule("rule is empty"));
        }

        Ok(SelectedRule { installer_key, rule: rule.clone() })
    }
}

/// Mapping lookup that also matches numeric keys such as an unquoted `24.03`
/// or `22.10`, which YAML reads as the float `22.1`
fn lookup<'a>(map: &'a Mapping, name: &str) -> Option<&'a Value> {
    map.get(name).or_else(|| {
        let wanted = name.parse::<f64>().ok()?;
        map.iter().find_map(|(key, value)| match key {
            Value::Number(number) if number.as_f64() == Some(wanted) => Some(value),
            _ => None,
        })
    })
}

fn pick_installer<'a>(map: &'a Mapping, os_keys: &[String]) -> Option<(String, &'a Value)> {
    os_keys.iter().find_map(|key| map.get(key.as_str()).map(|value| (key.clone(), value)))
}

/// An installer key of some other OS used in this OS's rules
fn foreign_installer(map: &Mapping, context: &InstallerContext) -> Option<String> {
    map.keys()
        .filter_map(Value::as_str)
        .find(|key| context.is_installer_key(key))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(yaml: &str) -> RosdepDefinition {
        RosdepDefinition::new("foo", serde_yaml::from_str(yaml).unwrap(), "test.yaml")
    }

    fn select(def: &RosdepDefinition, os: &str, version: &str) -> Result<SelectedRule> {
        def.rule_for_platform(os, version, &InstallerContext::default())
    }

    #[test]
    fn test_plain_os_rule_uses_default_installer() {
        let def = definition("ubuntu: [libfoo-dev]");
        let selected = select(&def, "ubuntu", "noble").unwrap();
        assert_eq!(selected.installer_key, "apt");
    }

    #[test]
    fn test_installer_keyed_rule() {
        let def = definition("ubuntu:\n  pip:\n    packages: [foo]\n");
        let selected = select(&def, "ubuntu", "noble").unwrap();
        assert_eq!(selected.installer_key, "pip");
    }

    #[test]
    fn test_version_and_wildcard() {
        let def = definition(
            "openeuler:\n  '22.03': [foo-old]\n  '*':\n    yum: [foo]\nubuntu:\n  jammy: [foo-j]\n",
        );
        let exact = select(&def, "openeuler", "22.03").unwrap();
        assert_eq!(exact.installer_key, "dnf");
        assert_eq!(exact.rule, serde_yaml::from_str::<Value>("[foo-old]").unwrap());

        let wildcard = select(&def, "openeuler", "24.03").unwrap();
        assert_eq!(wildcard.installer_key, "yum");

        assert!(matches!(
            select(&def, "ubuntu", "noble"),
            Err(RosdepError::NoRuleForPlatform { .. })
        ));
    }

    #[test]
    fn test_unquoted_numeric_version() {
        let def = definition("openeuler:\n  24.03: [foo]\n");
        assert!(select(&def, "openeuler", "24.03").is_ok());

        let def = definition("ubuntu:\n  22.10: [foo-kinetic]\nrhel:\n  8: [foo-el8]\n");
        let selected = select(&def, "ubuntu", "22.10").unwrap();
        assert_eq!(selected.rule, serde_yaml::from_str::<Value>("[foo-kinetic]").unwrap());
        assert!(select(&def, "rhel", "8").is_ok());
        assert!(matches!(
            select(&def, "rhel", "9"),
            Err(RosdepError::NoRuleForPlatform { .. })
        ));
    }

    #[test]
    fn test_missing_os_and_null_rule() {
        let def = definition("fedora: [foo]\nubuntu:\n  noble: ~\n");
        assert!(matches!(
            select(&def, "debian", "bookworm"),
            Err(RosdepError::NoRuleForPlatform { .. })
        ));
        assert!(matches!(
            select(&def, "ubuntu", "noble"),
            Err(RosdepError::NoRuleForPlatform { .. })
        ));
    }

    #[test]
    fn test_foreign_installer_is_invalid() {
        let def = definition("ubuntu:\n  dnf: [foo]\n");
        assert!(matches!(
            select(&def, "ubuntu", "noble"),
            Err(RosdepError::InvalidInstaller { ref installer, .. }) if installer == "dnf"
        ));
    }
}
