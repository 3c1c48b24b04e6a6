//! Installers and the per-OS installer context

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_yaml::Value;

use crate::error::{Result, RosdepError};

/// Turns a selected rule into concrete package names
pub trait Installer: Send + Sync {
    /// Installer key used in rule files (apt, dnf, pip, ...)
    fn key(&self) -> &str;

    /// Materialize the package names of a rule
    fn resolve(&self, rule: &Value) -> Result<Vec<String>>;
}

/// System package manager or pip; all of them share the rule format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerInstaller {
    key: String,
}

impl PackageManagerInstaller {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Installer for PackageManagerInstaller {
    fn key(&self) -> &str {
        &self.key
    }

    fn resolve(&self, rule: &Value) -> Result<Vec<String>> {
        package_list(&self.key, rule)
    }
}

/// Accepts a sequence of names, a whitespace separated string, or a mapping
/// with a `packages` entry holding either
fn package_list(installer: &str, rule: &Value) -> Result<Vec<String>> {
    match rule {
        Value::Null => Ok(Vec::new()),
        Value::String(names) => Ok(names.split_whitespace().map(str::to_string).collect()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(RosdepError::tooling(format!(
                    "invalid package entry {other:?} in {installer} rule"
                ))),
            })
            .collect(),
        Value::Mapping(map) => match map.get("packages") {
            Some(packages @ (Value::String(_) | Value::Sequence(_) | Value::Null)) => {
                package_list(installer, packages)
            }
            _ => Err(RosdepError::tooling(format!(
                "{installer} rule mapping has no 'packages' list"
            ))),
        },
        other => Err(RosdepError::tooling(format!("invalid {installer} rule {other:?}"))),
    }
}

#[derive(Debug, Clone)]
struct OsInstallers {
    keys: Vec<String>,
    default: String,
}

/// Which installers exist and which of them each OS supports
#[derive(Clone)]
pub struct InstallerContext {
    installers: BTreeMap<String, Arc<dyn Installer>>,
    os_installers: BTreeMap<String, OsInstallers>,
}

impl InstallerContext {
    /// Create an empty context
    pub fn empty() -> Self {
        Self { installers: BTreeMap::new(), os_installers: BTreeMap::new() }
    }

    /// Register an installer implementation under its key
    pub fn register_installer(&mut self, installer: Arc<dyn Installer>) {
        self.installers.insert(installer.key().to_string(), installer);
    }

    /// Register the installers of an OS; the default is listed first
    pub fn register_os(&mut self, os_name: &str, default: &str, others: &[&str]) {
        let mut keys = vec![default.to_string()];
        keys.extend(others.iter().filter(|k| **k != default).map(|k| k.to_string()));
        self.os_installers
            .insert(os_name.to_string(), OsInstallers { keys, default: default.to_string() });
    }

    /// Builder form of [`register_os`](Self::register_os)
    pub fn with_os(mut self, os_name: &str, default: &str, others: &[&str]) -> Self {
        self.register_os(os_name, default, others);
        self
    }

    /// Installer keys available on an OS, default first
    pub fn os_installer_keys(&self, os_name: &str) -> Result<&[String]> {
        self.os_installers
            .get(os_name)
            .map(|os| os.keys.as_slice())
            .ok_or_else(|| RosdepError::invalid_installer("<none>", os_name))
    }

    /// Default installer key of an OS
    pub fn default_installer_key(&self, os_name: &str) -> Result<&str> {
        self.os_installers
            .get(os_name)
            .map(|os| os.default.as_str())
            .ok_or_else(|| RosdepError::invalid_installer("<none>", os_name))
    }

    /// Whether `key` names an installer of any OS
    pub fn is_installer_key(&self, key: &str) -> bool {
        self.installers.contains_key(key)
    }

    /// Installer usable on `os_name` under `key`
    pub fn installer_for(&self, os_name: &str, key: &str) -> Result<&dyn Installer> {
        let listed = self.os_installer_keys(os_name)?.iter().any(|k| k == key);
        match self.installers.get(key) {
            Some(installer) if listed => Ok(installer.as_ref()),
            _ => Err(RosdepError::invalid_installer(key, os_name)),
        }
    }
}

impl Default for InstallerContext {
    fn default() -> Self {
        let mut context = Self::empty();
        for key in ["apt", "dnf", "yum", "zypper", "pip"] {
            context.register_installer(Arc::new(PackageManagerInstaller::new(key)));
        }

        for os in ["ubuntu", "debian"] {
            context.register_os(os, "apt", &["pip"]);
        }
        for os in ["fedora", "rhel", "centos", "rocky", "almalinux", "openeuler"] {
            context.register_os(os, "dnf", &["yum", "pip"]);
        }
        context.register_os("opensuse", "zypper", &["pip"]);
        context
    }
}

impl fmt::Debug for InstallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallerContext")
            .field("installers", &self.installers.keys().collect::<Vec<_>>())
            .field("os_installers", &self.os_installers)
            .finish()
    }
}
