//! Configuration management for agiros-bloom
//!
//! This crate handles YAML configuration parsing, validation,
//! and environment variable substitution.

use std::path::{Path, PathBuf};

use agiros_bloom_core::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable that overrides the configured rosdistro index
pub const INDEX_URL_ENV: &str = "ROSDISTRO_INDEX_URL";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// AGIROS distribution to release into
    #[serde(default = "default_rosdistro")]
    pub rosdistro: String,

    /// OS the packages are generated for
    #[serde(default = "default_os_name")]
    pub os_name: String,

    /// Default OS version
    #[serde(default = "default_os_version")]
    pub os_version: String,

    /// Local rosdistro `index.yaml`
    #[serde(default = "default_index")]
    pub index: PathBuf,

    /// Rosdep rule files, highest priority first
    #[serde(default = "default_rosdep_sources")]
    pub rosdep_sources: Vec<PathBuf>,

    /// Installation prefix; `/opt/agiros/<rosdistro>` when unset
    #[serde(default)]
    pub install_prefix: Option<String>,

    /// Command that refreshes the rosdep data
    #[serde(default = "default_update_command")]
    pub update_command: Vec<String>,

    /// Refreshes allowed per unresolved key
    #[serde(default = "default_max_refreshes")]
    pub max_refreshes: u32,

    /// Rosdep keys never resolved
    #[serde(default)]
    pub skip_keys: Vec<String>,

    /// OS versions that get their own packaging branch
    #[serde(default)]
    pub target_os_versions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rosdistro: default_rosdistro(),
            os_name: default_os_name(),
            os_version: default_os_version(),
            index: default_index(),
            rosdep_sources: default_rosdep_sources(),
            install_prefix: None,
            update_command: default_update_command(),
            max_refreshes: default_max_refreshes(),
            skip_keys: Vec::new(),
            target_os_versions: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {path:?}: {e}"))
        })?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse YAML: {e}")))?;

        config.apply_env_overrides()?;
        config.expand_env_vars()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply `ROSDISTRO_INDEX_URL`; only local (`file://` or plain path)
    /// indexes are supported
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(INDEX_URL_ENV) {
            debug!("Using rosdistro index from {INDEX_URL_ENV}={url}");
            self.index = index_path_from_url(&url)?;
        }
        Ok(())
    }

    /// Expand environment variables in paths
    fn expand_env_vars(&mut self) -> Result<()> {
        self.index = expand_path(&self.index)?;
        for source in &mut self.rosdep_sources {
            *source = expand_path(source)?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.rosdistro.is_empty() {
            return Err(Error::config("rosdistro cannot be empty"));
        }

        if self.os_name.is_empty() || self.os_version.is_empty() {
            return Err(Error::config("os_name and os_version cannot be empty"));
        }

        if !self.index.exists() {
            return Err(Error::config(format!(
                "Rosdistro index does not exist: {:?}",
                self.index
            )));
        }

        if let Some(missing) = self.rosdep_sources.iter().find(|s| !s.exists()) {
            return Err(Error::config(format!("Rosdep source does not exist: {missing:?}")));
        }

        if self.update_command.is_empty() {
            return Err(Error::config("update_command cannot be empty"));
        }

        if let Some(prefix) = &self.install_prefix {
            if !prefix.starts_with('/') {
                return Err(Error::config(format!(
                    "install_prefix must be an absolute path: {prefix}"
                )));
            }
        }

        Ok(())
    }
}

fn index_path_from_url(url: &str) -> Result<PathBuf> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Err(Error::config(format!(
            "Remote rosdistro index {url} is not supported, point {INDEX_URL_ENV} at a local index.yaml"
        )));
    }
    Ok(PathBuf::from(url.strip_prefix("file://").unwrap_or(url)))
}

/// Expand environment variables in a path
fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    let env_var_re = Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| Error::config(format!("Invalid expansion pattern: {e}")))?;

    let mut result = path_str.to_string();
    for cap in env_var_re.captures_iter(&path_str) {
        let Some(var_name) = cap.get(1).or_else(|| cap.get(2)).map(|m| m.as_str()) else {
            continue;
        };
        let var_value = std::env::var(var_name)
            .map_err(|_| Error::config(format!("Environment variable not found: {var_name}")))?;

        result = result.replace(&cap[0], &var_value);
    }

    Ok(PathBuf::from(result))
}

fn default_rosdistro() -> String {
    "loong".to_string()
}

fn default_os_name() -> String {
    "ubuntu".to_string()
}

fn default_os_version() -> String {
    "noble".to_string()
}

fn default_index() -> PathBuf {
    PathBuf::from("${HOME}/.agiros/rosdistro/index.yaml")
}

fn default_rosdep_sources() -> Vec<PathBuf> {
    vec![PathBuf::from("${HOME}/.agiros/rosdep/base.yaml")]
}

fn default_update_command() -> Vec<String> {
    vec!["agirosdep".to_string(), "update".to_string()]
}

fn default_max_refreshes() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use std::env;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_expand_path() {
        env::set_var("AGIROS_BLOOM_TEST_VAR", "/test/path");

        let path = PathBuf::from("${AGIROS_BLOOM_TEST_VAR}/sub");
        let expanded = expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/path/sub"));

        let path = PathBuf::from("$AGIROS_BLOOM_TEST_VAR/sub");
        let expanded = expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/path/sub"));

        assert!(expand_path(Path::new("$AGIROS_BLOOM_UNSET_VAR/x")).is_err());
    }

    #[test]
    fn test_index_path_from_url() {
        assert_eq!(
            index_path_from_url("file:///srv/rosdistro/index.yaml").unwrap(),
            PathBuf::from("/srv/rosdistro/index.yaml")
        );
        assert_eq!(index_path_from_url("/tmp/index.yaml").unwrap(), PathBuf::from("/tmp/index.yaml"));
        assert!(index_path_from_url("https://example.com/index.yaml").is_err());
    }

    #[test]
    fn test_defaults_from_minimal_yaml() {
        let config: Config = serde_yaml::from_str("rosdistro: pixiu\n").unwrap();
        assert_eq!(config.rosdistro, "pixiu");
        assert_eq!(config.max_refreshes, 2);
        assert_eq!(config.update_command, vec!["agirosdep", "update"]);
        assert_eq!(config.os_name, "ubuntu");
    }

    #[test]
    fn test_config_validation() {
        let temp_dir = TempDir::new().unwrap();
        let index = temp_dir.path().join("index.yaml");
        let rules = temp_dir.path().join("base.yaml");
        std::fs::write(&index, "type: index\nversion: 4\n").unwrap();
        std::fs::write(&rules, "{}\n").unwrap();

        let config = Config { index, rosdep_sources: vec![rules.clone()], ..Config::default() };
        assert!(config.validate().is_ok());

        let missing = Config {
            rosdep_sources: vec![temp_dir.path().join("absent.yaml")],
            ..config.clone()
        };
        assert!(missing.validate().is_err());

        let relative = Config { install_prefix: Some("opt/agiros".to_string()), ..config };
        assert!(relative.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let index = temp_dir.path().join("index.yaml");
        let rules = temp_dir.path().join("base.yaml");
        std::fs::write(&index, "type: index\nversion: 4\n").unwrap();
        std::fs::write(&rules, "{}\n").unwrap();

        let config_path = temp_dir.path().join("agiros-bloom.yaml");
        std::fs::write(
            &config_path,
            format!(
                "rosdistro: loong\nos_name: openeuler\nos_version: '24.03'\nindex: {}\nrosdep_sources:\n  - {}\nskip_keys: [python3-catkin-pkg]\n",
                index.display(),
                rules.display()
            ),
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.os_name, "openeuler");
        assert_eq!(config.os_version, "24.03");
        assert_eq!(config.skip_keys, vec!["python3-catkin-pkg"]);
        assert!(config.install_prefix.is_none());
    }
}
