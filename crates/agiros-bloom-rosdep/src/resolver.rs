//! Key resolver

use agiros_bloom_core::PlatformCoordinate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::ResolutionCache;
use crate::error::{Result, RosdepError};
use crate::installer::InstallerContext;
use crate::view::ViewProvider;

/// Concrete packages a key resolves to on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAnswer {
    /// Never empty
    pub package_names: Vec<String>,

    /// Installer that installs the packages
    pub installer_key: String,

    /// Default installer of the OS
    pub default_installer_key: String,
}

impl ResolvedAnswer {
    pub fn new(
        package_names: Vec<String>,
        installer_key: impl Into<String>,
        default_installer_key: impl Into<String>,
    ) -> Self {
        Self {
            package_names,
            installer_key: installer_key.into(),
            default_installer_key: default_installer_key.into(),
        }
    }
}

/// Resolves rosdep keys against cached views
pub struct KeyResolver {
    provider: Box<dyn ViewProvider>,
    context: InstallerContext,
    cache: ResolutionCache,
}

impl KeyResolver {
    /// Create a resolver with the default installer context
    pub fn new(provider: impl ViewProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            context: InstallerContext::default(),
            cache: ResolutionCache::new(),
        }
    }

    pub fn with_context(mut self, context: InstallerContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &InstallerContext {
        &self.context
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Drop every cached view and answer
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }

    /// Resolve one key for a coordinate
    ///
    /// Answers and definitive failures are cached; tooling failures are not.
    pub fn resolve(&self, key: &str, coordinate: &PlatformCoordinate) -> Result<ResolvedAnswer> {
        if let Some(outcome) = self.cache.answer(key, coordinate) {
            debug!("Cache hit for '{key}' on {coordinate}");
            return outcome;
        }

        let outcome = self.resolve_uncached(key, coordinate);
        match &outcome {
            Ok(_) => self.cache.store_answer(key, coordinate, outcome.clone()),
            Err(e) if e.is_definitive() => self.cache.store_answer(key, coordinate, outcome.clone()),
            Err(_) => {}
        }
        outcome
    }

    fn resolve_uncached(&self, key: &str, coordinate: &PlatformCoordinate) -> Result<ResolvedAnswer> {
        let os_name = coordinate.os_name.as_str();
        let default_installer = self.context.default_installer_key(os_name)?.to_string();

        let view = self.cache.view_or_fetch(coordinate, || self.provider.fetch_view(coordinate))?;
        let definition = view.lookup(key).ok_or_else(|| RosdepError::key_not_found(key))?;

        let selected = definition.rule_for_platform(os_name, &coordinate.os_version, &self.context)?;
        let installer = self.context.installer_for(os_name, &selected.installer_key)?;
        let package_names = installer.resolve(&selected.rule)?;

        if package_names.is_empty() {
            return Err(RosdepError::no_rule(
                key,
                os_name,
                &coordinate.os_version,
                "rule resolves to no packages",
            ));
        }

        debug!("Resolved '{key}' to {package_names:?} via {}", selected.installer_key);
        Ok(ResolvedAnswer::new(package_names, selected.installer_key, default_installer))
    }
}
