//! Rosdep views and the providers that build them

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use agiros_bloom_core::{package_name, PlatformCoordinate};
use agiros_bloom_rosdistro::DescriptorSource;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::error::{Result, RosdepError};
use crate::rules::RosdepDefinition;

/// Immutable rule set for one platform coordinate
#[derive(Debug, Clone, Default)]
pub struct View {
    definitions: BTreeMap<String, RosdepDefinition>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition unless the key is already defined; earlier sources
    /// take precedence
    pub fn insert_if_absent(&mut self, definition: RosdepDefinition) -> bool {
        if self.definitions.contains_key(&definition.key) {
            return false;
        }
        self.definitions.insert(definition.key.clone(), definition);
        true
    }

    pub fn lookup(&self, key: &str) -> Option<&RosdepDefinition> {
        self.definitions.get(key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Supplies the [`View`] of a platform coordinate
pub trait ViewProvider: Send + Sync {
    fn fetch_view(&self, coordinate: &PlatformCoordinate) -> Result<View>;
}

/// Builds views from rosdep YAML rule files and, optionally, the packages
/// released in the coordinate's distribution
#[derive(Clone, Default)]
pub struct SourcesViewProvider {
    sources: Vec<PathBuf>,
    descriptors: Option<Arc<dyn DescriptorSource>>,
}

impl SourcesViewProvider {
    /// Rule files in priority order
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self { sources, descriptors: None }
    }

    /// Also define every released package of the distribution
    pub fn with_descriptor_source(mut self, source: Arc<dyn DescriptorSource>) -> Self {
        self.descriptors = Some(source);
        self
    }
}

impl ViewProvider for SourcesViewProvider {
    fn fetch_view(&self, coordinate: &PlatformCoordinate) -> Result<View> {
        info!("Loading rosdep view for {coordinate}");
        let mut view = View::new();

        for path in &self.sources {
            let origin = path.display().to_string();
            let content = std::fs::read_to_string(path)
                .map_err(|e| RosdepError::tooling(format!("failed to read {origin}: {e}")))?;
            let rules: Option<BTreeMap<String, Value>> = serde_yaml::from_str(&content)
                .map_err(|e| RosdepError::tooling(format!("failed to parse {origin}: {e}")))?;

            let mut added = 0usize;
            for (key, data) in rules.unwrap_or_default() {
                if view.insert_if_absent(RosdepDefinition::new(key, data, origin.as_str())) {
                    added += 1;
                }
            }
            debug!("{added} rosdep keys from {origin}");
        }

        if let Some(descriptors) = &self.descriptors {
            let distribution = descriptors
                .distribution(&coordinate.distro)
                .map_err(|e| RosdepError::tooling(e.to_string()))?;

            for name in distribution.packages.keys() {
                let mut data = Mapping::new();
                data.insert(
                    Value::String(coordinate.os_name.clone()),
                    Value::Sequence(vec![Value::String(package_name(name, &coordinate.distro))]),
                );
                view.insert_if_absent(RosdepDefinition::new(
                    name.as_str(),
                    Value::Mapping(data),
                    format!("rosdistro/{}", coordinate.distro),
                ));
            }
        }

        debug!("View for {coordinate} holds {} keys", view.len());
        Ok(view)
    }
}
