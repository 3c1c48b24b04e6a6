use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::sync::{Arc, Mutex};

use agiros_bloom_core::{package_name, PlatformCoordinate};
use agiros_bloom_rosdep::{
    DataRefresher, DefaultFallback, DependencyResolver, KeyResolver, NoRefresh, NonInteractive,
    Result, RetryPolicy, RosdepDefinition, RosdepError, SourcesViewProvider, View, ViewProvider,
};
use agiros_bloom_rosdistro::{DistributionDescriptor, DistributionType, StaticSource};
use tempfile::TempDir;

/// View provider that serves rules from a shared map and records every fetch
#[derive(Clone, Default)]
struct MockProvider {
    rules: Arc<Mutex<BTreeMap<String, String>>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    fn with_rule(self, key: &str, yaml: &str) -> Self {
        self.set_rule(key, yaml);
        self
    }

    fn set_rule(&self, key: &str, yaml: &str) {
        self.rules.lock().unwrap().insert(key.to_string(), yaml.to_string());
    }

    fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

impl ViewProvider for MockProvider {
    fn fetch_view(&self, coordinate: &PlatformCoordinate) -> Result<View> {
        self.fetches.lock().unwrap().push(coordinate.to_string());
        let mut view = View::new();
        for (key, yaml) in self.rules.lock().unwrap().iter() {
            view.insert_if_absent(RosdepDefinition::new(
                key.as_str(),
                serde_yaml::from_str(yaml).unwrap(),
                "mock",
            ));
        }
        Ok(view)
    }
}

/// Refresher that records calls and optionally installs a rule when run
#[derive(Default)]
struct MockRefresher {
    calls: Arc<Mutex<u32>>,
    on_refresh: Option<(MockProvider, String, String)>,
    fail: bool,
}

impl DataRefresher for MockRefresher {
    fn refresh(&self) -> Result<()> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(RosdepError::refresh_failed("network unreachable"));
        }
        if let Some((provider, key, yaml)) = &self.on_refresh {
            provider.set_rule(key, yaml);
        }
        Ok(())
    }
}

fn noble() -> PlatformCoordinate {
    PlatformCoordinate::new("ubuntu", "noble", "loong")
}

fn no_peers() -> BTreeSet<String> {
    BTreeSet::new()
}

#[test]
fn test_resolve_and_cache() {
    let provider = MockProvider::default().with_rule("libfoo", "ubuntu: [libfoo-dev]");
    let resolver = KeyResolver::new(provider.clone());

    let first = resolver.resolve("libfoo", &noble()).unwrap();
    assert_eq!(first.package_names, vec!["libfoo-dev"]);
    assert_eq!(first.installer_key, "apt");
    assert_eq!(first.default_installer_key, "apt");

    // Changing the underlying data does not affect cached answers
    provider.set_rule("libfoo", "ubuntu: [libfoo2-dev]");
    let second = resolver.resolve("libfoo", &noble()).unwrap();
    assert_eq!(first, second);
    assert_eq!(provider.fetch_count(), 1);

    resolver.invalidate();
    let third = resolver.resolve("libfoo", &noble()).unwrap();
    assert_eq!(third.package_names, vec!["libfoo2-dev"]);
    assert_eq!(provider.fetch_count(), 2);
}

#[test]
fn test_unresolved_outcome_is_cached() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider.clone());

    assert!(matches!(resolver.resolve("missing", &noble()), Err(RosdepError::KeyNotFound { .. })));
    provider.set_rule("missing", "ubuntu: [now-there]");
    assert!(matches!(resolver.resolve("missing", &noble()), Err(RosdepError::KeyNotFound { .. })));
    assert_eq!(resolver.cache().answer_count(), 1);
}

#[test]
fn test_empty_rule_is_unresolved() {
    let provider = MockProvider::default().with_rule("empty", "ubuntu: []");
    let resolver = KeyResolver::new(provider);
    assert!(matches!(
        resolver.resolve("empty", &noble()),
        Err(RosdepError::NoRuleForPlatform { .. })
    ));
}

#[test]
fn test_empty_key_set_makes_no_calls() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider.clone());
    let refresher = MockRefresher::default();
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &NonInteractive);

    let answers = orchestrator
        .resolve_all(Vec::<String>::new(), &noble(), &no_peers(), &DefaultFallback)
        .unwrap();
    assert!(answers.is_empty());
    assert_eq!(provider.fetch_count(), 0);
    assert_eq!(*refresher.calls.lock().unwrap(), 0);
}

#[test]
fn test_duplicate_keys_resolve_once() {
    let provider = MockProvider::default()
        .with_rule("libfoo", "ubuntu: [libfoo-dev]")
        .with_rule("python3", "ubuntu: python3");
    let resolver = KeyResolver::new(provider.clone());
    let orchestrator = DependencyResolver::new(&resolver, &NoRefresh, &NonInteractive);

    let answers = orchestrator
        .resolve_all(["libfoo", "python3", "libfoo"], &noble(), &no_peers(), &DefaultFallback)
        .unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers["python3"].package_names, vec!["python3"]);
    assert_eq!(provider.fetch_count(), 1);
}

#[test]
fn test_refresh_then_resolve() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider.clone());
    let refresher = MockRefresher {
        on_refresh: Some((provider.clone(), "libnew".to_string(), "ubuntu: [libnew1]".to_string())),
        ..MockRefresher::default()
    };
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&prompts);
    let prompt = move |key: &str, _error: &RosdepError| {
        recorder.lock().unwrap().push(key.to_string());
        true
    };
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &prompt);

    let answer = orchestrator.resolve_key("libnew", &noble(), &no_peers(), &DefaultFallback).unwrap();
    assert_eq!(answer.package_names, vec!["libnew1"]);
    assert_eq!(*refresher.calls.lock().unwrap(), 1);
    assert_eq!(*prompts.lock().unwrap(), vec!["libnew"]);
}

#[test]
fn test_refreshes_are_bounded() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider);
    let refresher = MockRefresher::default();
    let always = |_key: &str, _error: &RosdepError| true;
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &always)
        .with_policy(RetryPolicy { max_refreshes: 3 });

    let result = orchestrator.resolve_key("ghost", &noble(), &no_peers(), &DefaultFallback);
    assert_eq!(*refresher.calls.lock().unwrap(), 3);
    match result {
        Err(RosdepError::Unresolvable { key, cause }) => {
            assert_eq!(key, "ghost");
            assert!(matches!(*cause, RosdepError::KeyNotFound { .. }));
        }
        other => panic!("expected Unresolvable, got {other:?}"),
    }
}

#[test]
fn test_declined_prompt_goes_to_fallback() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider);
    let refresher = MockRefresher::default();
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &NonInteractive);

    let fallback = |key: &str, _peers: &BTreeSet<String>| -> Result<Vec<String>> {
        Ok(vec![format!("vendored-{key}")])
    };
    let answer = orchestrator.resolve_key("ghost", &noble(), &no_peers(), &fallback).unwrap();
    assert_eq!(answer.package_names, vec!["vendored-ghost"]);
    assert_eq!(answer.installer_key, "apt");
    assert_eq!(*refresher.calls.lock().unwrap(), 0);
}

#[test]
fn test_peer_skips_prompt() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider);
    let refresher = MockRefresher::default();
    let asked = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&asked);
    let prompt = move |_key: &str, _error: &RosdepError| {
        *counter.lock().unwrap() += 1;
        true
    };
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &prompt);

    let peers: BTreeSet<String> = ["my_msgs".to_string()].into_iter().collect();
    let fallback = |key: &str, peers: &BTreeSet<String>| -> Result<Vec<String>> {
        if peers.contains(key) {
            Ok(vec![package_name(key, "loong")])
        } else {
            Err(RosdepError::key_not_found(key))
        }
    };

    let answers = orchestrator.resolve_all(["my_msgs"], &noble(), &peers, &fallback).unwrap();
    assert_eq!(answers["my_msgs"].package_names, vec!["agiros-loong-my-msgs"]);
    assert_eq!(*asked.lock().unwrap(), 0);
    assert_eq!(*refresher.calls.lock().unwrap(), 0);
}

#[test]
fn test_invalid_installer_not_retried() {
    let provider = MockProvider::default().with_rule("weird", "ubuntu:\n  dnf: [weird]\n");
    let resolver = KeyResolver::new(provider);
    let refresher = MockRefresher::default();
    let always = |_key: &str, _error: &RosdepError| true;
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &always);

    let result = orchestrator.resolve_key("weird", &noble(), &no_peers(), &DefaultFallback);
    assert!(matches!(result, Err(RosdepError::InvalidInstaller { .. })));
    assert_eq!(result.unwrap_err().exit_class().code(), 33);
    assert_eq!(*refresher.calls.lock().unwrap(), 0);
}

#[test]
fn test_refresh_failure_aborts() {
    let provider = MockProvider::default();
    let resolver = KeyResolver::new(provider);
    let refresher = MockRefresher { fail: true, ..MockRefresher::default() };
    let always = |_key: &str, _error: &RosdepError| true;
    let orchestrator = DependencyResolver::new(&resolver, &refresher, &always);

    let result = orchestrator.resolve_key("ghost", &noble(), &no_peers(), &DefaultFallback);
    assert!(matches!(result, Err(RosdepError::RefreshFailed { .. })));
}

#[test]
fn test_partial_failure_keeps_resolved_answers() {
    let provider = MockProvider::default().with_rule("libfoo", "ubuntu: [libfoo-dev]");
    let resolver = KeyResolver::new(provider.clone());
    let orchestrator = DependencyResolver::new(&resolver, &NoRefresh, &NonInteractive);

    let result =
        orchestrator.resolve_all(["libfoo", "zzz_missing"], &noble(), &no_peers(), &DefaultFallback);
    assert!(result.is_err());
    assert!(resolver.cache().answer("libfoo", &noble()).is_some());
    assert!(resolver.resolve("libfoo", &noble()).is_ok());
    assert_eq!(provider.fetch_count(), 1);
}

#[test]
fn test_sources_view_provider() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("base.yaml");
    let overlay = temp_dir.path().join("overlay.yaml");
    fs::write(&base, "libfoo:\n  ubuntu: [libfoo-base]\nboost:\n  ubuntu: [libboost-all-dev]\n")
        .unwrap();
    fs::write(&overlay, "libfoo:\n  ubuntu: [libfoo-overlay]\n").unwrap();

    let descriptors = StaticSource::new(4).with_distribution(
        DistributionDescriptor::new("loong", DistributionType::Ros2)
            .with_package("rclcpp", "rclcpp", Some("28.1.0-1"))
            .with_package("boost", "boost", None),
    );
    let provider = SourcesViewProvider::new(vec![overlay, base])
        .with_descriptor_source(Arc::new(descriptors));
    let resolver = KeyResolver::new(provider);

    assert_eq!(resolver.resolve("libfoo", &noble()).unwrap().package_names, vec!["libfoo-overlay"]);
    assert_eq!(
        resolver.resolve("rclcpp", &noble()).unwrap().package_names,
        vec!["agiros-loong-rclcpp"]
    );
    // Rule files win over released packages
    assert_eq!(resolver.resolve("boost", &noble()).unwrap().package_names, vec!["libboost-all-dev"]);
}

#[test]
fn test_missing_rule_file_is_tooling_failure() {
    let temp_dir = TempDir::new().unwrap();
    let provider = SourcesViewProvider::new(vec![temp_dir.path().join("absent.yaml")]);
    let resolver = KeyResolver::new(provider);

    assert!(matches!(resolver.resolve("libfoo", &noble()), Err(RosdepError::Tooling { .. })));
    assert_eq!(resolver.cache().answer_count(), 0);
}
