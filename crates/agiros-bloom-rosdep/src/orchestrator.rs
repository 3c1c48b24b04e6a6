//! Resolving a set of keys with confirm-gated refresh and fallback

use std::collections::{BTreeMap, BTreeSet};

use agiros_bloom_core::PlatformCoordinate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, RosdepError};
use crate::fallback::FallbackResolver;
use crate::refresh::{DataRefresher, RetryPrompt};
use crate::resolver::{KeyResolver, ResolvedAnswer};

/// Configuration for refresh-and-retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of refreshes per key
    pub max_refreshes: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_refreshes: 2 }
    }
}

/// Resolves every dependency key of a package
pub struct DependencyResolver<'a> {
    resolver: &'a KeyResolver,
    refresher: &'a dyn DataRefresher,
    prompt: &'a dyn RetryPrompt,
    policy: RetryPolicy,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        resolver: &'a KeyResolver,
        refresher: &'a dyn DataRefresher,
        prompt: &'a dyn RetryPrompt,
    ) -> Self {
        Self { resolver, refresher, prompt, policy: RetryPolicy::default() }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve all keys; duplicates resolve once
    ///
    /// Results are only returned when every key resolved. Keys in `peers`
    /// are released together with the package and go straight to the
    /// fallback when the rosdep data does not know them.
    pub fn resolve_all<I, S>(
        &self,
        keys: I,
        coordinate: &PlatformCoordinate,
        peers: &BTreeSet<String>,
        fallback: &dyn FallbackResolver,
    ) -> Result<BTreeMap<String, ResolvedAnswer>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        let mut answers = BTreeMap::new();

        for key in unique {
            let answer = self.resolve_key(&key, coordinate, peers, fallback)?;
            answers.insert(key, answer);
        }
        Ok(answers)
    }

    /// Resolve one key with the bounded refresh loop
    pub fn resolve_key(
        &self,
        key: &str,
        coordinate: &PlatformCoordinate,
        peers: &BTreeSet<String>,
        fallback: &dyn FallbackResolver,
    ) -> Result<ResolvedAnswer> {
        let mut refreshes = 0u32;

        let last_error = loop {
            let error = match self.resolver.resolve(key, coordinate) {
                Ok(answer) => {
                    if refreshes > 0 {
                        info!("Resolved '{key}' after {refreshes} refreshes");
                    }
                    return Ok(answer);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                debug!("Error is not retryable: {error}");
                return Err(error);
            }

            if peers.contains(key) {
                debug!("'{key}' is a peer package, skipping refresh");
                break error;
            }

            if refreshes >= self.policy.max_refreshes {
                warn!("Max refreshes ({}) reached for '{key}'", self.policy.max_refreshes);
                break error;
            }

            if !self.prompt.confirm_retry(key, &error) {
                break error;
            }

            self.refresher.refresh()?;
            self.resolver.invalidate();
            refreshes += 1;
        };

        match fallback.resolve_fallback(key, peers) {
            Ok(names) if !names.is_empty() => {
                let default = self.resolver.context().default_installer_key(&coordinate.os_name)?;
                info!("Resolved '{key}' to {names:?} by fallback");
                Ok(ResolvedAnswer::new(names, default, default))
            }
            outcome => {
                if let Err(e) = outcome {
                    debug!("Fallback for '{key}' failed: {e}");
                }
                Err(RosdepError::Unresolvable { key: key.to_string(), cause: Box::new(last_error) })
            }
        }
    }
}
