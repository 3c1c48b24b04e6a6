//! Fallback resolution for keys the rosdep data cannot resolve

use std::collections::BTreeSet;

use crate::error::{Result, RosdepError};

/// Last resort for a key that stayed unresolved
pub trait FallbackResolver {
    /// Package names for `key`, given the peer packages released together
    fn resolve_fallback(&self, key: &str, peers: &BTreeSet<String>) -> Result<Vec<String>>;
}

impl<F> FallbackResolver for F
where
    F: Fn(&str, &BTreeSet<String>) -> Result<Vec<String>>,
{
    fn resolve_fallback(&self, key: &str, peers: &BTreeSet<String>) -> Result<Vec<String>> {
        self(key, peers)
    }
}

/// Fallback that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFallback;

impl FallbackResolver for DefaultFallback {
    fn resolve_fallback(&self, key: &str, _peers: &BTreeSet<String>) -> Result<Vec<String>> {
        Err(RosdepError::key_not_found(key))
    }
}
