//! Resolution cache

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use agiros_bloom_core::PlatformCoordinate;
use tracing::debug;

use crate::error::{Result, RosdepError};
use crate::resolver::ResolvedAnswer;
use crate::view::View;

/// Cached outcome of resolving one key
pub type CachedOutcome = std::result::Result<ResolvedAnswer, RosdepError>;

#[derive(Debug, Default)]
struct CacheState {
    views: HashMap<PlatformCoordinate, Arc<View>>,
    answers: HashMap<(String, PlatformCoordinate), CachedOutcome>,
}

/// Views and answers per platform coordinate
///
/// Entries never change once stored; the only way to drop them is
/// [`invalidate_all`](Self::invalidate_all). Every operation holds the lock,
/// so no lookup interleaves with an invalidation.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    state: Mutex<CacheState>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached view of a coordinate, fetched and stored on first use
    pub fn view_or_fetch<F>(&self, coordinate: &PlatformCoordinate, fetch: F) -> Result<Arc<View>>
    where
        F: FnOnce() -> Result<View>,
    {
        let mut state = self.lock();
        if let Some(view) = state.views.get(coordinate) {
            return Ok(Arc::clone(view));
        }

        let view = Arc::new(fetch()?);
        state.views.insert(coordinate.clone(), Arc::clone(&view));
        Ok(view)
    }

    /// Cached outcome for a key
    pub fn answer(&self, key: &str, coordinate: &PlatformCoordinate) -> Option<CachedOutcome> {
        self.lock().answers.get(&(key.to_string(), coordinate.clone())).cloned()
    }

    /// Store an outcome; an existing entry is kept
    pub fn store_answer(&self, key: &str, coordinate: &PlatformCoordinate, outcome: CachedOutcome) {
        self.lock().answers.entry((key.to_string(), coordinate.clone())).or_insert(outcome);
    }

    /// Drop every view and answer
    pub fn invalidate_all(&self) {
        let mut state = self.lock();
        debug!(
            "Invalidating {} views and {} answers",
            state.views.len(),
            state.answers.len()
        );
        state.views.clear();
        state.answers.clear();
    }

    pub fn view_count(&self) -> usize {
        self.lock().views.len()
    }

    pub fn answer_count(&self) -> usize {
        self.lock().answers.len()
    }
}
