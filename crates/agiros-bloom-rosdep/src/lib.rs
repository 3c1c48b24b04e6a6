//! Rosdep key resolution
//!
//! A [`KeyResolver`] turns rosdep keys into platform package names using
//! per-coordinate [`View`]s held in a [`ResolutionCache`]. The
//! [`DependencyResolver`] drives it for a whole package: failed keys may be
//! retried after refreshing the rosdep data (when the caller's
//! [`RetryPrompt`] agrees) and finally go through a [`FallbackResolver`].

pub mod cache;
pub mod error;
pub mod fallback;
pub mod installer;
pub mod orchestrator;
pub mod refresh;
pub mod resolver;
pub mod rules;
pub mod view;

pub use cache::{CachedOutcome, ResolutionCache};
pub use error::{Result, RosdepError};
pub use fallback::{DefaultFallback, FallbackResolver};
pub use installer::{Installer, InstallerContext, PackageManagerInstaller};
pub use orchestrator::{DependencyResolver, RetryPolicy};
pub use refresh::{CommandRefresher, DataRefresher, NoRefresh, NonInteractive, RetryPrompt};
pub use resolver::{KeyResolver, ResolvedAnswer};
pub use rules::{RosdepDefinition, SelectedRule};
pub use view::{SourcesViewProvider, View, ViewProvider};
