//! Read-only access to a rosdistro index
//!
//! The index lists distributions; each distribution file maps source
//! repositories to the packages released from them. The resolver and the
//! generators consume the resulting [`DistributionDescriptor`]s through the
//! [`DescriptorSource`] trait.

pub mod distribution;
pub mod error;
pub mod index;
pub mod source;

pub use distribution::{DistributionDescriptor, DistributionFile, ReleasedPackage};
pub use error::{Result, RosdistroError};
pub use index::{DistributionType, IndexEntry, IndexFile, MIN_INDEX_VERSION};
pub use source::{check_index_version, DescriptorSource, LocalIndex, StaticSource};
