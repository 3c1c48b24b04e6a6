//! Workspace scanner

use std::path::Path;

use agiros_bloom_core::{PackageDescriptor, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::parser::parse_package_xml;

/// Marker files that exclude a directory subtree from scanning
const IGNORE_MARKERS: [&str; 3] = ["COLCON_IGNORE", "CATKIN_IGNORE", "AMENT_IGNORE"];

/// Scan a directory for ROS packages
///
/// A directory that itself contains a package.xml is returned as the single
/// package. Otherwise the tree is walked, skipping ignored subtrees.
pub fn scan_workspace(workspace_path: &Path) -> Result<Vec<PackageDescriptor>> {
    let manifest = workspace_path.join("package.xml");
    if manifest.is_file() {
        return Ok(vec![parse_package_xml(&manifest)?]);
    }

    let mut packages = Vec::new();
    let walker = WalkDir::new(workspace_path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !(e.path().is_dir() && is_ignored(e.path())));

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();

        if path.file_name() == Some(std::ffi::OsStr::new("package.xml")) {
            match parse_package_xml(path) {
                Ok(package) => {
                    debug!("Found package {} at {}", package.name, path.display());
                    packages.push(package);
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }
    }

    // Sort packages by name for consistent ordering
    packages.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(packages)
}

fn is_ignored(dir: &Path) -> bool {
    IGNORE_MARKERS.iter().any(|marker| dir.join(marker).exists())
}
