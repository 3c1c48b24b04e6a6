use std::fs;
use std::path::Path;

use agiros_bloom_package::scan_workspace;
use tempfile::TempDir;

fn write_package(dir: &Path, name: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("package.xml"),
        format!(
            r#"<?xml version="1.0"?>
<package format="3">
  <name>{name}</name>
  <version>1.0.0</version>
  <description>Test package {name}</description>
  <maintainer email="test@test.com">Test</maintainer>
  <license>MIT</license>
</package>"#
        ),
    )
    .unwrap();
}

#[test]
fn test_scan_sorted_by_name() {
    let temp_dir = TempDir::new().unwrap();
    let src_dir = temp_dir.path().join("src");
    write_package(&src_dir.join("zeta"), "zeta_pkg");
    write_package(&src_dir.join("nested/alpha"), "alpha_pkg");

    let packages = scan_workspace(&src_dir).expect("Failed to scan workspace");
    let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alpha_pkg", "zeta_pkg"]);
}

#[test]
fn test_ignore_markers() {
    let temp_dir = TempDir::new().unwrap();
    let src_dir = temp_dir.path().join("src");

    write_package(&src_dir.join("package1"), "package1");

    let colcon_ignored = src_dir.join("package2");
    write_package(&colcon_ignored, "package2");
    fs::write(colcon_ignored.join("COLCON_IGNORE"), "").unwrap();

    let catkin_ignored = src_dir.join("package3");
    write_package(&catkin_ignored, "package3");
    fs::write(catkin_ignored.join("CATKIN_IGNORE"), "").unwrap();

    let packages = scan_workspace(&src_dir).expect("Failed to scan workspace");

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "package1");
}

#[test]
fn test_package_directory_itself() {
    let temp_dir = TempDir::new().unwrap();
    write_package(temp_dir.path(), "single_pkg");

    let packages = scan_workspace(temp_dir.path()).expect("Failed to scan package");
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "single_pkg");
}

#[test]
fn test_invalid_manifest_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let src_dir = temp_dir.path().join("src");
    write_package(&src_dir.join("good"), "good_pkg");

    let bad = src_dir.join("bad");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join("package.xml"), "<package><name>bad</name></package>").unwrap();

    let packages = scan_workspace(&src_dir).expect("Failed to scan workspace");
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].name, "good_pkg");
}
