use std::fs;
use std::path::Path;

use agiros_bloom_rosdistro::{
    check_index_version, DescriptorSource, DistributionDescriptor, DistributionType, LocalIndex,
    RosdistroError, StaticSource,
};
use tempfile::TempDir;

fn write_index(root: &Path, version: u32) {
    fs::write(
        root.join("index.yaml"),
        format!(
            r#"%YAML 1.1
---
distributions:
  loong:
    distribution: [loong/distribution.yaml]
    distribution_status: active
    distribution_type: ros2
    python_version: 3
type: index
version: {version}
"#
        ),
    )
    .unwrap();

    fs::create_dir_all(root.join("loong")).unwrap();
    fs::write(
        root.join("loong/distribution.yaml"),
        r#"release_platforms:
  ubuntu: [noble]
  openeuler: ['24.03']
repositories:
  aandd_ekew_driver_py:
    release:
      url: https://example.com/aandd_ekew_driver_py-release.git
      version: 0.0.2-1
    source:
      type: git
      url: https://example.com/aandd_ekew_driver_py.git
      version: master
  ros_workspace:
    release:
      version: 1.0.3-1
type: distribution
version: 2
"#,
    )
    .unwrap();
}

#[test]
fn test_open_and_list_distributions() {
    let temp_dir = TempDir::new().unwrap();
    write_index(temp_dir.path(), 4);

    let index = LocalIndex::open(temp_dir.path().join("index.yaml")).expect("index should load");
    assert_eq!(index.index_version(), 4);
    assert!(index.list_distributions().contains("loong"));
}

#[test]
fn test_distribution_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    write_index(temp_dir.path(), 4);

    let index = LocalIndex::open(temp_dir.path().join("index.yaml")).unwrap();
    let loong = index.distribution("loong").expect("loong should load");

    assert_eq!(loong.distribution_type, DistributionType::Ros2);
    assert!(loong.is_ros2());
    assert_eq!(loong.python_version, 3);
    assert_eq!(loong.release_platforms["ubuntu"], vec!["noble"]);
    assert!(loong.packages.contains_key("aandd_ekew_driver_py"));
    assert_eq!(loong.packages["ros_workspace"].version.as_deref(), Some("1.0.3-1"));
}

#[test]
fn test_unknown_distribution() {
    let temp_dir = TempDir::new().unwrap();
    write_index(temp_dir.path(), 4);

    let index = LocalIndex::open(temp_dir.path().join("index.yaml")).unwrap();
    assert!(matches!(
        index.distribution("jazzy"),
        Err(RosdistroError::UnknownDistribution { .. })
    ));
}

#[test]
fn test_old_index_version_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_index(temp_dir.path(), 3);

    let result = LocalIndex::open(temp_dir.path().join("index.yaml"));
    assert!(matches!(
        result,
        Err(RosdistroError::UnsupportedIndexVersion { found: 3, minimum: 4 })
    ));
}

#[test]
fn test_missing_index_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = LocalIndex::open(temp_dir.path().join("index.yaml"));
    assert!(matches!(result, Err(RosdistroError::Read { .. })));
}

#[test]
fn test_static_source() {
    let source = StaticSource::new(4).with_distribution(
        DistributionDescriptor::new("loong", DistributionType::Ros2).with_package(
            "rclcpp",
            "rclcpp",
            Some("28.1.0-1"),
        ),
    );

    assert!(check_index_version(&source).is_ok());
    assert!(source.distribution("loong").unwrap().packages.contains_key("rclcpp"));
    assert!(check_index_version(&StaticSource::new(2)).is_err());
}
