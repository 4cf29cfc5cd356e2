// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use rstest::rstest;
use tempfile::TempDir;

use super::*;

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[rstest]
fn test_read_config() {
    let xml = r#"
        <config>
          <add_project name="add1" />
          <add_project name="add2" />
          <remove_project name="remove1" />
          <remove_project name="remove2" />
        </config>"#;
    let config = SplitConfig::from_xml(xml).expect("Should parse config");

    assert_eq!(config.add_projects, names(&["add1", "add2"]));
    assert_eq!(config.remove_projects, names(&["remove1", "remove2"]));
}

#[rstest]
fn test_interleaved_elements() {
    let xml = r#"
        <config>
          <remove_project name="remove1" />
          <add_project name="add1" />
          <remove_project name="remove2" />
          <add_project name="add2" />
        </config>"#;
    let config = SplitConfig::from_xml(xml).expect("Should parse interleaved config");

    assert_eq!(config.add_projects, names(&["add1", "add2"]));
    assert_eq!(config.remove_projects, names(&["remove1", "remove2"]));
}

#[rstest]
#[case("<config></config>")]
#[case("<config/>")]
fn test_empty_config(#[case] xml: &str) {
    let config = SplitConfig::from_xml(xml).expect("Should parse empty config");
    assert!(config.is_empty());
}

#[rstest]
fn test_overlapping_sets_are_kept() {
    let xml = r#"<config><add_project name="p" /><remove_project name="p" /></config>"#;
    let config = SplitConfig::from_xml(xml).unwrap();

    assert!(config.add_projects.contains("p"));
    assert!(config.remove_projects.contains("p"));
}

#[rstest]
#[case("<config><add_project name=\"a\"></config>")]
#[case("<config><add_project /></config>")]
fn test_invalid_config(#[case] xml: &str) {
    match SplitConfig::from_xml(xml) {
        Err(Error::InvalidConfig { .. }) => {}
        other => panic!("Expected InvalidConfig, got: {:?}", other),
    }
}

#[rstest]
fn test_load_all_merges_files() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("first.xml");
    let second = tmp.path().join("second.xml");
    std::fs::write(&first, r#"<config><add_project name="a" /></config>"#).unwrap();
    std::fs::write(
        &second,
        r#"<config><add_project name="b" /><remove_project name="c" /></config>"#,
    )
    .unwrap();

    let config = SplitConfig::load_all(&[first, second]).expect("Should load configs");
    assert_eq!(config.add_projects, names(&["a", "b"]));
    assert_eq!(config.remove_projects, names(&["c"]));
}

#[rstest]
fn test_load_all_without_files() {
    let config = SplitConfig::load_all::<&str>(&[]).unwrap();
    assert_eq!(config, SplitConfig::default());
}
