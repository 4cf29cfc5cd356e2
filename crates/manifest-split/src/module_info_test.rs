// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use rstest::rstest;
use tempfile::TempDir;

use super::*;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[rstest]
fn test_get_module_info() {
    let json = r#"{
        "target1a": { "path": ["system/project1"] },
        "target1b": { "path": ["system/project1"] },
        "target3": { "path": ["vendor/google/project3"] }
    }"#;
    let repo_projects: RepoProjects = [
        ("system/project1", "platform/project1"),
        ("vendor/google/project3", "vendor/project3"),
    ]
    .into_iter()
    .collect();

    let info = ModuleInfo::parse(json, &repo_projects, &ModuleInfoOptions::default())
        .expect("Should index module-info");

    let expected: BTreeMap<String, BTreeSet<String>> = [
        ("platform/project1".to_string(), set(&["target1a", "target1b"])),
        ("vendor/project3".to_string(), set(&["target3"])),
    ]
    .into_iter()
    .collect();
    assert_eq!(info.as_map(), &expected);
}

#[rstest]
fn test_unknown_module_path_is_fatal() {
    let json = r#"{ "target1": { "path": ["system/unknown/project1"] } }"#;
    let result = ModuleInfo::parse(json, &RepoProjects::new(), &ModuleInfoOptions::default());

    match result {
        Err(Error::InconsistentIndex { target, path }) => {
            assert_eq!(target, "target1");
            assert_eq!(path, "system/unknown/project1");
        }
        other => panic!("Expected InconsistentIndex, got: {:?}", other),
    }
}

#[rstest]
fn test_output_path_raises_unless_ignored() {
    let json = r#"{
        "t1": { "path": ["system/project1/f.h"] },
        "t2": { "path": ["out/f.h"] }
    }"#;
    let repo_projects: RepoProjects = [("system/project1", "platform/project1")]
        .into_iter()
        .collect();

    match ModuleInfo::parse(json, &repo_projects, &ModuleInfoOptions::default()) {
        Err(Error::InconsistentIndex { target, path }) => {
            assert_eq!(target, "t2");
            assert_eq!(path, "out/f.h");
        }
        other => panic!("Expected InconsistentIndex, got: {:?}", other),
    }

    let options = ModuleInfoOptions {
        ignored_prefixes: vec!["out".to_string()],
    };
    let info = ModuleInfo::parse(json, &repo_projects, &options).expect("Should skip out/");
    assert_eq!(info.targets("platform/project1"), Some(&set(&["t1"])));
    assert_eq!(info.len(), 1);
}

#[rstest]
fn test_prefix_match_is_segment_wise() {
    let json = r#"{ "t": { "path": ["system/project1x/a.c"] } }"#;
    let repo_projects: RepoProjects = [("system/project1", "platform/project1")]
        .into_iter()
        .collect();

    let result = ModuleInfo::parse(json, &repo_projects, &ModuleInfoOptions::default());
    assert!(matches!(result, Err(Error::InconsistentIndex { .. })));
}

#[rstest]
fn test_target_spanning_projects_and_extra_keys() {
    let json = r#"{
        "libfoo": {
            "class": ["SHARED_LIBRARIES"],
            "path": ["external/foo", "external/foo/sub/gen"],
            "installed": ["out/target/lib/libfoo.so"]
        },
        "phony": { "class": ["FAKE"] }
    }"#;
    let repo_projects: RepoProjects = [
        ("external/foo", "platform/external/foo"),
        ("external/foo/sub", "platform/external/foo-sub"),
    ]
    .into_iter()
    .collect();

    let info = ModuleInfo::parse(json, &repo_projects, &ModuleInfoOptions::default()).unwrap();
    assert_eq!(
        info.projects().collect::<Vec<_>>(),
        vec!["platform/external/foo", "platform/external/foo-sub"]
    );
    assert_eq!(
        info.projects_for_targets(&["libfoo"]),
        set(&["platform/external/foo", "platform/external/foo-sub"])
    );
    assert!(info.projects_for_targets(&["phony"]).is_empty());
}

#[rstest]
#[case("[1, 2]")]
#[case("{ \"t\": { \"path\": \"not-a-list\" } }")]
#[case("{ broken")]
fn test_invalid_module_info(#[case] json: &str) {
    let result = ModuleInfo::parse(json, &RepoProjects::new(), &ModuleInfoOptions::default());
    assert!(matches!(result, Err(Error::InvalidModuleInfo { .. })));
}

#[rstest]
fn test_load_module_info_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("module-info.json");
    std::fs::write(&path, r#"{ "t": { "path": ["a"] } }"#).unwrap();
    let repo_projects: RepoProjects = [("a", "platform/a")].into_iter().collect();

    let info = ModuleInfo::load(&path, &repo_projects, &ModuleInfoOptions::default()).unwrap();
    assert_eq!(info.targets("platform/a"), Some(&set(&["t"])));
}
