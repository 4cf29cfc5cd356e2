// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Build database index: which targets live in which project.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::repo::{is_under, RepoProjects};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./module_info_test.rs"]
mod module_info_test;

/// One target entry of a `module-info.json` file; other keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct ModuleEntry {
    #[serde(default)]
    path: Vec<String>,
}

/// Options for building the module-info index.
#[derive(Debug, Clone, Default)]
pub struct ModuleInfoOptions {
    /// Path prefixes skipped instead of validated, e.g. generated output
    /// directories such as `out`.
    pub ignored_prefixes: Vec<String>,
}

impl ModuleInfoOptions {
    fn is_ignored(&self, path: &str) -> bool {
        self.ignored_prefixes
            .iter()
            .any(|prefix| is_under(path, prefix))
    }
}

/// Mapping from project name to the build targets whose sources it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    targets_by_project: BTreeMap<String, BTreeSet<String>>,
}

impl ModuleInfo {
    /// Build the index from module-info JSON.
    ///
    /// Every target path must resolve to a listed project; the first one
    /// that does not (in target name order) fails with
    /// [`Error::InconsistentIndex`].
    pub fn parse(
        json: &str,
        repo_projects: &RepoProjects,
        options: &ModuleInfoOptions,
    ) -> Result<Self> {
        let entries: BTreeMap<String, ModuleEntry> =
            serde_json::from_str(json).map_err(|error| Error::InvalidModuleInfo { error })?;

        let mut info = Self::default();
        let mut skipped = 0usize;
        for (target, entry) in &entries {
            for path in &entry.path {
                if options.is_ignored(path) {
                    skipped += 1;
                    continue;
                }

                let project =
                    repo_projects
                        .scan(path)
                        .ok_or_else(|| Error::InconsistentIndex {
                            target: target.clone(),
                            path: path.clone(),
                        })?;

                info.targets_by_project
                    .entry(project.to_string())
                    .or_default()
                    .insert(target.clone());
            }
        }

        tracing::debug!(
            targets = entries.len(),
            projects = info.targets_by_project.len(),
            skipped,
            "indexed module-info"
        );
        Ok(info)
    }

    /// Load module-info from file path.
    pub fn load<P: AsRef<Path>>(
        path: P,
        repo_projects: &RepoProjects,
        options: &ModuleInfoOptions,
    ) -> Result<Self> {
        let json = crate::error::read_to_string(path.as_ref())?;
        Self::parse(&json, repo_projects, options)
    }

    /// Targets with sources in `project`.
    pub fn targets(&self, project: &str) -> Option<&BTreeSet<String>> {
        self.targets_by_project.get(project)
    }

    /// Projects holding at least one target, in name order.
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.targets_by_project.keys().map(String::as_str)
    }

    /// Projects holding any of `targets`.
    pub fn projects_for_targets<S: AsRef<str>>(&self, targets: &[S]) -> BTreeSet<String> {
        self.targets_by_project
            .iter()
            .filter(|(_, owned)| targets.iter().any(|t| owned.contains(t.as_ref())))
            .map(|(project, _)| project.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.targets_by_project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets_by_project.is_empty()
    }

    /// Borrow the underlying project → targets map.
    pub fn as_map(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.targets_by_project
    }
}
