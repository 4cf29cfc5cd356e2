// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Resolution of consumed input files to the projects holding them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::repo::RepoProjects;
use crate::Result;

#[cfg(test)]
#[path = "./inputs_test.rs"]
mod inputs_test;

/// Input files grouped by the project owning them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputProjects {
    /// Project name to the inputs that resolved to it.
    pub by_project: BTreeMap<String, BTreeSet<String>>,

    /// Inputs outside every listed project (build outputs, absolute paths).
    pub unresolved: BTreeSet<String>,
}

impl InputProjects {
    /// Resolve every input to its owning project.
    pub fn resolve<I, S>(repo_projects: &RepoProjects, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = Self::default();
        for input in inputs {
            let input = input.as_ref();
            match repo_projects.scan(input) {
                Some(project) => {
                    resolved
                        .by_project
                        .entry(project.to_string())
                        .or_default()
                        .insert(input.to_string());
                }
                None => {
                    resolved.unresolved.insert(input.to_string());
                }
            }
        }

        tracing::debug!(
            projects = resolved.by_project.len(),
            unresolved = resolved.unresolved.len(),
            "resolved input projects"
        );
        resolved
    }

    /// Names of every project reached by at least one input.
    pub fn project_names(&self) -> BTreeSet<String> {
        self.by_project.keys().cloned().collect()
    }

    /// Inputs that resolved to `project`.
    pub fn inputs_of(&self, project: &str) -> Option<&BTreeSet<String>> {
        self.by_project.get(project)
    }
}

/// Set of projects owning any of `inputs`; inputs owned by no project are
/// dropped.
pub fn get_input_projects<S: AsRef<str>>(
    repo_projects: &RepoProjects,
    inputs: &[S],
) -> BTreeSet<String> {
    inputs
        .iter()
        .filter_map(|input| repo_projects.scan(input.as_ref()))
        .map(String::from)
        .collect()
}

/// Parse an input list: one path per line, blank lines ignored.
pub fn parse_input_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read an input list file.
pub fn read_input_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = crate::error::read_to_string(path.as_ref())?;
    Ok(parse_input_list(&content))
}
