// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Project listing index and path-to-project resolution.
//!
//! The listing is the output of `repo list`: one `repo-path : project-name`
//! pair per line. Paths are resolved to projects by longest prefix, compared
//! on whole path segments so `system/project1x` never matches
//! `system/project1`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./repo_test.rs"]
mod repo_test;

/// Mapping from repository-relative checkout path to project name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoProjects {
    by_path: BTreeMap<String, String>,
}

/// The listing entry owning a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectMatch<'a> {
    pub repo_path: &'a str,
    pub project: &'a str,
}

impl RepoProjects {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a project listing.
    ///
    /// Blank lines are skipped. A repeated repo path replaces the earlier
    /// entry.
    pub fn parse(listing: &str) -> Result<Self> {
        let mut projects = Self::new();
        for (index, raw) in listing.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let invalid = || Error::InvalidRepoList {
                line: index + 1,
                content: raw.to_string(),
            };
            let (repo_path, project) = line.split_once(':').ok_or_else(invalid)?;
            let repo_path = normalize_repo_path(repo_path);
            let project = project.trim();
            if repo_path.is_empty() || project.is_empty() {
                return Err(invalid());
            }

            if let Some(previous) = projects.insert(repo_path, project) {
                tracing::warn!(
                    repo_path,
                    previous = %previous,
                    project,
                    "duplicate repo path in project listing, keeping the last entry"
                );
            }
        }

        tracing::debug!(count = projects.len(), "parsed project listing");
        Ok(projects)
    }

    /// Load a project listing from file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let listing = crate::error::read_to_string(path.as_ref())?;
        Self::parse(&listing)
    }

    /// Insert an entry, returning the project previously mapped at that path.
    pub fn insert<P: AsRef<str>, N: Into<String>>(
        &mut self,
        repo_path: P,
        project: N,
    ) -> Option<String> {
        let repo_path = normalize_repo_path(repo_path.as_ref()).to_string();
        self.by_path.insert(repo_path, project.into())
    }

    /// Exact lookup of a repo path.
    pub fn get(&self, repo_path: &str) -> Option<&str> {
        self.by_path
            .get(normalize_repo_path(repo_path))
            .map(String::as_str)
    }

    /// Reverse lookup: the repo path a project is checked out at.
    pub fn repo_path_of(&self, project: &str) -> Option<&str> {
        self.by_path
            .iter()
            .find(|(_, name)| name.as_str() == project)
            .map(|(path, _)| path.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Iterate `(repo_path, project)` pairs in repo path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path
            .iter()
            .map(|(path, project)| (path.as_str(), project.as_str()))
    }

    /// Find the entry whose repo path is the longest segment prefix of `path`.
    ///
    /// Walks the `/` boundaries of `path` from the longest candidate down, so
    /// nested projects resolve to the deepest one.
    pub fn find_owner<'a>(&'a self, path: &str) -> Option<ProjectMatch<'a>> {
        let mut candidate = path.trim_end_matches('/');
        loop {
            if let Some((repo_path, project)) = self.by_path.get_key_value(candidate) {
                return Some(ProjectMatch {
                    repo_path,
                    project,
                });
            }
            let (parent, _) = candidate.rsplit_once('/')?;
            candidate = parent;
        }
    }

    /// Project name owning `path`, if any.
    pub fn scan(&self, path: &str) -> Option<&str> {
        self.find_owner(path).map(|owner| owner.project)
    }
}

impl<P: AsRef<str>, N: Into<String>> FromIterator<(P, N)> for RepoProjects {
    fn from_iter<T: IntoIterator<Item = (P, N)>>(iter: T) -> Self {
        let mut projects = Self::new();
        for (repo_path, project) in iter {
            projects.insert(repo_path, project);
        }
        projects
    }
}

fn normalize_repo_path(repo_path: &str) -> &str {
    repo_path.trim().trim_end_matches('/')
}

/// True when `path` equals `prefix` or lies below it.
pub(crate) fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => !prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')),
        None => false,
    }
}
