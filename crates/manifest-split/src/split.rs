// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end split: load every index, resolve projects, filter and hash.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::SplitConfig;
use crate::hash::{append_manifest_hash, remove_manifest_hash};
use crate::inputs::InputProjects;
use crate::manifest::{update_manifest, Manifest};
use crate::module_info::{ModuleInfo, ModuleInfoOptions};
use crate::repo::RepoProjects;
use crate::Result;

#[cfg(test)]
#[path = "./split_test.rs"]
mod split_test;

/// Hash element name used when neither the caller nor the manifest path
/// provides one.
const DEFAULT_MANIFEST_NAME: &str = "default.xml";

/// Locations of every file a split reads.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Override configs, merged in order.
    pub config_files: Vec<PathBuf>,

    /// Project listing (`repo-path : project-name` lines).
    pub repo_list: PathBuf,

    /// Optional module-info database, validated against the listing.
    pub module_info: Option<PathBuf>,

    /// Manifest to split.
    pub manifest: PathBuf,

    /// Name recorded in the hash element (default: manifest file name).
    pub manifest_name: Option<String>,

    /// Module-info path prefixes skipped during validation.
    pub ignored_prefixes: Vec<String>,
}

impl SplitOptions {
    fn hash_name(&self) -> String {
        self.manifest_name.clone().unwrap_or_else(|| {
            self.manifest
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_MANIFEST_NAME.to_string())
        })
    }

    /// Every file this split reads, in load order.
    pub fn source_files(&self) -> Vec<PathBuf> {
        let mut sources = self.config_files.clone();
        sources.push(self.repo_list.clone());
        sources.extend(self.module_info.iter().cloned());
        sources.push(self.manifest.clone());
        sources
    }
}

/// Non-fatal conditions worth surfacing to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitWarning {
    /// No project survived; usually a misconfigured target list.
    EmptyProjectSet,
    /// Forced-in projects with no entry in the manifest.
    UnknownProjects(Vec<String>),
    /// Number of inputs owned by no listed project.
    UnresolvedInputs(usize),
}

impl std::fmt::Display for SplitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitWarning::EmptyProjectSet => {
                write!(f, "no projects remain in the split manifest")
            }
            SplitWarning::UnknownProjects(names) => write!(
                f,
                "added projects not present in the manifest: {}",
                names.join(", ")
            ),
            SplitWarning::UnresolvedInputs(count) => {
                write!(f, "{count} input(s) are not in any listed project")
            }
        }
    }
}

/// Result of a split.
#[derive(Debug, Clone)]
pub struct ManifestSplit {
    /// Filtered manifest with its trailing hash element.
    pub manifest: Manifest,

    /// Digest recorded in the hash element.
    pub digest: String,

    /// Projects reached by the inputs, with attribution.
    pub input_projects: InputProjects,

    /// Projects kept: `(inputs ∪ added) − removed`.
    pub projects: BTreeSet<String>,

    /// Effective override config.
    pub config: SplitConfig,

    /// Source manifest projects that were filtered out.
    pub dropped: Vec<String>,

    /// Build database index, when one was loaded.
    pub module_info: Option<ModuleInfo>,

    /// Listing the inputs were resolved against.
    pub repo_projects: RepoProjects,

    pub warnings: Vec<SplitWarning>,
}

impl ManifestSplit {
    /// Write the split manifest.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.manifest.save(path)?;
        tracing::info!(path = %path.display(), digest = %self.digest, "wrote split manifest");
        Ok(())
    }

    fn dropped_from(&self, source: &Manifest) -> Vec<String> {
        source
            .project_names()
            .into_iter()
            .filter(|name| !self.projects.contains(*name))
            .map(String::from)
            .collect()
    }
}

/// `(input_projects ∪ add_projects) − remove_projects`.
pub fn resolve_projects(
    input_projects: &BTreeSet<String>,
    config: &SplitConfig,
) -> BTreeSet<String> {
    input_projects
        .union(&config.add_projects)
        .filter(|name| !config.remove_projects.contains(*name))
        .cloned()
        .collect()
}

/// Load every input named by `options` and split the manifest.
///
/// All indexes are built before the manifest is touched, so any
/// configuration error aborts without producing output.
pub fn split_manifest<S: AsRef<str>>(
    options: &SplitOptions,
    inputs: &[S],
) -> Result<ManifestSplit> {
    let config = SplitConfig::load_all(&options.config_files)?;
    let repo_projects = RepoProjects::load(&options.repo_list)?;

    // An inconsistent build database is fatal even though the index only
    // feeds the report.
    let module_info = match &options.module_info {
        Some(path) => {
            let module_options = ModuleInfoOptions {
                ignored_prefixes: options.ignored_prefixes.clone(),
            };
            Some(ModuleInfo::load(path, &repo_projects, &module_options)?)
        }
        None => None,
    };

    let manifest = Manifest::load(&options.manifest)?;
    let mut split = split_loaded(
        &manifest,
        &repo_projects,
        config,
        inputs,
        &options.hash_name(),
    );
    split.module_info = module_info;
    Ok(split)
}

/// Split an already loaded manifest. Pure apart from logging.
pub fn split_loaded<S: AsRef<str>>(
    manifest: &Manifest,
    repo_projects: &RepoProjects,
    config: SplitConfig,
    inputs: &[S],
    manifest_name: &str,
) -> ManifestSplit {
    let input_projects = InputProjects::resolve(repo_projects, inputs);
    let projects = resolve_projects(&input_projects.project_names(), &config);

    let mut warnings = Vec::new();
    if !input_projects.unresolved.is_empty() {
        warnings.push(SplitWarning::UnresolvedInputs(
            input_projects.unresolved.len(),
        ));
    }
    let unknown = manifest.missing_projects(
        config
            .add_projects
            .iter()
            .filter(|name| !config.remove_projects.contains(*name)),
    );
    if !unknown.is_empty() {
        warnings.push(SplitWarning::UnknownProjects(unknown));
    }

    let mut filtered = update_manifest(manifest, &projects, &config.remove_projects);
    remove_manifest_hash(&mut filtered);
    if filtered.projects().next().is_none() {
        warnings.push(SplitWarning::EmptyProjectSet);
    }
    let digest = append_manifest_hash(&mut filtered, manifest_name);

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        kept = projects.len(),
        inputs = inputs.len(),
        digest = %digest,
        "split manifest"
    );

    let mut split = ManifestSplit {
        manifest: filtered,
        digest,
        input_projects,
        projects,
        config,
        dropped: Vec::new(),
        module_info: None,
        repo_projects: repo_projects.clone(),
        warnings,
    };
    split.dropped = split.dropped_from(manifest);
    split
}
