// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Debug report describing why each project was kept.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::module_info::ModuleInfo;
use crate::split::ManifestSplit;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./report_test.rs"]
mod report_test;

/// Serializable account of one split.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SplitReport {
    pub generated: GenerationMetadata,
    pub manifest_hash: String,
    pub sources: Vec<SourceFile>,
    pub projects: BTreeMap<String, ProjectReport>,
    pub removed_projects: BTreeSet<String>,
    pub unresolved_inputs: BTreeSet<String>,
}

/// Metadata about when and where the report was generated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GenerationMetadata {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub hostname: String,
}

/// Input file read by the split.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub sha256: String,
}

/// Why a project is part of the split manifest.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InclusionReason {
    Inputs,
    Config,
    InputsAndConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProjectReport {
    pub reason: InclusionReason,

    /// Checkout path from the project listing; absent for added projects
    /// the listing does not know.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_path: Option<String>,

    /// Inputs resolved to this project.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub inputs: BTreeSet<String>,

    /// Build targets with sources in this project, when module-info was given.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub module_targets: BTreeSet<String>,
}

/// Build the report for `split`, fingerprinting every file in `sources`.
pub fn generate_report(
    split: &ManifestSplit,
    module_info: Option<&ModuleInfo>,
    sources: &[PathBuf],
) -> Result<SplitReport> {
    let sources = sources
        .iter()
        .map(|path| fingerprint(path))
        .collect::<Result<Vec<_>>>()?;

    let mut projects = BTreeMap::new();
    for name in &split.projects {
        let inputs = split
            .input_projects
            .inputs_of(name)
            .cloned()
            .unwrap_or_default();
        let reason = match (!inputs.is_empty(), split.config.add_projects.contains(name)) {
            (true, true) => InclusionReason::InputsAndConfig,
            (true, false) => InclusionReason::Inputs,
            _ => InclusionReason::Config,
        };
        let module_targets = module_info
            .and_then(|info| info.targets(name))
            .cloned()
            .unwrap_or_default();

        projects.insert(
            name.clone(),
            ProjectReport {
                reason,
                repo_path: split.repo_projects.repo_path_of(name).map(String::from),
                inputs,
                module_targets,
            },
        );
    }

    Ok(SplitReport {
        generated: GenerationMetadata {
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string()),
        },
        manifest_hash: split.digest.clone(),
        sources,
        projects,
        removed_projects: split.config.remove_projects.clone(),
        unresolved_inputs: split.input_projects.unresolved.clone(),
    })
}

impl SplitReport {
    /// Keep only the projects named in `projects`.
    pub fn retain_projects(&mut self, projects: &BTreeSet<String>) {
        self.projects.retain(|name, _| projects.contains(name));
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|error| Error::ReportSerialization { error })?;
        std::fs::write(path, json + "\n").map_err(|error| Error::WriteFailed {
            path: path.to_path_buf(),
            error,
        })?;
        tracing::debug!(path = %path.display(), "wrote debug report");
        Ok(())
    }
}

fn fingerprint(path: &Path) -> Result<SourceFile> {
    use sha2::{Digest as ShaDigest, Sha256};

    let content = std::fs::read(path).map_err(|error| Error::ReadFailed {
        path: path.to_path_buf(),
        error,
    })?;
    let path = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Ok(SourceFile {
        path,
        sha256: format!("{:x}", Sha256::digest(&content)),
    })
}
