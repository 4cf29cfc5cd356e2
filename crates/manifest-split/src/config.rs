// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Override configs forcing projects into or out of a split.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// Raw document shape, children may appear in any order.
#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default, rename = "add_project")]
    add_project: Vec<ProjectRef>,

    #[serde(default, rename = "remove_project")]
    remove_project: Vec<ProjectRef>,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    #[serde(rename = "@name")]
    name: String,
}

/// Projects forced into and out of the split manifest.
///
/// The two sets may overlap; removal always wins when the manifest is
/// filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitConfig {
    pub add_projects: BTreeSet<String>,
    pub remove_projects: BTreeSet<String>,
}

impl SplitConfig {
    /// Parse config from an XML string.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document: ConfigDocument =
            quick_xml::de::from_str(xml).map_err(|error| Error::InvalidConfig { error })?;

        Ok(Self {
            add_projects: document.add_project.into_iter().map(|p| p.name).collect(),
            remove_projects: document
                .remove_project
                .into_iter()
                .map(|p| p.name)
                .collect(),
        })
    }

    /// Load config from file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let xml = crate::error::read_to_string(path)?;
        let config = Self::from_xml(&xml)?;
        tracing::debug!(
            path = %path.display(),
            add = config.add_projects.len(),
            remove = config.remove_projects.len(),
            "loaded split config"
        );
        Ok(config)
    }

    /// Load and merge any number of config files.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Self::default();
        for path in paths {
            config.merge(Self::load(path)?);
        }
        Ok(config)
    }

    /// Union both sets of `other` into this config.
    pub fn merge(&mut self, other: SplitConfig) {
        self.add_projects.extend(other.add_projects);
        self.remove_projects.extend(other.remove_projects);
    }

    pub fn is_empty(&self) -> bool {
        self.add_projects.is_empty() && self.remove_projects.is_empty()
    }
}
