// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! manifest-split - Minimal Source Checkout Manifests
//!
//! This crate derives a reduced checkout manifest for a large multi-project
//! repository from the set of files a build actually consumes.
//!
//! # Overview
//!
//! A split combines four inputs:
//!
//! - a project listing (`repo-path : project-name` per line) mapping every
//!   checkout path to its manifest project,
//! - the list of files consumed by the requested build targets,
//! - optional override configs forcing projects in or out,
//! - the full manifest to reduce.
//!
//! Every input file is resolved to the project owning the longest matching
//! path prefix. The union of those projects and the forced-in projects, minus
//! the forced-out projects, is the only criterion used to filter `<project>`
//! elements. The filtered manifest then receives a trailing verification
//! element holding the SHA-1 of its serialized root:
//!
//! ```xml
//! <manifest>
//!   <project name="platform/project1" path="system/project1" />
//! <hash name="default.xml" type="sha1" value="..." /></manifest>
//! ```
//!
//! # Example
//!
//! ```xml
//! <!-- split.config.xml -->
//! <config>
//!   <add_project name="platform/build/soong" />
//!   <remove_project name="platform/prebuilts/large" />
//! </config>
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod inputs;
pub mod manifest;
pub mod module_info;
pub mod repo;
pub mod report;
pub mod split;

pub use config::SplitConfig;
pub use error::{Error, Result};
pub use hash::{
    append_manifest_hash, create_manifest_hash_element, manifest_digest, remove_manifest_hash,
    verify_manifest_hash, HashCheck,
};
pub use inputs::{get_input_projects, parse_input_list, read_input_list, InputProjects};
pub use manifest::{update_manifest, Element, Manifest, Node};
pub use module_info::{ModuleInfo, ModuleInfoOptions};
pub use repo::{ProjectMatch, RepoProjects};
pub use report::{generate_report, InclusionReason, ProjectReport, SplitReport};
pub use split::{
    resolve_projects, split_loaded, split_manifest, ManifestSplit, SplitOptions, SplitWarning,
};

/// Name of the manifest elements filtered by a split.
pub const PROJECT_ELEMENT: &str = "project";

/// Name of the verification element appended after filtering.
pub const HASH_ELEMENT: &str = "hash";

/// Digest identifier written in the `type` attribute of the hash element.
pub const HASH_TYPE: &str = "sha1";
