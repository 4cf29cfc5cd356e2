// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for manifest-split operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with manifest-split Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building indexes or rewriting manifests.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(manifest_split::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(manifest_split::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Invalid override config
    #[error("Invalid split config: {error}")]
    #[diagnostic(
        code(manifest_split::invalid_config),
        help("Config files hold <add_project name=\"...\"/> and <remove_project name=\"...\"/> elements")
    )]
    InvalidConfig {
        #[source]
        error: quick_xml::DeError,
    },

    /// Manifest is not well-formed XML
    #[error("Invalid manifest XML: {error}")]
    #[diagnostic(code(manifest_split::invalid_manifest))]
    InvalidManifest {
        #[source]
        error: quick_xml::Error,
    },

    /// Manifest is well-formed XML but not a single-rooted document
    #[error("Malformed manifest: {0}")]
    #[diagnostic(code(manifest_split::malformed_manifest))]
    MalformedManifest(String),

    /// Line of the project listing without a `path : name` pair
    #[error("Invalid project listing at line {line}: {content:?}")]
    #[diagnostic(
        code(manifest_split::invalid_repo_list),
        help("Each line must look like 'repo/path : project/name'")
    )]
    InvalidRepoList { line: usize, content: String },

    /// Module-info file is not valid JSON of the expected shape
    #[error("Invalid module-info file: {error}")]
    #[diagnostic(
        code(manifest_split::invalid_module_info),
        help("Expected an object of {{ \"<target>\": {{ \"path\": [\"...\"] }} }}")
    )]
    InvalidModuleInfo {
        #[source]
        error: serde_json::Error,
    },

    /// Module-info references a path outside every listed project
    #[error("Module path {path:?} of target {target:?} is not in any known project")]
    #[diagnostic(
        code(manifest_split::inconsistent_index),
        help(
            "The module-info file and the project listing disagree; regenerate one of them \
             or ignore generated-output prefixes"
        )
    )]
    InconsistentIndex { target: String, path: String },

    /// Debug report could not be serialized
    #[error("Failed to serialize split report: {error}")]
    #[diagnostic(code(manifest_split::report_serialization))]
    ReportSerialization {
        #[source]
        error: serde_json::Error,
    },
}

/// Read a whole file, attaching the path to any failure.
pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|error| Error::ReadFailed {
        path: path.to_path_buf(),
        error,
    })
}
