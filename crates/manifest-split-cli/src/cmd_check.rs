// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Verify the hash element of a split manifest.

use std::path::PathBuf;

use clap::Args;
use miette::Result;

use manifest_split::HashCheck;

/// Verify the hash element of a split manifest
#[derive(Debug, Args)]
pub struct CmdCheck {
    /// Split manifest to verify
    manifest: PathBuf,

    /// Exit with error on mismatch or missing hash
    #[clap(long)]
    strict: bool,
}

impl CmdCheck {
    pub fn run(&mut self) -> Result<i32> {
        let manifest = manifest_split::Manifest::load(&self.manifest)?;

        let problem = match manifest_split::verify_manifest_hash(&manifest) {
            HashCheck::Verified { name, digest } => {
                println!("✓ {name} matches its hash ({digest})");
                return Ok(0);
            }
            HashCheck::Missing => {
                if !self.strict {
                    println!("Warning: No hash element found in {:?}", self.manifest);
                    return Ok(2);
                }
                format!("No hash element found in {:?}", self.manifest)
            }
            HashCheck::Mismatch {
                name,
                expected,
                actual,
            } => format!(
                "{name} differs from its hash\n    Expected: {expected}\n    Actual:   {actual}"
            ),
            HashCheck::UnsupportedType(kind) => {
                format!("Unsupported hash type {kind:?}")
            }
        };

        if self.strict {
            eprintln!("Error: {problem}");
            return Ok(1);
        }

        println!("Warning: {problem}");
        Ok(0)
    }
}
