// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `manifest-split split` command.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

/// Write the split manifest
#[derive(Debug, Args)]
pub struct CmdSplit {
    #[clap(flatten)]
    flags: crate::SplitFlags,

    /// Write the split manifest to PATH instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON report explaining each kept project
    #[clap(long, env = "MANIFEST_SPLIT_DEBUG_FILE")]
    debug_file: Option<PathBuf>,

    /// Print the kept projects without writing anything
    #[clap(long)]
    dry_run: bool,
}

impl CmdSplit {
    #[cfg(test)]
    pub fn flags(&self) -> &crate::SplitFlags {
        &self.flags
    }

    pub fn run(&mut self) -> Result<i32> {
        let split = self.flags.split()?;

        if self.dry_run {
            for name in split.manifest.project_names() {
                println!("{}", name.green());
            }
            for name in &split.dropped {
                println!("{}", format!("- {name}").dimmed());
            }
            println!();
            println!(
                "Kept {} of {} project(s)",
                split.manifest.projects().count(),
                split.manifest.projects().count() + split.dropped.len()
            );
            return Ok(0);
        }

        // Report first so a failing debug file leaves no manifest behind.
        if let Some(debug_file) = &self.debug_file {
            let report = manifest_split::generate_report(
                &split,
                split.module_info.as_ref(),
                &self.flags.options().source_files(),
            )?;
            report.write_json(debug_file)?;
        }

        match &self.output {
            Some(path) => split.write(path)?,
            None => std::io::stdout()
                .write_all(split.manifest.to_document_string().as_bytes())
                .into_diagnostic()?,
        }

        Ok(0)
    }
}
