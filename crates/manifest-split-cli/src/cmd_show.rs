// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `manifest-split show` command.

use clap::Args;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use manifest_split::{InclusionReason, SplitReport};

/// Display the resolved project set
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    flags: crate::SplitFlags,

    /// List the inputs resolved to each project
    #[clap(long = "list-inputs")]
    list_inputs: bool,

    /// Only show projects holding one of these module-info targets (repeatable)
    #[clap(short, long = "target")]
    targets: Vec<String>,

    /// Output format: table, yaml, json
    #[clap(long, default_value = "table", value_parser = ["table", "yaml", "json"])]
    format: String,
}

impl CmdShow {
    pub fn run(&mut self) -> Result<i32> {
        let split = self.flags.split()?;
        let mut report = manifest_split::generate_report(
            &split,
            split.module_info.as_ref(),
            &self.flags.options().source_files(),
        )?;

        if !self.targets.is_empty() {
            let Some(module_info) = &split.module_info else {
                return Err(miette::miette!(
                    help = "Pass --module-info so targets can be mapped to projects",
                    "--target requires a module-info file"
                ));
            };
            report.retain_projects(&module_info.projects_for_targets(&self.targets));
        }

        match self.format.as_str() {
            "yaml" => print!("{}", serde_yaml::to_string(&report).into_diagnostic()?),
            "json" => println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?),
            _ => self.show_table(&report),
        }

        Ok(0)
    }

    fn show_table(&self, report: &SplitReport) {
        println!("{}", "Resolved Projects:".bold());
        println!();

        if report.projects.is_empty() {
            println!("  {}", "(no projects)".dimmed());
        }
        for (i, (name, project)) in report.projects.iter().enumerate() {
            let reason = match project.reason {
                InclusionReason::Inputs => format!("{} input(s)", project.inputs.len()),
                InclusionReason::Config => "[added]".to_string(),
                InclusionReason::InputsAndConfig => {
                    format!("{} input(s) [added]", project.inputs.len())
                }
            };
            let path = project.repo_path.as_deref().unwrap_or("<unlisted>");
            println!(
                "  {}. {} {} {}",
                i + 1,
                name.cyan(),
                path.dimmed(),
                reason.yellow()
            );

            if !project.module_targets.is_empty() {
                let targets: Vec<&str> =
                    project.module_targets.iter().map(String::as_str).collect();
                println!("     {}", targets.join(", ").dimmed());
            }
            if self.list_inputs {
                for input in &project.inputs {
                    println!("     - {input}");
                }
            }
        }

        if !report.removed_projects.is_empty() {
            println!();
            println!("{}", "Removed:".bold());
            for name in &report.removed_projects {
                println!("  - {}", name.red());
            }
        }

        if !report.unresolved_inputs.is_empty() {
            println!();
            println!(
                "{} input(s) outside every project",
                report.unresolved_inputs.len().to_string().yellow()
            );
            if self.list_inputs {
                for input in &report.unresolved_inputs {
                    println!("  - {}", input.dimmed());
                }
            }
        }

        println!();
        println!("Total: {} project(s)", report.projects.len());
        println!("Hash:  {}", report.manifest_hash);
    }
}
