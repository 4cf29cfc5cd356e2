// Copyright (c) Contributors to the manifest-split project.
// SPDX-License-Identifier: Apache-2.0

//! manifest-split - Minimal Source Checkout Manifest CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};

mod cmd_check;
mod cmd_show;
mod cmd_split;

use cmd_check::CmdCheck;
use cmd_show::CmdShow;
use cmd_split::CmdSplit;


#[derive(Parser)]
#[clap(
    name = "manifest-split",
    about = "Minimal Source Checkout Manifests",
    version,
    long_about = "Reduce a multi-project checkout manifest to the projects a build actually reads"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Locations of the split inputs, shared by `split` and `show`.
#[derive(Parser, Clone, Debug, Default)]
pub struct SplitFlags {
    /// Manifest to split
    #[clap(short, long, env = "MANIFEST_SPLIT_MANIFEST")]
    pub manifest: PathBuf,

    /// Project listing with 'repo/path : project/name' lines
    #[clap(long, env = "MANIFEST_SPLIT_REPO_LIST")]
    pub repo_list: PathBuf,

    /// Build module-info JSON, validated against the project listing
    #[clap(long, env = "MANIFEST_SPLIT_MODULE_INFO")]
    pub module_info: Option<PathBuf>,

    /// Override config with add/remove project elements (repeatable)
    #[clap(
        short,
        long = "config",
        env = "MANIFEST_SPLIT_CONFIG",
        value_delimiter = ','
    )]
    pub configs: Vec<PathBuf>,

    /// Module-info path prefix to skip during validation (repeatable)
    #[clap(long = "ignore-prefix")]
    pub ignored_prefixes: Vec<String>,

    /// Name recorded in the hash element (default: manifest file name)
    #[clap(long)]
    pub manifest_name: Option<String>,

    /// Input file consumed by the build (repeatable)
    #[clap(short, long = "input")]
    pub inputs: Vec<String>,

    /// File listing one input per line, '-' for stdin
    #[clap(long)]
    pub inputs_file: Option<PathBuf>,
}

impl SplitFlags {
    pub fn options(&self) -> manifest_split::SplitOptions {
        manifest_split::SplitOptions {
            config_files: self.configs.clone(),
            repo_list: self.repo_list.clone(),
            module_info: self.module_info.clone(),
            manifest: self.manifest.clone(),
            manifest_name: self.manifest_name.clone(),
            ignored_prefixes: self.ignored_prefixes.clone(),
        }
    }

    /// Every input named on the command line or in the inputs file.
    pub fn inputs(&self) -> Result<Vec<String>> {
        let mut inputs = self.inputs.clone();
        match &self.inputs_file {
            Some(path) if path.as_os_str() == "-" => {
                let content = std::io::read_to_string(std::io::stdin())
                    .into_diagnostic()
                    .wrap_err("Failed to read inputs from stdin")?;
                inputs.extend(manifest_split::parse_input_list(&content));
            }
            Some(path) => inputs.extend(manifest_split::read_input_list(path)?),
            None => {}
        }
        Ok(inputs)
    }

    /// Load everything and run the split.
    pub fn split(&self) -> Result<manifest_split::ManifestSplit> {
        let inputs = self.inputs()?;
        if inputs.is_empty() {
            tracing::warn!("no inputs given; only added projects will be kept");
        }
        Ok(manifest_split::split_manifest(&self.options(), &inputs)?)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Write the split manifest
    Split(CmdSplit),

    /// Display the resolved project set
    Show(CmdShow),

    /// Verify the hash element of a split manifest
    Check(CmdCheck),
}

impl Opt {
    fn run(self) -> Result<i32> {
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        // stdout carries manifests and reports
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        self.cmd.run()
    }
}

impl Command {
    fn run(self) -> Result<i32> {
        match self {
            Command::Split(mut cmd) => cmd.run(),
            Command::Show(mut cmd) => cmd.run(),
            Command::Check(mut cmd) => cmd.run(),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
