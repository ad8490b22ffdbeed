//! Command-line arguments and run wiring.
//!
//! Every run input can come from a flag or from the environment variable a
//! GitHub Actions runner sets, so the same binary works as an action step and
//! from a shell.

pub mod orchestration;

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::ArgAction;

use crate::config::{Config, HostKind, RunConfig};

#[derive(Debug, clap::Parser)]
#[command(
    name = "auto-tag",
    version,
    about = "Create the next semantic version tag from conventional commits"
)]
pub struct Args {
    #[arg(long, env = "GITHUB_WORKSPACE", help = "Repository checkout directory")]
    pub workspace: Option<PathBuf>,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token for the GitHub API"
    )]
    pub token: Option<String>,

    /// Action input fallback when GITHUB_TOKEN is not exported
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub input_token: Option<String>,

    #[arg(long, env = "GITHUB_SHA", help = "Commit the new tag points at")]
    pub sha: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as owner/repo")]
    pub repository: Option<String>,

    #[arg(
        long,
        env = "INPUT_DRY_RUN",
        value_parser = FalseyValueParser::new(),
        help = "Compute the next tag without creating it"
    )]
    pub dry_run: bool,

    #[arg(
        long,
        env = "INPUT_PACKAGE_ROOT",
        help = "Directory (relative to the workspace) whose package.json gets the new version [default: workspace root]"
    )]
    pub package_root: Option<PathBuf>,

    #[arg(long, env = "INPUT_PREFIX", help = "Tag prefix, overrides the config file")]
    pub prefix: Option<String>,

    #[arg(
        long,
        value_enum,
        env = "AUTO_TAG_HOST",
        default_value_t = HostKind::Github,
        help = "Where tags are read and created"
    )]
    pub host: HostKind,

    #[arg(long, env = "GITHUB_OUTPUT", help = "File that receives the step outputs")]
    pub output_file: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
}

fn non_empty<T: AsRef<std::ffi::OsStr>>(value: &Option<T>) -> bool {
    value.as_ref().is_some_and(|v| !v.as_ref().is_empty())
}

impl Args {
    /// Gather the run inputs; empty values count as missing.
    pub fn run_config(&self) -> RunConfig {
        let token = if non_empty(&self.token) {
            self.token.clone()
        } else {
            self.input_token.clone()
        };

        RunConfig {
            workspace: self.workspace.clone().filter(|p| !p.as_os_str().is_empty()),
            token,
            commit_sha: self.sha.clone().filter(|s| !s.is_empty()),
            repository: self.repository.clone().filter(|s| !s.is_empty()),
            host: self.host,
            dry_run: self.dry_run,
            package_root: self.package_root.clone().filter(|p| !p.as_os_str().is_empty()),
            output_file: self.output_file.clone().filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// Apply flag overrides on top of the file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(prefix) = &self.prefix {
            config.tag.prefix = prefix.clone();
        }
    }

    /// Default log filter for the verbosity count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
