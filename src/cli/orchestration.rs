//! Main workflow orchestration logic
//!
//! Connects a validated run to a concrete repository host, runs the release,
//! then applies the follow-up steps (manifest update, step outputs). Kept
//! separate from `main.rs` so it can be driven without clap.

use tracing::info;

use crate::config::{Config, HostKind, ValidatedRun};
use crate::error::{AutoTagError, Result};
use crate::host::{GitHubHost, LocalHost, RepositoryHost};
use crate::manifest::{update_package_files, ManifestChange};
use crate::outputs::RunOutputs;
use crate::release::{ReleaseOrchestrator, ReleaseOutcome, ReleaseSettings};

/// Result of a successful workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: ReleaseOutcome,
    pub manifests: Vec<ManifestChange>,
    pub outputs: RunOutputs,
    /// Whether outputs were appended to the configured output file
    pub outputs_written: bool,
}

/// Release settings for a validated run and file configuration
pub fn release_settings(run: &ValidatedRun, config: &Config) -> ReleaseSettings {
    ReleaseSettings {
        tag: config.tag.clone(),
        per_page: config.host.per_page,
        commit_sha: run.commit_sha.clone(),
        dry_run: run.dry_run,
    }
}

/// Main workflow
///
/// Builds the host selected by `run.host` and runs [run_with_host].
pub async fn run_workflow(run: &ValidatedRun, config: &Config) -> Result<WorkflowResult> {
    match run.host {
        HostKind::Github => {
            let repository = run
                .repository
                .as_deref()
                .ok_or_else(|| AutoTagError::precondition("No GITHUB_REPOSITORY provided"))?;
            let token = run
                .token
                .as_deref()
                .ok_or_else(|| AutoTagError::precondition("Invalid or missing GITHUB_TOKEN."))?;
            run_with_host(GitHubHost::new(repository, token)?, run, config).await
        }
        HostKind::Local => run_with_host(LocalHost::open(&run.workspace)?, run, config).await,
    }
}

/// Run the release against `host`, then update manifests and write outputs.
///
/// Manifests under `package_root` (the workspace itself when unset) are only
/// touched after the tag exists, or in a dry run only reported. Outputs are written last so a failed run produces none.
pub async fn run_with_host<H: RepositoryHost>(
    host: H,
    run: &ValidatedRun,
    config: &Config,
) -> Result<WorkflowResult> {
    info!(host = host.name(), dry_run = run.dry_run, "Starting release");
    let orchestrator = ReleaseOrchestrator::new(host, release_settings(run, config));
    let outcome = orchestrator.run().await?;

    let package_dir = match &run.package_root {
        Some(root) => run.workspace.join(root),
        None => run.workspace.clone(),
    };
    let manifests = update_package_files(&package_dir, &outcome.version, run.dry_run)?;

    let outputs = RunOutputs::from(&outcome);
    let outputs_written = match &run.output_file {
        Some(path) => {
            outputs.append_to_file(path)?;
            true
        }
        None => false,
    };

    Ok(WorkflowResult {
        outcome,
        manifests,
        outputs,
        outputs_written,
    })
}
