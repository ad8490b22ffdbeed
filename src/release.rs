//! Release orchestration
//!
//! Drives one tagging cycle against a [RepositoryHost]:
//! tags → baseline → commits → change class → next free version → tag + ref.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::TagConfig;
use crate::domain::{detect_change_type, ChangeClass, TagNamer, Version};
use crate::error::{AutoTagError, Result};
use crate::host::{CreatedRef, RepositoryHost};

/// Inputs that shape a release, independent of the host
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSettings {
    pub tag: TagConfig,
    pub per_page: u8,
    /// Commit the new tag points at; required unless `dry_run`
    pub commit_sha: Option<String>,
    pub dry_run: bool,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        ReleaseSettings {
            tag: TagConfig::default(),
            per_page: 100,
            commit_sha: None,
            dry_run: false,
        }
    }
}

/// Result of a successful release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// New version, e.g. "1.4.0"
    pub version: Version,
    /// New tag name, e.g. "v1.4.0"
    pub tag_name: String,
    pub change_class: ChangeClass,
    pub baseline: Version,
    /// Tag the baseline was read from, if any existed
    pub baseline_tag: Option<String>,
    pub commit_count: usize,
    pub dry_run: bool,
    /// Reference created on the host; `None` for dry runs
    pub created: Option<CreatedRef>,
    pub warnings: Vec<BoundaryWarning>,
}

/// A version whose tag name is not taken yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextVersion {
    pub version: Version,
    pub tag_name: String,
    /// Candidate names that already existed, in the order tried
    pub skipped: Vec<String>,
}

/// Bump `baseline` by `change` until the tag name is free.
///
/// Every retry bumps the previous candidate, not the baseline, so each
/// iteration strictly increases the version and the loop ends after at most
/// `existing.len() + 1` candidates.
pub fn next_available_version(
    baseline: Version,
    change: ChangeClass,
    namer: &TagNamer,
    existing: &HashSet<&str>,
) -> Result<NextVersion> {
    let mut candidate = baseline.bump(change);
    let mut skipped = Vec::new();

    loop {
        let tag_name = namer.tag_name(&candidate);
        if !existing.contains(tag_name.as_str()) {
            return Ok(NextVersion {
                version: candidate,
                tag_name,
                skipped,
            });
        }

        let next = candidate.bump(change);
        if next == candidate {
            return Err(AutoTagError::version(format!(
                "No free tag name after '{}': {} component is at its maximum",
                tag_name, change
            )));
        }
        skipped.push(tag_name);
        candidate = next;
    }
}

/// Sequences host calls and the pure versioning rules for one run
pub struct ReleaseOrchestrator<H: RepositoryHost> {
    host: H,
    namer: TagNamer,
    settings: ReleaseSettings,
}

impl<H: RepositoryHost> ReleaseOrchestrator<H> {
    pub fn new(host: H, settings: ReleaseSettings) -> Self {
        let namer = TagNamer::new(settings.tag.prefix.clone());
        ReleaseOrchestrator {
            host,
            namer,
            settings,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run one release cycle.
    ///
    /// Only a failure to list tags is tolerated (treated as a repository
    /// without tags). Any other host error aborts the run; a rejected ref
    /// creation is not retried.
    pub async fn run(&self) -> Result<ReleaseOutcome> {
        let commit_sha = match (&self.settings.commit_sha, self.settings.dry_run) {
            (Some(sha), _) => Some(sha.as_str()),
            (None, true) => None,
            (None, false) => return Err(AutoTagError::precondition("No GITHUB_SHA provided")),
        };

        let mut warnings = Vec::new();

        let tags = match self.host.list_tags(self.settings.per_page).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(host = self.host.name(), error = %e, "Tag listing failed");
                warnings.push(BoundaryWarning::TagListUnavailable {
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };
        debug!(count = tags.len(), "Fetched tags");

        let baseline_tag = tags.first();
        let baseline = match baseline_tag {
            Some(tag) => Version::parse(self.namer.strip_prefix(&tag.name))?,
            None => {
                warnings.push(BoundaryWarning::NoPriorTags);
                Version::default()
            }
        };
        debug!(%baseline, tag = ?baseline_tag.map(|t| &t.name), "Detected current version");

        let commits = self
            .host
            .list_commits(baseline_tag.map(|t| t.commit_sha.as_str()))
            .await?;
        if commits.is_empty() {
            warnings.push(BoundaryWarning::NoNewCommits {
                baseline_tag: baseline_tag.map(|t| t.name.clone()),
            });
        }

        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        let change_class = detect_change_type(&messages);
        debug!(%change_class, commits = commits.len(), "Detected change type");

        let existing: HashSet<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        let next = next_available_version(baseline, change_class, &self.namer, &existing)?;
        for tag in &next.skipped {
            warn!(tag = %tag, "Tag already exists, skipping");
            warnings.push(BoundaryWarning::TagCollision { tag: tag.clone() });
        }
        info!(version = %next.version, tag = %next.tag_name, "Next version");

        let created = match commit_sha {
            Some(sha) if !self.settings.dry_run => Some(self.create(&next, sha).await?),
            _ => {
                info!(tag = %next.tag_name, "Dry run, not creating tag");
                None
            }
        };

        Ok(ReleaseOutcome {
            version: next.version,
            tag_name: next.tag_name,
            change_class,
            baseline,
            baseline_tag: baseline_tag.map(|t| t.name.clone()),
            commit_count: commits.len(),
            dry_run: self.settings.dry_run,
            created,
            warnings,
        })
    }

    async fn create(&self, next: &NextVersion, commit_sha: &str) -> Result<CreatedRef> {
        let message = self.settings.tag.message(&next.version);
        let tag = self
            .host
            .create_tag_object(&next.tag_name, &message, commit_sha)
            .await?;
        info!(tag = %tag.name, sha = %tag.sha, "Created new tag");

        let reference = self
            .host
            .create_ref(&format!("refs/tags/{}", tag.name), &tag.sha)
            .await?;
        info!(
            reference = %reference.ref_name,
            url = reference.url.as_deref().unwrap_or("-"),
            "Reference available"
        );

        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::HostCall;
    use crate::host::MockHost;

    fn settings(dry_run: bool) -> ReleaseSettings {
        ReleaseSettings {
            commit_sha: Some("headsha".to_string()),
            dry_run,
            ..ReleaseSettings::default()
        }
    }

    #[test]
    fn test_next_version_skips_existing() {
        let existing: HashSet<&str> = ["v1.0.1"].into_iter().collect();
        let next = next_available_version(
            Version::new(1, 0, 0),
            ChangeClass::Patch,
            &TagNamer::default(),
            &existing,
        )
        .unwrap();

        assert_eq!(next.tag_name, "v1.0.2");
        assert_eq!(next.skipped, vec!["v1.0.1".to_string()]);
    }

    #[test]
    fn test_next_version_bumps_candidate_with_same_class() {
        let existing: HashSet<&str> = ["v1.1.0", "v1.2.0"].into_iter().collect();
        let next = next_available_version(
            Version::new(1, 0, 0),
            ChangeClass::Minor,
            &TagNamer::default(),
            &existing,
        )
        .unwrap();

        assert_eq!(next.version, Version::new(1, 3, 0));
    }

    #[test]
    fn test_next_version_without_collision() {
        let next = next_available_version(
            Version::new(0, 0, 0),
            ChangeClass::Major,
            &TagNamer::new("pre-v"),
            &HashSet::new(),
        )
        .unwrap();

        assert_eq!(next.tag_name, "pre-v1.0.0");
        assert!(next.skipped.is_empty());
    }

    #[test]
    fn test_next_version_reports_exhaustion() {
        let existing: HashSet<&str> = ["v0.0.18446744073709551615"].into_iter().collect();
        let result = next_available_version(
            Version::new(0, 0, u64::MAX - 1),
            ChangeClass::Patch,
            &TagNamer::default(),
            &existing,
        );
        assert!(matches!(result, Err(AutoTagError::Version(_))));
    }

    #[tokio::test]
    async fn test_run_creates_tag_and_ref() {
        let mut host = MockHost::new();
        host.add_tag("v1.0.0", "tagsha");
        host.add_commit("c2", "feat: add thing");
        host.add_commit("c1", "fix: bug");

        let orchestrator = ReleaseOrchestrator::new(host, settings(false));
        let outcome = orchestrator.run().await.unwrap();

        assert_eq!(outcome.version, Version::new(1, 1, 0));
        assert_eq!(outcome.tag_name, "v1.1.0");
        assert_eq!(outcome.change_class, ChangeClass::Minor);
        assert_eq!(outcome.baseline_tag.as_deref(), Some("v1.0.0"));
        assert_eq!(
            outcome.created.unwrap().ref_name,
            "refs/tags/v1.1.0".to_string()
        );

        assert_eq!(
            orchestrator.host().calls(),
            vec![
                HostCall::ListTags { per_page: 100 },
                HostCall::ListCommits {
                    since: Some("tagsha".to_string())
                },
                HostCall::CreateTagObject {
                    name: "v1.1.0".to_string(),
                    message: "Version 1.1.0".to_string(),
                    target_sha: "headsha".to_string(),
                },
                HostCall::CreateRef {
                    ref_path: "refs/tags/v1.1.0".to_string(),
                    target_sha: "tagobj-v1.1.0".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_run_dry_run_does_not_mutate() {
        let mut host = MockHost::new();
        host.add_tag("v2.3.4", "tagsha");
        host.add_commit("c1", "refactor!: drop api");

        let orchestrator = ReleaseOrchestrator::new(host, settings(true));
        let outcome = orchestrator.run().await.unwrap();

        assert_eq!(outcome.tag_name, "v3.3.4");
        assert!(outcome.dry_run);
        assert!(outcome.created.is_none());
        assert!(orchestrator.host().mutations().is_empty());
    }

    #[tokio::test]
    async fn test_run_without_sha_fails_before_host_calls() {
        let orchestrator = ReleaseOrchestrator::new(MockHost::new(), ReleaseSettings::default());
        let err = orchestrator.run().await.unwrap_err();

        assert!(matches!(err, AutoTagError::Precondition(_)));
        assert!(orchestrator.host().calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_malformed_baseline() {
        let mut host = MockHost::new();
        host.add_tag("nightly", "tagsha");

        let orchestrator = ReleaseOrchestrator::new(host, settings(false));
        let err = orchestrator.run().await.unwrap_err();

        assert!(matches!(err, AutoTagError::Version(_)));
        assert!(orchestrator.host().mutations().is_empty());
    }
}
