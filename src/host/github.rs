//! GitHub REST API host.
//!
//! Talks to the git database endpoints directly so the created tag is an
//! annotated tag object plus a `refs/tags/` reference, the same pair a
//! `git tag -a` followed by a push would produce.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AutoTagError, Result};
use crate::host::{CreatedRef, CreatedTag, HostCommit, HostTag, RepositoryHost};

#[derive(Debug, Serialize)]
struct ListTagsQuery {
    per_page: u8,
}

#[derive(Debug, Serialize)]
struct ListCommitsQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
    commit: ShaRef,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Debug, Serialize)]
struct NewTagObject<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct TagObject {
    tag: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct NewRef<'a> {
    #[serde(rename = "ref")]
    ref_name: &'a str,
    sha: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    #[serde(rename = "ref")]
    ref_name: String,
    url: Option<String>,
    object: ShaRef,
}

/// Split an `owner/repo` slug (the `GITHUB_REPOSITORY` format).
pub fn parse_repository(slug: &str) -> Result<(String, String)> {
    let (owner, repo) = slug.trim().split_once('/').ok_or_else(|| {
        AutoTagError::precondition(format!(
            "Invalid repository '{}': expected owner/repo",
            slug
        ))
    })?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(AutoTagError::precondition(format!(
            "Invalid repository '{}': expected owner/repo",
            slug
        )));
    }

    Ok((owner.to_string(), repo.to_string()))
}

fn request_failed(operation: &str, err: octocrab::Error) -> AutoTagError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            AutoTagError::host(format!("{}: {}", operation, source.message))
        }
        other => AutoTagError::host(format!("{}: {}", operation, other)),
    }
}

/// Repository host backed by the GitHub REST API
pub struct GitHubHost {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubHost {
    /// Create an authenticated host for `owner/repo`
    pub fn new(repository: &str, token: &str) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        if token.is_empty() {
            return Err(AutoTagError::precondition("No GITHUB_TOKEN provided"));
        }

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| AutoTagError::host(format!("Failed to create GitHub client: {}", e)))?;

        Ok(GitHubHost {
            client,
            owner,
            repo,
        })
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, self.repo, path)
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_tags(&self, per_page: u8) -> Result<Vec<HostTag>> {
        debug!(owner = %self.owner, repo = %self.repo, per_page, "Listing tags");
        let entries: Vec<TagEntry> = self
            .client
            .get(self.route("tags"), Some(&ListTagsQuery { per_page }))
            .await
            .map_err(|e| request_failed("listTags", e))?;

        Ok(entries
            .into_iter()
            .map(|t| HostTag::new(t.name, t.commit.sha))
            .collect())
    }

    async fn list_commits(&self, since: Option<&str>) -> Result<Vec<HostCommit>> {
        debug!(owner = %self.owner, repo = %self.repo, since, "Listing commits");
        let entries: Vec<CommitEntry> = self
            .client
            .get(self.route("commits"), Some(&ListCommitsQuery { sha: since }))
            .await
            .map_err(|e| request_failed("listCommits", e))?;

        Ok(entries
            .into_iter()
            .map(|c| HostCommit::new(c.sha, c.commit.message))
            .collect())
    }

    async fn create_tag_object(
        &self,
        name: &str,
        message: &str,
        target_sha: &str,
    ) -> Result<CreatedTag> {
        let body = NewTagObject {
            tag: name,
            message,
            object: target_sha,
            kind: "commit",
        };
        let created: TagObject = self
            .client
            .post(self.route("git/tags"), Some(&body))
            .await
            .map_err(|e| request_failed("createTag", e))?;

        Ok(CreatedTag {
            name: created.tag,
            sha: created.sha,
        })
    }

    async fn create_ref(&self, ref_path: &str, target_sha: &str) -> Result<CreatedRef> {
        let body = NewRef {
            ref_name: ref_path,
            sha: target_sha,
        };
        let created: RefObject = self
            .client
            .post(self.route("git/refs"), Some(&body))
            .await
            .map_err(|e| request_failed("createRef", e))?;

        Ok(CreatedRef {
            ref_name: created.ref_name,
            sha: created.object.sha,
            url: created.url,
        })
    }
}
