//! Repository host abstraction layer
//!
//! This module provides a trait-based abstraction over the four operations
//! auto-tag needs from wherever the repository lives, allowing the release
//! flow to run against a hosted API, a local clone, or an in-memory fake.
//!
//! # Overview
//!
//! The primary abstraction is the [RepositoryHost] trait. The concrete
//! implementations are:
//!
//! - [github::GitHubHost]: the GitHub REST API via `octocrab`
//! - [local::LocalHost]: a git repository on disk via `git2`
//! - [mock::MockHost]: an in-memory host that records mutations, for tests
//!
//! # Usage
//!
//! ```rust
//! # use auto_tag::host::RepositoryHost;
//! # async fn example<H: RepositoryHost>(host: &H) -> auto_tag::Result<()> {
//! let tags = host.list_tags(100).await?;
//! let since = tags.first().map(|t| t.commit_sha.as_str());
//! let commits = host.list_commits(since).await?;
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod local;
pub mod mock;

pub use github::GitHubHost;
pub use local::LocalHost;
pub use mock::MockHost;

use crate::error::Result;
use async_trait::async_trait;

/// Tag as listed by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTag {
    /// Tag name (e.g., "v1.2.3")
    pub name: String,
    /// Commit the tag points at
    pub commit_sha: String,
}

impl HostTag {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        HostTag {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommit {
    pub sha: String,
    pub message: String,
}

impl HostCommit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        HostCommit {
            sha: sha.into(),
            message: message.into(),
        }
    }
}

/// Annotated tag object created by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTag {
    /// Tag name as recorded in the object
    pub name: String,
    /// Object ID of the tag object itself (not the commit)
    pub sha: String,
}

/// Reference created by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRef {
    /// Full ref path (e.g., "refs/tags/v1.2.3")
    pub ref_name: String,
    /// Object the ref resolves to
    pub sha: String,
    /// API location of the ref, when the host exposes one
    pub url: Option<String>,
}

/// Operations the release flow needs from a repository host
///
/// ## Ordering
///
/// [list_tags](RepositoryHost::list_tags) returns the most recent tag first
/// and [list_commits](RepositoryHost::list_commits) returns the newest commit
/// first. The release flow treats the first tag as the baseline and feeds
/// commit messages to the classifier in the order received.
///
/// ## Error Handling
///
/// Implementations map transport and API failures to
/// [crate::error::AutoTagError::Host] (or `Git` for local repositories).
/// Nothing is retried.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Short name used in logs (e.g., "github")
    fn name(&self) -> &'static str;

    /// List up to `per_page` tags, most recent first
    async fn list_tags(&self, per_page: u8) -> Result<Vec<HostTag>>;

    /// List commits reachable from `since`, or from the default branch head
    /// when `since` is `None`, newest first
    async fn list_commits(&self, since: Option<&str>) -> Result<Vec<HostCommit>>;

    /// Create an annotated tag object pointing at `target_sha`
    ///
    /// Does not create the `refs/tags/` reference.
    async fn create_tag_object(
        &self,
        name: &str,
        message: &str,
        target_sha: &str,
    ) -> Result<CreatedTag>;

    /// Create `ref_path` pointing at `target_sha`; fails if it already exists
    async fn create_ref(&self, ref_path: &str, target_sha: &str) -> Result<CreatedRef>;
}
