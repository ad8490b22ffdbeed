use crate::error::{AutoTagError, Result};
use crate::host::{CreatedRef, CreatedTag, HostCommit, HostTag, RepositoryHost};
use async_trait::async_trait;
use std::sync::Mutex;

/// Operation recorded by [MockHost]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ListTags { per_page: u8 },
    ListCommits { since: Option<String> },
    CreateTagObject {
        name: String,
        message: String,
        target_sha: String,
    },
    CreateRef { ref_path: String, target_sha: String },
}

/// Mock host for testing without network or disk access
pub struct MockHost {
    tags: Vec<HostTag>,
    commits: Vec<HostCommit>,
    fail_list_tags: bool,
    fail_list_commits: bool,
    fail_create_ref: bool,
    calls: Mutex<Vec<HostCall>>,
}

impl MockHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        MockHost {
            tags: Vec::new(),
            commits: Vec::new(),
            fail_list_tags: false,
            fail_list_commits: false,
            fail_create_ref: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Append a tag; tags are listed in insertion order
    pub fn add_tag(&mut self, name: impl Into<String>, commit_sha: impl Into<String>) {
        self.tags.push(HostTag::new(name, commit_sha));
    }

    /// Append a commit; commits are listed in insertion order
    pub fn add_commit(&mut self, sha: impl Into<String>, message: impl Into<String>) {
        self.commits.push(HostCommit::new(sha, message));
    }

    pub fn fail_list_tags(&mut self) {
        self.fail_list_tags = true;
    }

    pub fn fail_list_commits(&mut self) {
        self.fail_list_commits = true;
    }

    /// Reject ref creation as if another run had already created it
    pub fn fail_create_ref(&mut self) {
        self.fail_create_ref = true;
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Only the mutating calls made so far
    pub fn mutations(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    HostCall::CreateTagObject { .. } | HostCall::CreateRef { .. }
                )
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryHost for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_tags(&self, per_page: u8) -> Result<Vec<HostTag>> {
        self.record(HostCall::ListTags { per_page });
        if self.fail_list_tags {
            return Err(AutoTagError::host("listTags: 404 Not Found"));
        }
        Ok(self.tags.iter().take(per_page as usize).cloned().collect())
    }

    async fn list_commits(&self, since: Option<&str>) -> Result<Vec<HostCommit>> {
        self.record(HostCall::ListCommits {
            since: since.map(str::to_string),
        });
        if self.fail_list_commits {
            return Err(AutoTagError::host("listCommits: 401 Bad credentials"));
        }
        Ok(self.commits.clone())
    }

    async fn create_tag_object(
        &self,
        name: &str,
        message: &str,
        target_sha: &str,
    ) -> Result<CreatedTag> {
        self.record(HostCall::CreateTagObject {
            name: name.to_string(),
            message: message.to_string(),
            target_sha: target_sha.to_string(),
        });
        Ok(CreatedTag {
            name: name.to_string(),
            sha: format!("tagobj-{}", name),
        })
    }

    async fn create_ref(&self, ref_path: &str, target_sha: &str) -> Result<CreatedRef> {
        self.record(HostCall::CreateRef {
            ref_path: ref_path.to_string(),
            target_sha: target_sha.to_string(),
        });
        if self.fail_create_ref {
            return Err(AutoTagError::host(format!(
                "createRef: Reference already exists: {}",
                ref_path
            )));
        }
        Ok(CreatedRef {
            ref_name: ref_path.to_string(),
            sha: target_sha.to_string(),
            url: None,
        })
    }
}
