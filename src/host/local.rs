use async_trait::async_trait;
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Signature};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::error::{AutoTagError, Result};
use crate::host::{CreatedRef, CreatedTag, HostCommit, HostTag, RepositoryHost};

/// Repository host backed by a git repository on disk
pub struct LocalHost {
    repo: Mutex<Git2Repo>,
}

impl LocalHost {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(LocalHost {
            repo: Mutex::new(repo),
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        LocalHost {
            repo: Mutex::new(repo),
        }
    }

    fn repo(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| AutoTagError::host("local repository lock poisoned"))
    }
}

fn parse_oid(sha: &str) -> Result<Oid> {
    Oid::from_str(sha).map_err(|e| AutoTagError::host(format!("Invalid object id '{}': {}", sha, e)))
}

/// Identity used for tag objects when the repository has no `user.name`
fn tagger(repo: &Git2Repo) -> Result<Signature<'static>> {
    match repo.signature() {
        Ok(sig) => Ok(sig.to_owned()),
        Err(_) => Ok(Signature::now("auto-tag", "auto-tag@localhost")?),
    }
}

#[async_trait]
impl RepositoryHost for LocalHost {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn list_tags(&self, per_page: u8) -> Result<Vec<HostTag>> {
        let repo = self.repo()?;
        let names = repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            let reference = repo.find_reference(&format!("refs/tags/{}", name))?;
            // Tags on trees or blobs cannot be a version baseline
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    warn!(tag = name, error = %e, "Skipping tag that does not point at a commit");
                    continue;
                }
            };
            tags.push((commit.time().seconds(), HostTag::new(name, commit.id().to_string())));
        }

        // Newest target commit first, then by name so same-commit tags are stable
        tags.sort_by(|(a_time, a), (b_time, b)| {
            b_time.cmp(a_time).then_with(|| b.name.cmp(&a.name))
        });

        Ok(tags
            .into_iter()
            .take(per_page as usize)
            .map(|(_, tag)| tag)
            .collect())
    }

    async fn list_commits(&self, since: Option<&str>) -> Result<Vec<HostCommit>> {
        let repo = self.repo()?;
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

        match since {
            Some(sha) => revwalk.push(parse_oid(sha)?)?,
            None => revwalk.push_head()?,
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = repo.find_commit(oid)?;
            let message = commit.message().unwrap_or("(empty message)").to_string();
            commits.push(HostCommit::new(oid.to_string(), message));
        }

        Ok(commits)
    }

    async fn create_tag_object(
        &self,
        name: &str,
        message: &str,
        target_sha: &str,
    ) -> Result<CreatedTag> {
        let repo = self.repo()?;
        let object = repo
            .find_object(parse_oid(target_sha)?, Some(ObjectType::Commit))
            .map_err(|e| AutoTagError::host(format!("Cannot find commit {}: {}", target_sha, e)))?;
        let tagger = tagger(&repo)?;

        let oid = repo.tag_annotation_create(name, &object, &tagger, message)?;

        Ok(CreatedTag {
            name: name.to_string(),
            sha: oid.to_string(),
        })
    }

    async fn create_ref(&self, ref_path: &str, target_sha: &str) -> Result<CreatedRef> {
        let repo = self.repo()?;
        let oid = parse_oid(target_sha)?;

        let reference = repo
            .reference(ref_path, oid, false, "auto-tag: create tag")
            .map_err(|e| match e.code() {
                ErrorCode::Exists => {
                    AutoTagError::host(format!("Reference already exists: {}", ref_path))
                }
                _ => AutoTagError::Git(e),
            })?;

        Ok(CreatedRef {
            ref_name: reference.name().unwrap_or(ref_path).to_string(),
            sha: oid.to_string(),
            url: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, message: &str, time: i64) -> Oid {
        let sig = Signature::new("Test", "test@example.com", &git2::Time::new(time, 0)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_tags_newest_first() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let first = commit(&repo, "fix: first", 1_000);
        let second = commit(&repo, "feat: second", 2_000);
        repo.tag_lightweight("v1.0.0", &repo.find_object(first, None).unwrap(), false)
            .unwrap();
        repo.tag_lightweight("v1.1.0", &repo.find_object(second, None).unwrap(), false)
            .unwrap();

        let host = LocalHost::from_git2(repo);
        let tags = host.list_tags(100).await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], HostTag::new("v1.1.0", second.to_string()));
        assert_eq!(tags[1], HostTag::new("v1.0.0", first.to_string()));
    }

    #[tokio::test]
    async fn test_list_tags_skips_non_commit_tags() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let head = commit(&repo, "fix: first", 1_000);
        let target = repo.find_object(head, None).unwrap();
        repo.tag_lightweight("v5.0.0", &target, false).unwrap();
        repo.tag_lightweight("v0.0.1", &target, false).unwrap();
        let tree_id = repo.find_commit(head).unwrap().tree_id();
        repo.tag_lightweight("tree-snapshot", &repo.find_object(tree_id, None).unwrap(), false)
            .unwrap();
        drop(target);

        let host = LocalHost::from_git2(repo);
        let tags = host.list_tags(100).await.unwrap();

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["v5.0.0", "v0.0.1"]);
    }

    #[tokio::test]
    async fn test_list_commits_from_head_newest_first() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit(&repo, "fix: first", 1_000);
        let second = commit(&repo, "feat: second", 2_000);

        let host = LocalHost::from_git2(repo);
        let commits = host.list_commits(None).await.unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, second.to_string());
        assert_eq!(commits[0].message, "feat: second");

        let from_first = host.list_commits(Some(&commits[1].sha)).await.unwrap();
        assert_eq!(from_first.len(), 1);
        assert_eq!(from_first[0].message, "fix: first");
    }

    #[tokio::test]
    async fn test_create_annotated_tag_and_ref() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let head = commit(&repo, "fix: first", 1_000);

        let host = LocalHost::from_git2(repo);
        let created = host
            .create_tag_object("v0.0.1", "Version 0.0.1", &head.to_string())
            .await
            .unwrap();
        assert_eq!(created.name, "v0.0.1");

        let reference = host
            .create_ref("refs/tags/v0.0.1", &created.sha)
            .await
            .unwrap();
        assert_eq!(reference.ref_name, "refs/tags/v0.0.1");

        let tags = host.list_tags(100).await.unwrap();
        assert_eq!(tags, vec![HostTag::new("v0.0.1", head.to_string())]);

        // Second creation of the same ref is rejected
        let again = host.create_ref("refs/tags/v0.0.1", &created.sha).await;
        assert!(again.unwrap_err().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_rejects_malformed_sha() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit(&repo, "fix: first", 1_000);

        let host = LocalHost::from_git2(repo);
        assert!(host.list_commits(Some("not-a-sha")).await.is_err());
    }
}
