use std::fmt;

/// Non-fatal conditions met while computing a release.
/// These are reported to the user but never abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// Tag listing failed; the run continues as if the repository had no tags
    TagListUnavailable { reason: String },
    /// No tag exists yet, so the baseline is 0.0.0
    NoPriorTags,
    /// No commits were returned for the baseline
    NoNewCommits { baseline_tag: Option<String> },
    /// A candidate tag name was already taken and was skipped
    TagCollision { tag: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::TagListUnavailable { reason } => {
                write!(f, "Could not list tags ({}); assuming none exist", reason)
            }
            BoundaryWarning::NoPriorTags => {
                write!(f, "No previous tag found, starting from 0.0.0")
            }
            BoundaryWarning::NoNewCommits { baseline_tag } => match baseline_tag {
                Some(tag) => write!(f, "No commits found from tag '{}'", tag),
                None => write!(f, "No commits found in repository"),
            },
            BoundaryWarning::TagCollision { tag } => {
                write!(f, "Tag '{}' already exists, trying next version", tag)
            }
        }
    }
}
