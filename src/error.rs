use thiserror::Error;

/// Unified error type for auto-tag operations
#[derive(Error, Debug)]
pub enum AutoTagError {
    #[error("Missing run context: {0}")]
    Precondition(String),

    #[error("Repository host request failed: {0}")]
    Host(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest update failed: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in auto-tag
pub type Result<T> = std::result::Result<T, AutoTagError>;

impl AutoTagError {
    /// Create a precondition error (missing workspace, credential or commit)
    pub fn precondition(msg: impl Into<String>) -> Self {
        AutoTagError::Precondition(msg.into())
    }

    /// Create a repository host error with context
    pub fn host(msg: impl Into<String>) -> Self {
        AutoTagError::Host(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        AutoTagError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutoTagError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        AutoTagError::Manifest(msg.into())
    }
}
