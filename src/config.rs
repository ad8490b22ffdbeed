use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Version, DEFAULT_TAG_PREFIX};
use crate::error::{AutoTagError, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "autotag.toml";

/// Represents the optional configuration file for auto-tag.
///
/// Contains tag naming settings and host request options. Everything that
/// identifies a single run (workspace, credential, commit) lives in [RunConfig].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub host: HostConfig,
}

fn default_prefix() -> String {
    DEFAULT_TAG_PREFIX.to_string()
}

fn default_message_template() -> String {
    "Version {version}".to_string()
}

fn default_per_page() -> u8 {
    100
}

/// Configuration for tag naming.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Annotation message; `{version}` is replaced with the new version
    #[serde(default = "default_message_template")]
    pub message_template: String,
}

impl TagConfig {
    /// Render the annotation message for a version
    pub fn message(&self, version: &Version) -> String {
        self.message_template
            .replace("{version}", &version.to_string())
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            prefix: default_prefix(),
            message_template: default_message_template(),
        }
    }
}

/// Configuration for repository host requests.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HostConfig {
    /// Number of tags requested; only the first page is read
    #[serde(default = "default_per_page")]
    pub per_page: u8,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            per_page: default_per_page(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autotag.toml` in current directory
/// 3. `.autotag.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(path) = dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
    {
        path
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        AutoTagError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
        .map_err(|e| AutoTagError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Which repository host a run talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HostKind {
    #[default]
    Github,
    Local,
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKind::Github => f.write_str("github"),
            HostKind::Local => f.write_str("local"),
        }
    }
}

/// Everything one release run needs, gathered up front.
///
/// Built by the CLI layer from flags and environment; the release flow never
/// reads the process environment itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunConfig {
    pub workspace: Option<PathBuf>,
    pub token: Option<String>,
    pub commit_sha: Option<String>,
    pub repository: Option<String>,
    pub host: HostKind,
    pub dry_run: bool,
    /// Directory holding package.json, relative to the workspace
    pub package_root: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

/// [RunConfig] after precondition checks
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRun {
    pub workspace: PathBuf,
    pub token: Option<String>,
    pub commit_sha: Option<String>,
    pub repository: Option<String>,
    pub host: HostKind,
    pub dry_run: bool,
    pub package_root: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

impl RunConfig {
    /// Check preconditions before any host interaction.
    ///
    /// - the workspace must be set and be a directory
    /// - the GitHub host needs a non-empty token and an `owner/repo` slug
    /// - a commit sha is needed unless this is a dry run
    pub fn validate(self) -> Result<ValidatedRun> {
        let workspace = self
            .workspace
            .ok_or_else(|| AutoTagError::precondition("No GITHUB_WORKSPACE provided"))?;
        if !workspace.is_dir() {
            return Err(AutoTagError::precondition(format!(
                "Workspace {} is not a directory",
                workspace.display()
            )));
        }

        let token = self.token.filter(|t| !t.trim().is_empty());
        if self.host == HostKind::Github {
            if token.is_none() {
                return Err(AutoTagError::precondition(
                    "Invalid or missing GITHUB_TOKEN.",
                ));
            }
            if self.repository.is_none() {
                return Err(AutoTagError::precondition("No GITHUB_REPOSITORY provided"));
            }
        }

        let commit_sha = self.commit_sha.filter(|s| !s.trim().is_empty());
        if !self.dry_run && commit_sha.is_none() {
            return Err(AutoTagError::precondition("No GITHUB_SHA provided"));
        }

        Ok(ValidatedRun {
            workspace,
            token,
            commit_sha,
            repository: self.repository,
            host: self.host,
            dry_run: self.dry_run,
            package_root: self.package_root,
            output_file: self.output_file,
        })
    }
}
