use super::version::Version;

/// Prefix used when none is configured
pub const DEFAULT_TAG_PREFIX: &str = "v";

/// Format a version as a tag name (e.g., "1.2.3" -> "v1.2.3").
///
/// `None` uses [`DEFAULT_TAG_PREFIX`]; `Some("")` yields the bare version.
pub fn get_tag_name(version: &Version, prefix: Option<&str>) -> String {
    format!("{}{}", prefix.unwrap_or(DEFAULT_TAG_PREFIX), version)
}

/// Tag naming rule (e.g., "v" -> "v1.2.3", "release-" -> "release-1.2.3")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNamer {
    prefix: String,
}

impl TagNamer {
    /// Create a namer with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        TagNamer {
            prefix: prefix.into(),
        }
    }

    /// Format a version according to the prefix
    pub fn tag_name(&self, version: &Version) -> String {
        get_tag_name(version, Some(&self.prefix))
    }

    /// Extract the version part of a tag name (e.g., "v1.2.3" -> "1.2.3").
    ///
    /// The configured prefix is removed when present. Otherwise a single
    /// leading `v` or `V` is dropped so that tags created before a prefix
    /// change still yield a baseline.
    pub fn strip_prefix<'a>(&self, tag_name: &'a str) -> &'a str {
        if !self.prefix.is_empty() {
            if let Some(rest) = tag_name.strip_prefix(self.prefix.as_str()) {
                return rest;
            }
        }

        tag_name
            .strip_prefix('v')
            .or_else(|| tag_name.strip_prefix('V'))
            .unwrap_or(tag_name)
    }
}

impl Default for TagNamer {
    fn default() -> Self {
        TagNamer::new(DEFAULT_TAG_PREFIX)
    }
}
