use crate::error::{AutoTagError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `major.minor.patch` string (e.g., "1.2.3" -> Version(1,2,3)).
    ///
    /// Tag prefixes must already be stripped; see [`crate::domain::TagNamer::strip_prefix`].
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(AutoTagError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                input
            )));
        }

        let component = |name: &str, raw: &str| {
            raw.parse::<u64>().map_err(|_| {
                AutoTagError::version(format!("Invalid {} version in '{}': {}", name, input, raw))
            })
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Bump a single component according to the change class.
    ///
    /// Lower components are carried over unchanged: `1.2.3` bumped by
    /// `Major` is `2.2.3`, not `2.0.0`. Components saturate at `u64::MAX`.
    pub fn bump(&self, change: ChangeClass) -> Self {
        match change {
            ChangeClass::Major => Version {
                major: self.major.saturating_add(1),
                ..*self
            },
            ChangeClass::Minor => Version {
                minor: self.minor.saturating_add(1),
                ..*self
            },
            ChangeClass::Patch => Version {
                patch: self.patch.saturating_add(1),
                ..*self
            },
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = AutoTagError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Magnitude of change carried by a set of commits, ordered by impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ChangeClass {
    #[default]
    Patch,
    Minor,
    Major,
}

impl ChangeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeClass::Patch => "patch",
            ChangeClass::Minor => "minor",
            ChangeClass::Major => "major",
        }
    }
}

impl fmt::Display for ChangeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeClass {
    type Err = AutoTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patch" => Ok(ChangeClass::Patch),
            "minor" => Ok(ChangeClass::Minor),
            "major" => Ok(ChangeClass::Major),
            other => Err(AutoTagError::version(format!(
                "Unknown change class: '{}'",
                other
            ))),
        }
    }
}

/// Increase `current` by one step of `change`.
///
/// Passing `ChangeClass::default()` behaves as a patch bump.
pub fn increase_version(current: Version, change: ChangeClass) -> Version {
    current.bump(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("1.x.3").is_err());
        assert!(Version::parse("v1.2.3").is_err());
        assert!(Version::parse("-1.2.3").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_parse_error_names_component() {
        let err = Version::parse("1.x.3").unwrap_err();
        assert!(err.to_string().contains("minor"));
    }

    #[test]
    fn test_increase_by_patch() {
        let v = increase_version(Version::new(1, 0, 0), ChangeClass::Patch);
        assert_eq!(v.to_string(), "1.0.1");
    }

    #[test]
    fn test_increase_by_minor() {
        let v = increase_version(Version::new(1, 0, 0), ChangeClass::Minor);
        assert_eq!(v.to_string(), "1.1.0");
    }

    #[test]
    fn test_increase_by_major() {
        let v = increase_version(Version::new(1, 0, 0), ChangeClass::Major);
        assert_eq!(v.to_string(), "2.0.0");
    }

    #[test]
    fn test_bump_keeps_lower_components() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(ChangeClass::Major), Version::new(2, 2, 3));
        assert_eq!(v.bump(ChangeClass::Minor), Version::new(1, 3, 3));
        assert_eq!(v.bump(ChangeClass::Patch), Version::new(1, 2, 4));
    }

    #[test]
    fn test_default_change_class_is_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(
            increase_version(v, ChangeClass::default()),
            increase_version(v, ChangeClass::Patch)
        );
    }

    #[test]
    fn test_bump_saturates() {
        let v = Version::new(0, 0, u64::MAX);
        assert_eq!(v.bump(ChangeClass::Patch), v);
    }

    #[test]
    fn test_change_class_ordering() {
        assert!(ChangeClass::Patch < ChangeClass::Minor);
        assert!(ChangeClass::Minor < ChangeClass::Major);
    }

    #[test]
    fn test_change_class_round_trips_through_str() {
        for class in [ChangeClass::Patch, ChangeClass::Minor, ChangeClass::Major] {
            assert_eq!(class.as_str().parse::<ChangeClass>().unwrap(), class);
        }
        assert!("breaking".parse::<ChangeClass>().is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(10, 0, 7).to_string(), "10.0.7");
        assert_eq!(Version::default().to_string(), "0.0.0");
    }
}
