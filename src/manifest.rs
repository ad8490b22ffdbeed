//! package.json / package-lock.json version updates
//!
//! Keys keep their original order (`serde_json` is built with
//! `preserve_order`) and files are rewritten with two-space indentation.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::Version;
use crate::error::{AutoTagError, Result};

pub const PACKAGE_FILE: &str = "package.json";
pub const PACKAGE_LOCK_FILE: &str = "package-lock.json";

/// One manifest whose version was (or, in a dry run, would be) rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestChange {
    pub path: PathBuf,
    pub previous: Option<String>,
    pub written: bool,
}

/// Set the version in `package.json` and `package-lock.json` under `dir`.
///
/// A directory without `package.json` is left alone, and the lock file is
/// only touched when `package.json` exists. With `dry_run` nothing is written.
pub fn update_package_files(
    dir: &Path,
    version: &Version,
    dry_run: bool,
) -> Result<Vec<ManifestChange>> {
    let package = dir.join(PACKAGE_FILE);
    if !package.is_file() {
        debug!(path = %package.display(), "No package.json, skipping manifest update");
        return Ok(Vec::new());
    }

    let mut changes = vec![rewrite(&package, version, false, dry_run)?];

    let lock = dir.join(PACKAGE_LOCK_FILE);
    if lock.is_file() {
        changes.push(rewrite(&lock, version, true, dry_run)?);
    }

    Ok(changes)
}

fn rewrite(path: &Path, version: &Version, is_lock: bool, dry_run: bool) -> Result<ManifestChange> {
    let content = fs::read_to_string(path)
        .map_err(|e| AutoTagError::manifest(format!("Cannot read {}: {}", path.display(), e)))?;
    let mut doc: Value = serde_json::from_str(&content)
        .map_err(|e| AutoTagError::manifest(format!("Cannot parse {}: {}", path.display(), e)))?;

    let previous = set_version(&mut doc, version, is_lock).ok_or_else(|| {
        AutoTagError::manifest(format!("{} is not a JSON object", path.display()))
    })?;

    if !dry_run {
        let mut out = serde_json::to_string_pretty(&doc)?;
        if content.ends_with('\n') {
            out.push('\n');
        }
        fs::write(path, out).map_err(|e| {
            AutoTagError::manifest(format!("Cannot write {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), %version, "Updated manifest version");
    } else {
        debug!(path = %path.display(), %version, "Would update manifest version");
    }

    Ok(ManifestChange {
        path: path.to_path_buf(),
        previous,
        written: !dry_run,
    })
}

/// Returns the previous top-level version, or `None` if `doc` is not an object.
fn set_version(doc: &mut Value, version: &Version, is_lock: bool) -> Option<Option<String>> {
    let root = doc.as_object_mut()?;
    let previous = root
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);
    root.insert("version".to_string(), Value::String(version.to_string()));

    if is_lock {
        if let Some(entry) = root
            .get_mut("packages")
            .and_then(|packages| packages.get_mut(""))
            .and_then(Value::as_object_mut)
        {
            entry.insert("version".to_string(), Value::String(version.to_string()));
        }
    }

    Some(previous)
}
