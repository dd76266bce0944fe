//! Manifest (`pubspec.yaml`) name handling.

use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

fn name_line(name: &str) -> String {
    format!("name: {}", name)
}

/// Read the declared package name from the manifest.
pub fn read_manifest_name(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::manifest_not_found(path.display().to_string()));
    }

    let content = io::read_text(path)?;
    let doc: serde_yml::Value = serde_yml::from_str(&content)
        .map_err(|e| Error::manifest_invalid_yaml(path.display().to_string(), e.to_string()))?;

    doc.get("name")
        .and_then(|name| name.as_str())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::manifest_missing_name(path.display().to_string(), None))
}

/// Replace the first `name: <old_name>` line with `name: <new_name>`.
///
/// Later occurrences (e.g. under a dependency section) are left alone. In a
/// dry run the replacement is checked but nothing is written.
pub fn update_manifest_name(path: &Path, old_name: &str, new_name: &str, dry_run: bool) -> Result<()> {
    if !path.is_file() {
        return Err(Error::manifest_not_found(path.display().to_string()));
    }

    let content = io::read_text(path)?;
    let old_line = name_line(old_name);

    if !content.contains(&old_line) {
        return Err(Error::manifest_missing_name(
            path.display().to_string(),
            Some(old_name.to_string()),
        ));
    }

    if dry_run {
        return Ok(());
    }

    let updated = content.replacen(&old_line, &name_line(new_name), 1);
    io::write_text(path, &updated)
}
