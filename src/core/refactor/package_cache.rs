//! Package cache (`.dart_tool/package_config.json`) updates.
//!
//! The document is handled as an ordered JSON object so that every field the
//! rename does not touch is written back exactly as it was read, in the same
//! order.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::utils::io;

/// Result of a package cache update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheUpdate {
    /// No cache file exists.
    NotFound,
    /// The cache has no root entry carrying the old name.
    Unchanged,
    /// Root entries were renamed (and written unless dry-running).
    Updated { entries: usize },
}

/// A parsed package cache document.
#[derive(Debug, Clone)]
pub struct PackageCacheDocument {
    root: Map<String, Value>,
}

impl PackageCacheDocument {
    /// Parse the document, requiring a top-level object with a `packages` array.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::cache_parse_error(path.display().to_string(), e.to_string()))?;

        let Value::Object(root) = value else {
            return Err(Error::cache_parse_error(
                path.display().to_string(),
                "top-level value is not an object",
            ));
        };

        match root.get("packages") {
            Some(Value::Array(_)) => Ok(Self { root }),
            Some(_) => Err(Error::cache_parse_error(
                path.display().to_string(),
                "'packages' is not an array",
            )),
            None => Err(Error::cache_parse_error(
                path.display().to_string(),
                "missing 'packages'",
            )),
        }
    }

    /// Rename entries whose `rootUri` is `root_uri` and whose `name` is
    /// `old_name`. Returns how many entries changed.
    pub fn rename_root_package(&mut self, root_uri: &str, old_name: &str, new_name: &str) -> usize {
        let Some(Value::Array(packages)) = self.root.get_mut("packages") else {
            return 0;
        };

        let mut renamed = 0;
        for entry in packages.iter_mut() {
            let Value::Object(fields) = entry else {
                continue;
            };
            let is_root = fields.get("rootUri").and_then(Value::as_str) == Some(root_uri);
            let is_old = fields.get("name").and_then(Value::as_str) == Some(old_name);
            if is_root && is_old {
                fields.insert("name".to_string(), Value::String(new_name.to_string()));
                renamed += 1;
            }
        }
        renamed
    }

    /// Pretty-printed JSON with 2-space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize package cache".to_string())))
    }
}

/// Rename the project's own entry in the package cache at `path`.
///
/// A missing cache is not an error. The file is only rewritten when at least
/// one entry changed and `dry_run` is false.
pub fn update_package_cache(
    path: &Path,
    root_uri: &str,
    old_name: &str,
    new_name: &str,
    dry_run: bool,
) -> Result<CacheUpdate> {
    if !path.is_file() {
        return Ok(CacheUpdate::NotFound);
    }

    let content = io::read_text(path)?;
    let mut document = PackageCacheDocument::parse(&content, path)?;

    let entries = document.rename_root_package(root_uri, old_name, new_name);
    if entries == 0 {
        return Ok(CacheUpdate::Unchanged);
    }

    if !dry_run {
        let serialized = document.to_pretty_json()?;
        io::replace_atomically(path, &serialized)?;
    }

    Ok(CacheUpdate::Updated { entries })
}
