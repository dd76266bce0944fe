use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-level settings file, looked up in the project root.
pub const SETTINGS_FILE: &str = "pubrename.json";

/// All configurable defaults that can be overridden via pubrename.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSettings {
    /// Manifest declaring the package name, relative to the project root.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Extension (without the dot) of files scanned for package references.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Path segments that exclude a file from discovery (build output, tool cache).
    #[serde(default = "default_excluded_segments")]
    pub excluded_segments: Vec<String>,

    /// Generated package cache document, relative to the project root.
    #[serde(default = "default_package_cache")]
    pub package_cache: String,

    /// `rootUri` value marking the project's own entry in the package cache.
    #[serde(default = "default_root_uri")]
    pub root_uri: String,

    #[serde(default = "default_refresh")]
    pub refresh: RefreshSettings,
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            manifest_file: default_manifest_file(),
            source_extension: default_source_extension(),
            excluded_segments: default_excluded_segments(),
            package_cache: default_package_cache(),
            root_uri: default_root_uri(),
            refresh: default_refresh(),
        }
    }
}

impl RenameSettings {
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest_file)
    }

    pub fn package_cache_path(&self, root: &Path) -> PathBuf {
        root.join(&self.package_cache)
    }
}

/// Commands run after the package cache was rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_refresh_enabled")]
    pub enabled: bool,

    #[serde(default = "default_clean_command")]
    pub clean: Vec<String>,

    #[serde(default = "default_fetch_command")]
    pub fetch: Vec<String>,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        default_refresh()
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_manifest_file() -> String {
    "pubspec.yaml".to_string()
}

fn default_source_extension() -> String {
    "dart".to_string()
}

fn default_excluded_segments() -> Vec<String> {
    vec!["build".to_string(), ".dart_tool".to_string()]
}

fn default_package_cache() -> String {
    ".dart_tool/package_config.json".to_string()
}

fn default_root_uri() -> String {
    "../".to_string()
}

fn default_refresh() -> RefreshSettings {
    RefreshSettings {
        enabled: default_refresh_enabled(),
        clean: default_clean_command(),
        fetch: default_fetch_command(),
    }
}

fn default_refresh_enabled() -> bool {
    true
}

fn default_clean_command() -> Vec<String> {
    vec!["flutter".to_string(), "clean".to_string()]
}

fn default_fetch_command() -> Vec<String> {
    vec!["flutter".to_string(), "pub".to_string(), "get".to_string()]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load settings for a project, merging `<root>/pubrename.json` with
/// built-in defaults. A missing file yields the defaults; an unreadable or
/// invalid one is reported and the defaults are used.
pub fn load_settings(root: &Path) -> RenameSettings {
    match load_settings_from_file(root) {
        Ok(Some(settings)) => settings,
        Ok(None) => RenameSettings::default(),
        Err(err) => {
            log_status!("config", "Ignoring {}: {}", SETTINGS_FILE, err.message);
            RenameSettings::default()
        }
    }
}

/// Attempt to load settings from pubrename.json in the project root.
fn load_settings_from_file(root: &Path) -> crate::Result<Option<RenameSettings>> {
    let path = root.join(SETTINGS_FILE);

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let settings: RenameSettings = serde_json::from_str(&content).map_err(|e| {
        crate::Error::validation_invalid_json(e, Some(format!("parse {}", path.display())))
    })?;

    Ok(Some(settings))
}
