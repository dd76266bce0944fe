//! Rename transaction: rename a package and everything that refers to it.
//!
//! Given a `RenameRequest` (old → new), the transaction:
//! 1. Rewrites the declared `name:` in the manifest
//! 2. Walks the source tree rewriting `package:<old>` references
//! 3. Renames the project's own entry in the package cache
//! 4. Optionally refreshes dependencies once the cache changed
//!
//! Steps run strictly in order. Nothing is rolled back: when a step fails,
//! the steps before it stay applied. In a dry run every decision is made and
//! reported but no file is written.

use std::path::Path;

use serde::Serialize;

use crate::defaults::RenameSettings;
use crate::error::{Error, Result};
use crate::utils::{io, validation};

use super::discovery::find_source_files;
use super::manifest::update_manifest_name;
use super::package_cache::{update_package_cache, CacheUpdate};
use super::references::{reference_marker, rewrite_references};
use super::refresh::{run_refresh, RefreshOutcome};

// ============================================================================
// Types
// ============================================================================

/// Inputs for one rename transaction.
#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub old_name: String,
    pub new_name: String,
    /// Decide everything, write nothing.
    pub dry_run: bool,
    /// Log every changed file, not just stage transitions.
    pub verbose: bool,
    /// Run the dependency refresh after the package cache is rewritten.
    pub refresh: bool,
}

/// Where a transaction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameStage {
    Idle,
    UpdatingManifest,
    UpdatingImports,
    UpdatingCache,
    Done,
    Failed,
}

impl RenameStage {
    pub fn describe(&self) -> &'static str {
        match self {
            RenameStage::Idle => "starting",
            RenameStage::UpdatingManifest => "updating the manifest",
            RenameStage::UpdatingImports => "updating imports",
            RenameStage::UpdatingCache => "updating the package cache",
            RenameStage::Done => "finishing",
            RenameStage::Failed => "failed",
        }
    }
}

/// References rewritten in one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// File path relative to the project root.
    pub file: String,
    /// Number of `package:<old>` occurrences replaced.
    pub replacements: usize,
}

/// What a transaction changed (or, in a dry run, would change).
#[derive(Debug, Clone, Serialize)]
pub struct RenameSummary {
    pub old_name: String,
    pub new_name: String,
    pub dry_run: bool,
    pub manifest_updated: bool,
    /// Relative paths of rewritten source files, in discovery order.
    pub files_changed: Vec<String>,
    pub edits: Vec<FileEdit>,
    pub total_references: usize,
    pub cache_updated: bool,
    /// `None` when the cache step failed (see `warnings`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<RefreshOutcome>,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<String>,
    /// Stages entered, in order.
    pub stages: Vec<RenameStage>,
    /// Progress lines as emitted, including verbose per-file lines.
    pub log: Vec<String>,
}

impl RenameSummary {
    fn new(request: &RenameRequest) -> Self {
        Self {
            old_name: request.old_name.clone(),
            new_name: request.new_name.clone(),
            dry_run: request.dry_run,
            manifest_updated: false,
            files_changed: Vec::new(),
            edits: Vec::new(),
            total_references: 0,
            cache_updated: false,
            cache: None,
            refresh: None,
            warnings: Vec::new(),
            stages: Vec::new(),
            log: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        log_status!("rename", "Warning: {}", message);
        self.warnings.push(message);
    }
}

// ============================================================================
// Transaction
// ============================================================================

struct Transaction<'a> {
    root: &'a Path,
    request: &'a RenameRequest,
    settings: &'a RenameSettings,
    stage: RenameStage,
    summary: RenameSummary,
}

impl<'a> Transaction<'a> {
    fn enter(&mut self, stage: RenameStage, message: String) {
        self.stage = stage;
        self.summary.stages.push(stage);
        self.progress(&message);
    }

    fn progress(&mut self, message: &str) {
        let line = progress_line(self.request.dry_run, message);
        log_status!("rename", "{}", line);
        self.summary.log.push(line);
    }

    fn detail(&mut self, message: &str) {
        if self.request.verbose {
            self.progress(message);
        }
    }

    fn run(&mut self) -> Result<()> {
        self.update_manifest()?;
        self.update_imports()?;
        self.update_cache();
        Ok(())
    }

    fn update_manifest(&mut self) -> Result<()> {
        let path = self.settings.manifest_path(self.root);
        self.enter(
            RenameStage::UpdatingManifest,
            format!(
                "Updating {}: name {} -> {}",
                self.settings.manifest_file, self.request.old_name, self.request.new_name
            ),
        );

        update_manifest_name(
            &path,
            &self.request.old_name,
            &self.request.new_name,
            self.request.dry_run,
        )?;
        self.summary.manifest_updated = true;
        Ok(())
    }

    fn update_imports(&mut self) -> Result<()> {
        self.enter(
            RenameStage::UpdatingImports,
            format!(
                "Rewriting {} imports in .{} files",
                reference_marker(&self.request.old_name),
                self.settings.source_extension
            ),
        );

        for file in find_source_files(self.root, self.settings) {
            let Some(content) = io::read_source(&file.absolute_path)? else {
                self.summary
                    .warn(format!("Skipped {}: not valid UTF-8", file.relative_path));
                continue;
            };

            let rewrite = rewrite_references(&content, &self.request.old_name, &self.request.new_name);
            if !rewrite.changed {
                continue;
            }

            if !self.request.dry_run {
                io::write_text(&file.absolute_path, &rewrite.content)?;
            }

            let verb = if self.request.dry_run { "Would update" } else { "Updated" };
            self.detail(&format!(
                "{} {} ({} reference{})",
                verb,
                file.relative_path,
                rewrite.occurrences,
                if rewrite.occurrences == 1 { "" } else { "s" }
            ));

            self.summary.total_references += rewrite.occurrences;
            self.summary.files_changed.push(file.relative_path.clone());
            self.summary.edits.push(FileEdit {
                file: file.relative_path,
                replacements: rewrite.occurrences,
            });
        }

        Ok(())
    }

    /// Never fails the transaction: problems become warnings.
    fn update_cache(&mut self) {
        let path = self.settings.package_cache_path(self.root);
        self.enter(
            RenameStage::UpdatingCache,
            format!("Updating {}", self.settings.package_cache),
        );

        let update = match update_package_cache(
            &path,
            &self.settings.root_uri,
            &self.request.old_name,
            &self.request.new_name,
            self.request.dry_run,
        ) {
            Ok(update) => update,
            Err(err) => {
                self.summary
                    .warn(format!("Package cache not updated: {}", err.message));
                return;
            }
        };

        match &update {
            CacheUpdate::NotFound => {
                self.detail(&format!("No {} found, skipping", self.settings.package_cache));
            }
            CacheUpdate::Unchanged => {
                self.detail(&format!(
                    "No root entry named {} in {}",
                    self.request.old_name, self.settings.package_cache
                ));
            }
            CacheUpdate::Updated { entries } => {
                self.summary.cache_updated = true;
                self.detail(&format!(
                    "Renamed {} package cache entr{}",
                    entries,
                    if *entries == 1 { "y" } else { "ies" }
                ));
            }
        }

        let refresh_wanted = self.summary.cache_updated
            && !self.request.dry_run
            && self.request.refresh
            && self.settings.refresh.enabled;
        self.summary.cache = Some(update);

        if refresh_wanted {
            let outcome = run_refresh(self.root, &self.settings.refresh);
            if !outcome.succeeded() {
                self.summary.warn(
                    "Dependency refresh did not complete; run it manually".to_string(),
                );
            }
            self.summary.refresh = Some(outcome);
        }
    }

    fn finish(mut self) -> RenameSummary {
        let files = self.summary.files_changed.len();
        let references = self.summary.total_references;
        let verb = if self.request.dry_run { "Would rename" } else { "Renamed" };
        self.enter(
            RenameStage::Done,
            format!(
                "{} {} -> {}: {} file{}, {} reference{}",
                verb,
                self.request.old_name,
                self.request.new_name,
                files,
                if files == 1 { "" } else { "s" },
                references,
                if references == 1 { "" } else { "s" },
            ),
        );
        self.summary
    }

    fn fail(mut self, err: Error) -> Error {
        let failed_in = self.stage;
        self.enter(
            RenameStage::Failed,
            format!("Failed while {}: {}", failed_in.describe(), err.message),
        );
        Error::rename_failed(
            failed_in.describe(),
            &self.request.old_name,
            &self.request.new_name,
            err,
        )
    }
}

/// A progress line, tagged `[dry-run]` when nothing is being written.
fn progress_line(dry_run: bool, message: &str) -> String {
    if dry_run {
        format!("[dry-run] {}", message)
    } else {
        message.to_string()
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Rename the package in `root` from `request.old_name` to `request.new_name`.
///
/// Equal names are a no-op, checked before any validation: nothing is read
/// or written and an empty summary is returned. A failed step is wrapped in a single `rename.failed` error
/// naming the stage; no summary is returned in that case.
pub fn rename_project(
    root: &Path,
    request: &RenameRequest,
    settings: &RenameSettings,
) -> Result<RenameSummary> {
    if request.old_name == request.new_name {
        log_status!("rename", "Package is already named {}", request.new_name);
        return Ok(RenameSummary::new(request));
    }

    if request.old_name.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "old_name",
            "Current package name is empty",
            None,
        ));
    }
    validation::require_valid_package_name(&request.new_name, "name")?;

    let mut tx = Transaction {
        root,
        request,
        settings,
        stage: RenameStage::Idle,
        summary: RenameSummary::new(request),
    };

    match tx.run() {
        Ok(()) => Ok(tx.finish()),
        Err(err) => Err(tx.fail(err)),
    }
}

// ============================================================================
// Tests
// ============================================================================
