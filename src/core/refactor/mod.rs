//! Package renaming: rewrite a project's declared name and every reference to it.
//!
//! Walks source files, rewrites `package:<old>` imports with literal substring
//! matching, updates the manifest and package cache, and optionally refreshes
//! dependencies. Every step supports a dry run.

mod discovery;
mod manifest;
mod package_cache;
mod references;
mod refresh;
mod rename;

pub use discovery::{find_source_files, CandidateFile};
pub use manifest::{read_manifest_name, update_manifest_name};
pub use package_cache::{update_package_cache, CacheUpdate, PackageCacheDocument};
pub use references::{reference_marker, rewrite_references, Rewrite};
pub use refresh::{run_refresh, RefreshOutcome, RefreshStep};
pub use rename::{rename_project, FileEdit, RenameRequest, RenameStage, RenameSummary};
