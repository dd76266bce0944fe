//! Source file discovery.

use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::defaults::RenameSettings;

/// A file that may contain package references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub absolute_path: PathBuf,
    /// Path relative to the project root.
    pub relative_path: String,
}

/// Walk `root` and collect every source file outside excluded directories.
///
/// Symbolic links are not followed. A missing root yields no files. Entries
/// that cannot be read are skipped. Results are in traversal order.
pub fn find_source_files(root: &Path, settings: &RenameSettings) -> Vec<CandidateFile> {
    if !root.is_dir() {
        return Vec::new();
    }

    let suffix = format!(".{}", settings.source_extension);

    walk(root, &settings.excluded_segments)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            Some(CandidateFile {
                relative_path: relative.to_string_lossy().to_string(),
                absolute_path: entry.into_path(),
            })
        })
        .collect()
}

/// Readable entries under `root`. Excluded directories are pruned, so their
/// contents are never listed.
fn walk<'a>(root: &'a Path, excluded: &'a [String]) -> impl Iterator<Item = DirEntry> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |entry| match entry.path().strip_prefix(root) {
            Ok(relative) => !is_excluded(relative, excluded),
            Err(_) => true,
        })
        .filter_map(std::result::Result::ok)
}

/// Whether any segment of `relative` is an excluded name.
fn is_excluded(relative: &Path, excluded: &[String]) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(segment) => excluded.iter().any(|e| segment == e.as_str()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "import 'package:app/a.dart';\n").unwrap();
    }

    fn relative_paths(files: &[CandidateFile]) -> Vec<String> {
        let mut paths: Vec<String> = files
            .iter()
            .map(|f| f.relative_path.replace('\\', "/"))
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn finds_dart_files_recursively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lib/main.dart");
        touch(dir.path(), "lib/src/widgets/button.dart");
        touch(dir.path(), "test/main_test.dart");
        touch(dir.path(), "README.md");
        touch(dir.path(), "lib/notes.dart.txt");

        let files = find_source_files(dir.path(), &RenameSettings::default());

        assert_eq!(
            relative_paths(&files),
            vec!["lib/main.dart", "lib/src/widgets/button.dart", "test/main_test.dart"]
        );
        for file in &files {
            assert!(file.absolute_path.starts_with(dir.path()));
        }
    }

    #[test]
    fn skips_build_and_tool_cache_segments() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lib/main.dart");
        touch(dir.path(), "build/generated/main.dart");
        touch(dir.path(), ".dart_tool/build/entrypoint.dart");
        touch(dir.path(), "packages/core/build/out.dart");
        touch(dir.path(), "packages/core/.dart_tool/flutter_build/x.dart");

        let files = find_source_files(dir.path(), &RenameSettings::default());

        assert_eq!(relative_paths(&files), vec!["lib/main.dart"]);
        for file in &files {
            assert!(!file.relative_path.contains("build"));
            assert!(!file.relative_path.contains(".dart_tool"));
        }
    }

    #[test]
    fn segment_match_is_exact() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lib/builder/main.dart");
        touch(dir.path(), "lib/build.dart");

        let files = find_source_files(dir.path(), &RenameSettings::default());

        assert_eq!(
            relative_paths(&files),
            vec!["lib/build.dart", "lib/builder/main.dart"]
        );
    }

    #[test]
    fn root_under_build_directory_is_still_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build").join("app");
        touch(&root, "lib/main.dart");

        let files = find_source_files(&root, &RenameSettings::default());

        assert_eq!(relative_paths(&files), vec!["lib/main.dart"]);
    }

    #[test]
    fn nonexistent_root_returns_empty() {
        let dir = TempDir::new().unwrap();
        let files = find_source_files(&dir.path().join("missing"), &RenameSettings::default());
        assert!(files.is_empty());
    }

    #[test]
    fn honors_configured_extension_and_segments() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/a.kt");
        touch(dir.path(), "gen/b.kt");
        touch(dir.path(), "build/c.kt");
        touch(dir.path(), "src/d.dart");

        let settings = RenameSettings {
            source_extension: "kt".to_string(),
            excluded_segments: vec!["gen".to_string()],
            ..RenameSettings::default()
        };
        let files = find_source_files(dir.path(), &settings);

        assert_eq!(relative_paths(&files), vec!["build/c.kt", "src/a.kt"]);
    }

    #[test]
    fn excluded_directories_are_pruned_from_the_walk() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lib/main.dart");
        touch(dir.path(), "build/intermediates/deep/nested/a.dart");
        touch(dir.path(), ".dart_tool/pub/bin/b.dart");

        let settings = RenameSettings::default();
        let visited: Vec<PathBuf> = walk(dir.path(), &settings.excluded_segments)
            .map(|entry| entry.into_path())
            .collect();

        assert!(visited.iter().any(|p| p.ends_with("lib/main.dart")));
        for path in &visited {
            let relative = path.strip_prefix(dir.path()).unwrap();
            assert!(
                !is_excluded(relative, &settings.excluded_segments),
                "walked into {}",
                relative.display()
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn does_not_follow_symlinked_directories() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "lib/outside.dart");
        touch(dir.path(), "lib/main.dart");
        std::os::unix::fs::symlink(outside.path().join("lib"), dir.path().join("linked")).unwrap();

        let files = find_source_files(dir.path(), &RenameSettings::default());

        assert_eq!(relative_paths(&files), vec!["lib/main.dart"]);
    }
}
