//! File I/O primitives. Every failure becomes `internal.io_error` with the
//! operation and path in its context.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn io_error(err: std::io::Error, operation: &str, path: &Path) -> Error {
    Error::internal_io(err.to_string(), Some(format!("{} {}", operation, path.display())))
}

/// Read a whole text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(e, "read", path))
}

/// Read a source file, returning `None` when it is not valid UTF-8.
pub fn read_source(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::InvalidData => Ok(None),
        Err(e) => Err(io_error(e, "read", path)),
    }
}

/// Overwrite a file in place.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| io_error(e, "write", path))
}

/// Replace a file through a sibling temp file and a rename.
///
/// A symlinked path is resolved first so the link itself survives, and the
/// replaced file keeps its permissions. The temp file is removed again if
/// anything fails before the rename lands.
pub fn replace_atomically(path: &Path, content: &str) -> Result<()> {
    let target = resolve_symlink(path)?;
    let tmp_path = sibling_tmp_path(&target)?;

    fs::write(&tmp_path, content).map_err(|e| io_error(e, "write temp for", path))?;

    let replaced = match fs::metadata(&target) {
        Ok(meta) => fs::set_permissions(&tmp_path, meta.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
    .and_then(|()| fs::rename(&tmp_path, &target));

    if let Err(e) = replaced {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(e, "replace", path));
    }
    Ok(())
}

fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|e| io_error(e, "resolve", path))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn sibling_tmp_path(path: &Path) -> Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            Ok(parent.join(format!(".{}.pubrename-tmp", name.to_string_lossy())))
        }
        _ => Err(Error::internal_io(
            format!("Not a file path: {}", path.display()),
            Some(format!("replace {}", path.display())),
        )),
    }
}
