//! Directory listings.

use std::ffi::OsString;
use std::fs::DirEntry;
use std::path::{Path, PathBuf};

use hostutil_common::{HostutilError, HostutilResult};

fn entries(dir: &Path) -> HostutilResult<Vec<DirEntry>> {
    let list_error = |error: std::io::Error| HostutilError::ListDir {
        path: dir.to_path_buf(),
        error,
    };
    let mut entries = std::fs::read_dir(dir)
        .map_err(list_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(list_error)?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

/// Names of the directories directly inside `dir`, sorted.
///
/// Symlinks to directories are not included.
pub fn ls_dirs(dir: impl AsRef<Path>) -> HostutilResult<Vec<OsString>> {
    let dir = dir.as_ref();
    let mut names = Vec::new();
    for entry in entries(dir)? {
        let file_type = entry.file_type().map_err(|error| HostutilError::ListDir {
            path: entry.path(),
            error,
        })?;
        if file_type.is_dir() {
            names.push(entry.file_name());
        }
    }
    Ok(names)
}

/// Names of all entries directly inside `dir`, sorted.
pub fn ls_names(dir: impl AsRef<Path>) -> HostutilResult<Vec<OsString>> {
    Ok(entries(dir.as_ref())?
        .iter()
        .map(DirEntry::file_name)
        .collect())
}

/// Paths of all entries directly inside `dir`, sorted.
pub fn ls_names_abs(dir: impl AsRef<Path>) -> HostutilResult<Vec<PathBuf>> {
    Ok(entries(dir.as_ref())?.iter().map(DirEntry::path).collect())
}
