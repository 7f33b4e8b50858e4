//! Existence checks and symlink resolution.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hostutil_common::{BatchErrors, HostutilError, HostutilResult};

/// Whether `path` exists and is not a directory.
///
/// A missing path is `Ok(false)`; an existing directory is an error.
pub fn file_exists(path: impl AsRef<Path>) -> HostutilResult<bool> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(HostutilError::IsDirectory {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Whether `path` exists and is a directory.
///
/// A missing path is `Ok(false)`; an existing non-directory is an error.
pub fn dir_exists(path: impl AsRef<Path>) -> HostutilResult<bool> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => Err(HostutilError::NotDirectory {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Whether `path` itself is a symbolic link. Unreadable paths are not.
pub fn is_symlink(path: impl AsRef<Path>) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

/// Outcome of [`resolve_symlinks`].
#[derive(Debug)]
pub struct SymlinkResolution {
    /// One entry per input, in input order. Inputs that failed to resolve
    /// are kept unchanged.
    pub paths: Vec<PathBuf>,
    /// Inputs that could not be resolved.
    pub errors: BatchErrors,
}

impl SymlinkResolution {
    /// The resolved paths, or the aggregate error if any input failed.
    pub fn into_result(self) -> HostutilResult<Vec<PathBuf>> {
        self.errors.into_result()?;
        Ok(self.paths)
    }
}

/// Resolve every symlink in each of `paths` to a canonical absolute path.
pub fn resolve_symlinks<P: AsRef<Path>>(paths: &[P]) -> SymlinkResolution {
    let mut errors = BatchErrors::new();
    let paths: Vec<PathBuf> = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            std::fs::canonicalize(path).unwrap_or_else(|error| {
                errors.push(
                    path,
                    HostutilError::Resolve {
                        path: path.to_path_buf(),
                        error,
                    },
                );
                path.to_path_buf()
            })
        })
        .collect();
    SymlinkResolution { paths, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn file_exists_distinguishes_kinds() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, b"content").unwrap();

        assert!(file_exists(&file).unwrap());
        assert!(!file_exists(temp.path().join("missing")).unwrap());
        assert!(matches!(
            file_exists(temp.path()),
            Err(HostutilError::IsDirectory { .. })
        ));
    }

    #[test]
    fn dir_exists_distinguishes_kinds() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, b"content").unwrap();

        assert!(dir_exists(temp.path()).unwrap());
        assert!(!dir_exists(temp.path().join("missing")).unwrap());
        assert!(matches!(
            dir_exists(&file),
            Err(HostutilError::NotDirectory { .. })
        ));
    }

    #[test]
    fn detects_symlinks() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        let link = temp.path().join("link");
        std::fs::write(&file, b"content").unwrap();
        symlink(&file, &link).unwrap();

        assert!(is_symlink(&link));
        assert!(!is_symlink(&file));
        assert!(!is_symlink(temp.path().join("missing")));
    }

    #[test]
    fn resolves_links_and_keeps_failures_in_place() {
        let temp = tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let dir = root.join("real");
        std::fs::create_dir(&dir).unwrap();
        let link = root.join("link");
        symlink(&dir, &link).unwrap();
        let missing = root.join("missing");

        let resolution = resolve_symlinks(&[link, missing.clone()]);
        assert_eq!(resolution.paths, vec![dir, missing.clone()]);
        assert_eq!(resolution.errors.subjects(), vec![missing.as_path()]);
        assert!(resolution.into_result().is_err());
    }
}
