//! Space pre-allocation.

use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use hostutil_common::{HostutilError, HostutilResult};

/// Create `path` with permission `mode` and reserve `size` bytes for it.
///
/// An existing file is only truncated and re-allocated when `force` is set.
/// Truncation happens before the allocation, so a forced call whose
/// allocation fails (for example a zero `size`, which Linux rejects with
/// `EINVAL`) leaves the file empty.
pub fn fallocate(path: impl AsRef<Path>, size: u64, mode: u32, force: bool) -> HostutilResult<()> {
    let path = path.as_ref();
    if !force && std::fs::metadata(path).is_ok() {
        return Err(HostutilError::FileExists {
            path: path.to_path_buf(),
        });
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;

    tracing::debug!(path = %path.display(), size, "Allocating file space");
    reserve(&file, size)
}

#[cfg(target_os = "linux")]
fn reserve(file: &std::fs::File, size: u64) -> HostutilResult<()> {
    use rustix::fs::FallocateFlags;

    rustix::fs::fallocate(file, FallocateFlags::empty(), 0, size).map_err(std::io::Error::from)?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn reserve(file: &std::fs::File, size: u64) -> HostutilResult<()> {
    file.set_len(size)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn allocates_requested_size() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("reserved");

        fallocate(&path, 100_000, 0o640, false).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.len(), 100_000);
        assert_eq!(meta.permissions().mode() & 0o777, 0o640);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("reserved");
        std::fs::write(&path, b"keep me").unwrap();

        let err = fallocate(&path, 4096, 0o644, false).unwrap_err();
        assert!(matches!(err, HostutilError::FileExists { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");

        fallocate(&path, 4096, 0o644, true).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_forced_allocation_leaves_file_truncated() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("reserved");
        std::fs::write(&path, b"previous content").unwrap();

        let err = fallocate(&path, 0, 0o644, true).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(hostutil_common::config::EINVAL));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
