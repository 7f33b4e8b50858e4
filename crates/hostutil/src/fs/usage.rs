//! Disk usage statistics and directory sizes.

use std::path::{Path, PathBuf};

use hostutil_common::HostutilResult;
use serde::Serialize;
use walkdir::WalkDir;

/// Space and inode usage of the filesystem holding a path.
#[derive(Debug, Clone, Serialize)]
pub struct FsUsage {
    /// Path the statistics were taken for.
    pub path: PathBuf,
    /// Total size in bytes.
    pub total: u64,
    /// Bytes available to unprivileged users.
    pub free: u64,
    /// Bytes in use.
    pub used: u64,
    /// `used` as a percentage of `used + free`.
    pub used_percent: f64,
    /// Total inodes.
    pub inodes_total: u64,
    /// Free inodes.
    pub inodes_free: u64,
    /// Inodes in use.
    pub inodes_used: u64,
    /// `inodes_used` as a percentage of `inodes_total`.
    pub inodes_used_percent: f64,
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Usage statistics for the filesystem containing `path`.
pub fn fs_usage(path: impl AsRef<Path>) -> HostutilResult<FsUsage> {
    let path = path.as_ref();
    let stat = rustix::fs::statvfs(path).map_err(std::io::Error::from)?;

    Ok(FsUsage::from_counters(
        path,
        stat.f_frsize,
        (stat.f_blocks, stat.f_bfree, stat.f_bavail),
        (stat.f_files, stat.f_ffree),
    ))
}

impl FsUsage {
    /// Build from raw `statvfs` counters. Some network and FUSE filesystems
    /// report free counts above the totals; those clamp to zero usage.
    fn from_counters(
        path: &Path,
        fragment_size: u64,
        (blocks, blocks_free, blocks_avail): (u64, u64, u64),
        (files, files_free): (u64, u64),
    ) -> Self {
        let total = blocks.saturating_mul(fragment_size);
        let free = blocks_avail.saturating_mul(fragment_size);
        let used = blocks.saturating_sub(blocks_free).saturating_mul(fragment_size);
        let inodes_used = files.saturating_sub(files_free);

        Self {
            path: path.to_path_buf(),
            total,
            free,
            used,
            used_percent: percent(used, used.saturating_add(free)),
            inodes_total: files,
            inodes_free: files_free,
            inodes_used,
            inodes_used_percent: percent(inodes_used, files),
        }
    }
}

/// Apparent size in bytes of `path` and everything beneath it.
///
/// Works like `du --apparent-size -b`: sizes of directories and symlinks
/// themselves are counted, links are not followed.
pub fn dir_size(path: impl AsRef<Path>) -> HostutilResult<u64> {
    let mut size = 0;
    for entry in WalkDir::new(path)
        .follow_links(false)
        .follow_root_links(false)
    {
        let entry = entry.map_err(std::io::Error::from)?;
        size += entry.metadata().map_err(std::io::Error::from)?.len();
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn usage_is_consistent() {
        let temp = tempdir().unwrap();
        let usage = fs_usage(temp.path()).unwrap();

        assert!(usage.total > 0);
        assert!(usage.used <= usage.total);
        assert!(usage.free <= usage.total);
        assert!((0.0..=100.0).contains(&usage.used_percent));
        assert_eq!(usage.inodes_used, usage.inodes_total - usage.inodes_free);
    }

    #[test]
    fn usage_serializes_to_json() {
        let temp = tempdir().unwrap();
        let usage = fs_usage(temp.path()).unwrap();
        let json = serde_json::to_value(&usage).unwrap();
        assert!(json.get("used_percent").is_some());
        assert_eq!(json["total"], usage.total);
    }

    #[test]
    fn inconsistent_counters_do_not_underflow() {
        let usage = FsUsage::from_counters(Path::new("/mnt/fuse"), 4096, (10, 12, 12), (5, 9));

        assert_eq!(usage.used, 0);
        assert_eq!(usage.inodes_used, 0);
        assert_eq!(usage.total, 40_960);
        assert!((usage.used_percent - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dir_size_counts_tree() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("tree");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("a"), vec![0u8; 1000]).unwrap();
        std::fs::write(root.join("sub").join("b"), vec![0u8; 234]).unwrap();
        symlink(root.join("a"), root.join("link")).unwrap();

        let dirs = std::fs::symlink_metadata(&root).unwrap().len()
            + std::fs::symlink_metadata(root.join("sub")).unwrap().len();
        let link = std::fs::symlink_metadata(root.join("link")).unwrap().len();
        assert_eq!(dir_size(&root).unwrap(), dirs + link + 1234);
    }

    #[test]
    fn dir_size_of_file_is_its_length() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("f");
        std::fs::write(&file, b"12345").unwrap();
        assert_eq!(dir_size(&file).unwrap(), 5);
    }

    #[test]
    fn dir_size_of_missing_path_fails() {
        let temp = tempdir().unwrap();
        assert!(dir_size(temp.path().join("missing")).is_err());
    }
}
