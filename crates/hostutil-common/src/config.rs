//! Configuration for mount-point creation and unmount error policy.

use once_cell::sync::Lazy;

use crate::error::{HostutilError, HostutilResult};

/// Mode used for mount points created on demand (owner-only rwx).
pub const DEFAULT_DIR_MODE: u32 = 0o700;

/// `EINVAL` as numbered on Linux, which `umount(2)` returns for a path that
/// is not a mount point. The value is Linux-specific.
pub const EINVAL: i32 = 22;

/// Mount-point directory mode, taken from `HOSTUTIL_DIR_MODE` (octal) when set.
pub static HOSTUTIL_DIR_MODE: Lazy<u32> = Lazy::new(|| {
    std::env::var("HOSTUTIL_DIR_MODE")
        .ok()
        .and_then(|raw| match parse_mode(&raw) {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "Ignoring HOSTUTIL_DIR_MODE");
                None
            }
        })
        .unwrap_or(DEFAULT_DIR_MODE)
});

/// Parse an octal permission mode such as `700`, `0755` or `0o750`.
pub fn parse_mode(raw: &str) -> HostutilResult<u32> {
    let digits = raw.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(HostutilError::InvalidArguments {
            message: format!("invalid octal mode '{raw}'"),
        }),
    }
}

/// Settings shared by the bind and unmount operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// Mode for mount-point directories created by a bind.
    pub dir_mode: u32,
    /// OS error codes from `umount(2)` that a batch unmount reads as
    /// "already unmounted" and does not report.
    ///
    /// `EINVAL` also covers other conditions than "not a mount point";
    /// every listed code is suppressed uniformly.
    pub benign_unmount_errnos: Vec<i32>,
}

impl MountConfig {
    /// Config with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `mode` for created mount points.
    #[must_use]
    pub const fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Replace the set of unmount error codes treated as benign.
    #[must_use]
    pub fn with_benign_unmount_errnos(mut self, errnos: impl IntoIterator<Item = i32>) -> Self {
        self.benign_unmount_errnos = errnos.into_iter().collect();
        self
    }

    /// Whether `errno` from an unmount means the entry was not mounted.
    #[must_use]
    pub fn is_benign_unmount_errno(&self, errno: i32) -> bool {
        self.benign_unmount_errnos.contains(&errno)
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            dir_mode: *HOSTUTIL_DIR_MODE,
            benign_unmount_errnos: vec![EINVAL],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_accepts_octal_forms() {
        assert_eq!(parse_mode("700").unwrap(), 0o700);
        assert_eq!(parse_mode("0755").unwrap(), 0o755);
        assert_eq!(parse_mode("0o750").unwrap(), 0o750);
    }

    #[test]
    fn parse_mode_rejects_garbage() {
        assert!(parse_mode("rwx").is_err());
        assert!(parse_mode("789").is_err());
        assert!(parse_mode("17777").is_err());
    }

    #[test]
    fn default_treats_only_einval_as_benign() {
        let config = MountConfig::default();
        assert!(config.is_benign_unmount_errno(EINVAL));
        assert!(!config.is_benign_unmount_errno(16));
    }

    #[test]
    fn builders_override_defaults() {
        let config = MountConfig::new()
            .with_dir_mode(0o750)
            .with_benign_unmount_errnos([EINVAL, 2]);
        assert_eq!(config.dir_mode, 0o750);
        assert!(config.is_benign_unmount_errno(2));
    }
}
