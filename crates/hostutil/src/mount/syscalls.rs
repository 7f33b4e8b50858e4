//! Kernel boundary for bind and unmount.

use std::io;
use std::path::Path;

use hostutil_common::MountConfig;

/// How an unmount failure should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmountFailure {
    /// The path was not (or no longer) a mount point.
    AlreadyUnmounted,
    /// Any other failure.
    Other,
}

/// Mount syscalls used by [`Mounter`](super::Mounter).
pub trait MountSyscalls {
    /// Bind `source` onto `target` with no filesystem type and no options.
    fn bind(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Unmount `target` without flags (neither lazy nor forced).
    fn unmount(&self, target: &Path) -> io::Result<()>;

    /// Classify an error returned by [`Self::unmount`].
    fn classify_unmount_error(&self, error: &io::Error) -> UnmountFailure;
}

/// [`MountSyscalls`] backed by the host kernel.
#[derive(Debug, Clone)]
pub struct KernelMounts {
    config: MountConfig,
}

impl KernelMounts {
    /// Kernel syscalls using the unmount policy from `config`.
    #[must_use]
    pub fn new(config: &MountConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Default for KernelMounts {
    fn default() -> Self {
        Self::new(&MountConfig::default())
    }
}

impl MountSyscalls for KernelMounts {
    #[cfg(target_os = "linux")]
    fn bind(&self, source: &Path, target: &Path) -> io::Result<()> {
        tracing::debug!(
            source = %source.display(),
            target = %target.display(),
            "Creating bind mount"
        );
        rustix::mount::mount_bind(source, target)?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn bind(&self, _source: &Path, _target: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "bind mounts are only supported on Linux",
        ))
    }

    #[cfg(target_os = "linux")]
    fn unmount(&self, target: &Path) -> io::Result<()> {
        use rustix::mount::UnmountFlags;

        tracing::debug!(target = %target.display(), "Unmounting");
        rustix::mount::unmount(target, UnmountFlags::empty())?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn unmount(&self, _target: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "unmount is only supported on Linux",
        ))
    }

    fn classify_unmount_error(&self, error: &io::Error) -> UnmountFailure {
        match error.raw_os_error() {
            Some(code) if self.config.is_benign_unmount_errno(code) => {
                UnmountFailure::AlreadyUnmounted
            }
            _ => UnmountFailure::Other,
        }
    }
}
