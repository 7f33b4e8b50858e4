//! Bind-mount orchestration.
//!
//! This module handles:
//! - Deriving mount-point names from source directories
//! - Binding one or many source directories under a target root
//! - Unmounting one mount point or everything under a target root
//!
//! The free functions use a kernel-backed [`Mounter`] with the default
//! [`MountConfig`](hostutil_common::MountConfig). Mounting needs root.

mod mounter;
mod name;
mod syscalls;

use std::path::Path;

use hostutil_common::HostutilResult;

pub use mounter::Mounter;
pub use name::{MountPointName, base_name};
pub use syscalls::{KernelMounts, MountSyscalls, UnmountFailure};

/// Bind mount directory `source` on `target`, creating `target` if needed.
pub fn bind_mount(source: impl AsRef<Path>, target: impl AsRef<Path>) -> HostutilResult<()> {
    Mounter::new().bind_mount(source.as_ref(), target.as_ref())
}

/// Bind `dirs[..n-1]` under the target root `dirs[n-1]`.
pub fn bind_mount_all<P: AsRef<Path>>(dirs: &[P]) -> HostutilResult<()> {
    Mounter::new().bind_mount_all(dirs)
}

/// Unmount `mountpoint` without flags.
pub fn unmount(mountpoint: impl AsRef<Path>) -> HostutilResult<()> {
    Mounter::new().unmount(mountpoint.as_ref())
}

/// Unmount every direct subdirectory of `root`, ignoring ones not mounted.
pub fn unmount_all(root: impl AsRef<Path>) -> HostutilResult<()> {
    Mounter::new().unmount_all(root.as_ref())
}
