//! # hostutil
//!
//! Host filesystem utilities built around bind-mount orchestration.
//!
//! ## Features
//!
//! - **Bind mounts**: bind many source directories under one target root,
//!   creating mount points on demand and continuing past per-source failures
//! - **Teardown**: unmount every directory under a target root, ignoring
//!   entries that are not mounted
//! - **Filesystem helpers**: existence checks, symlink resolution, disk usage,
//!   directory sizes, listings and space pre-allocation
//!
//! ## Usage
//!
//! ```no_run
//! # fn example() -> hostutil_common::HostutilResult<()> {
//! // Bind /srv/a and /srv/b as /mnt/root/a and /mnt/root/b
//! hostutil::mount::bind_mount_all(&["/srv/a", "/srv/b", "/mnt/root"])?;
//!
//! // Tear everything under /mnt/root down again
//! hostutil::mount::unmount_all("/mnt/root")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod fs;
pub mod mount;

pub use mount::{KernelMounts, MountPointName, MountSyscalls, Mounter, UnmountFailure};
