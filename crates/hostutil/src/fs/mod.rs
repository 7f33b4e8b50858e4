//! Host filesystem helpers.
//!
//! This module handles:
//! - File and directory existence checks
//! - Symlink detection and resolution
//! - Directory listings
//! - Disk usage and recursive directory sizes
//! - Space pre-allocation for files

mod alloc;
mod exists;
mod list;
mod usage;

pub use alloc::fallocate;
pub use exists::{SymlinkResolution, dir_exists, file_exists, is_symlink, resolve_symlinks};
pub use list::{ls_dirs, ls_names, ls_names_abs};
pub use usage::{FsUsage, dir_size, fs_usage};
