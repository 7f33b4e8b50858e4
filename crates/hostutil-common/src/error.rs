//! Common error types for hostutil.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::batch::BatchErrors;

/// Result type alias using [`HostutilError`].
pub type HostutilResult<T> = Result<T, HostutilError>;

/// Errors reported by hostutil operations.
#[derive(Error, Diagnostic, Debug)]
pub enum HostutilError {
    /// The caller supplied an unusable argument list.
    #[error("{message}")]
    #[diagnostic(code(hostutil::invalid_arguments))]
    InvalidArguments {
        /// What was wrong with the arguments.
        message: String,
    },

    /// A source path resolved to a mount-point name that must never be used.
    #[error("refusing to mount on mountpoint {name}")]
    #[diagnostic(
        code(hostutil::mount::refused_mountpoint),
        help("Pass source directories without a trailing '.', '..' or bare '/'")
    )]
    RefusedMountPoint {
        /// The rejected name.
        name: String,
    },

    /// Bind source is missing or not a directory.
    #[error("source dir {} doesn't exist or is not a directory", .path.display())]
    #[diagnostic(code(hostutil::mount::source_not_directory))]
    SourceNotDirectory {
        /// The offending source path.
        path: PathBuf,
    },

    /// Mount point exists but is not a directory.
    #[error(
        "couldn't create mountpoint {}: a non-directory with the same name already exists",
        .path.display()
    )]
    #[diagnostic(code(hostutil::mount::target_not_directory))]
    TargetNotDirectory {
        /// The offending target path.
        path: PathBuf,
    },

    /// Mount point directory could not be created.
    #[error("couldn't create mountpoint {}: {error}", .path.display())]
    #[diagnostic(code(hostutil::mount::create_mountpoint))]
    CreateMountPoint {
        /// The mount point that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The kernel rejected a bind mount.
    #[error("couldn't bind {} on {}: {error}", .source_dir.display(), .target.display())]
    #[diagnostic(
        code(hostutil::mount::bind),
        help("Bind mounts need CAP_SYS_ADMIN; try running as root")
    )]
    Mount {
        /// Directory being bound.
        source_dir: PathBuf,
        /// Mount point.
        target: PathBuf,
        /// The error reported by the kernel.
        #[source]
        error: std::io::Error,
    },

    /// The kernel rejected an unmount.
    #[error("couldn't unmount {}: {error}", .target.display())]
    #[diagnostic(code(hostutil::mount::unmount))]
    Unmount {
        /// Mount point.
        target: PathBuf,
        /// The error reported by the kernel.
        #[source]
        error: std::io::Error,
    },

    /// A directory could not be listed.
    #[error("couldn't list directory {}: {error}", .path.display())]
    #[diagnostic(code(hostutil::fs::list_dir))]
    ListDir {
        /// Directory being listed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// A path could not be canonicalized.
    #[error("couldn't resolve {}: {error}", .path.display())]
    #[diagnostic(code(hostutil::fs::resolve))]
    Resolve {
        /// Path being resolved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// Expected a file but found a directory.
    #[error("{} is a directory", .path.display())]
    #[diagnostic(code(hostutil::fs::is_directory))]
    IsDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Expected a directory but found something else.
    #[error("{} is not a directory", .path.display())]
    #[diagnostic(code(hostutil::fs::not_directory))]
    NotDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Refused to overwrite an existing file.
    #[error("not overwriting existing file {}, use force to overwrite", .path.display())]
    #[diagnostic(code(hostutil::fs::file_exists), help("Pass --force to truncate it"))]
    FileExists {
        /// The existing file.
        path: PathBuf,
    },

    /// One or more items of a batch operation failed.
    #[error(transparent)]
    #[diagnostic(code(hostutil::batch))]
    Batch(#[from] BatchErrors),

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(hostutil::io))]
    Io(#[from] std::io::Error),
}

impl HostutilError {
    /// The OS error code behind this error, if it wraps one.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::CreateMountPoint { error, .. }
            | Self::Mount { error, .. }
            | Self::Unmount { error, .. }
            | Self::ListDir { error, .. }
            | Self::Resolve { error, .. }
            | Self::Io(error) => error.raw_os_error(),
            _ => None,
        }
    }
}
