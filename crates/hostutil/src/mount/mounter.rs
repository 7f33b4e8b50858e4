//! Bind and unmount operations.

use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use hostutil_common::{BatchErrors, HostutilError, HostutilResult, MountConfig};

use super::name::MountPointName;
use super::syscalls::{KernelMounts, MountSyscalls, UnmountFailure};

/// Runs bind and unmount operations against a [`MountSyscalls`] layer.
///
/// Holds no mount state: the kernel mount table is the only source of truth,
/// and every call re-checks the filesystem. Batch calls against the same
/// target root must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct Mounter<S = KernelMounts> {
    config: MountConfig,
    syscalls: S,
}

impl Mounter<KernelMounts> {
    /// Kernel-backed mounter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MountConfig::default())
    }

    /// Kernel-backed mounter with `config`.
    #[must_use]
    pub fn with_config(config: MountConfig) -> Self {
        let syscalls = KernelMounts::new(&config);
        Self { config, syscalls }
    }
}

impl Default for Mounter<KernelMounts> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MountSyscalls> Mounter<S> {
    /// Mounter using a custom syscall layer.
    pub const fn with_syscalls(config: MountConfig, syscalls: S) -> Self {
        Self { config, syscalls }
    }

    /// The syscall layer.
    pub const fn syscalls(&self) -> &S {
        &self.syscalls
    }

    /// Bind mount directory `source` on `target`.
    ///
    /// `target` is created with the configured mode (parents included) when
    /// missing, and reused when it already is a directory. Kernel errors,
    /// such as `EBUSY` or `EPERM`, are returned unmodified as
    /// [`HostutilError::Mount`].
    pub fn bind_mount(&self, source: &Path, target: &Path) -> HostutilResult<()> {
        match std::fs::metadata(source) {
            Ok(meta) if meta.is_dir() => {}
            _ => {
                return Err(HostutilError::SourceNotDirectory {
                    path: source.to_path_buf(),
                });
            }
        }

        match std::fs::metadata(target) {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!(target = %target.display(), "Reusing existing mountpoint");
            }
            Ok(_) => {
                return Err(HostutilError::TargetNotDirectory {
                    path: target.to_path_buf(),
                });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => self.create_mount_point(target)?,
            Err(error) => {
                return Err(HostutilError::CreateMountPoint {
                    path: target.to_path_buf(),
                    error,
                });
            }
        }

        self.syscalls
            .bind(source, target)
            .map_err(|error| HostutilError::Mount {
                source_dir: source.to_path_buf(),
                target: target.to_path_buf(),
                error,
            })
    }

    /// Bind every directory in `dirs[..n-1]` under the root `dirs[n-1]`.
    ///
    /// Each source lands on `root/<final component of source>`. A failing
    /// source does not stop the others; all failures come back together as
    /// [`HostutilError::Batch`] in the order they happened.
    pub fn bind_mount_all<P: AsRef<Path>>(&self, dirs: &[P]) -> HostutilResult<()> {
        let Some((root, sources)) = dirs.split_last() else {
            return Err(too_few_arguments());
        };
        if sources.is_empty() {
            return Err(too_few_arguments());
        }
        let root = root.as_ref();

        let mut errors = BatchErrors::new();
        for source in sources {
            let source = source.as_ref();
            let result = MountPointName::resolve(source)
                .and_then(|name| self.bind_mount(source, &root.join(&name)));
            if let Err(e) = result {
                errors.push(source, e);
            }
        }

        tracing::info!(
            root = %root.display(),
            bound = sources.len() - errors.len(),
            failed = errors.len(),
            "Bind mount batch finished"
        );
        errors.into_result()
    }

    /// Unmount `mountpoint`.
    ///
    /// No existence check is made; unmounting something that is not a
    /// mount point surfaces the kernel error (`EINVAL` on Linux).
    pub fn unmount(&self, mountpoint: &Path) -> HostutilResult<()> {
        self.syscalls
            .unmount(mountpoint)
            .map_err(|error| HostutilError::Unmount {
                target: mountpoint.to_path_buf(),
                error,
            })
    }

    /// Unmount every direct subdirectory of `root`.
    ///
    /// Failures the syscall layer classifies as
    /// [`UnmountFailure::AlreadyUnmounted`] are skipped. Failing to list
    /// `root` aborts before anything is unmounted.
    pub fn unmount_all(&self, root: &Path) -> HostutilResult<()> {
        let entries = crate::fs::ls_dirs(root)?;

        let mut errors = BatchErrors::new();
        let mut unmounted = 0usize;
        for name in entries {
            let mountpoint = root.join(&name);
            match self.unmount(&mountpoint) {
                Ok(()) => unmounted += 1,
                Err(HostutilError::Unmount { ref error, .. })
                    if self.syscalls.classify_unmount_error(error)
                        == UnmountFailure::AlreadyUnmounted =>
                {
                    tracing::debug!(
                        mountpoint = %mountpoint.display(),
                        error = %error,
                        "Ignoring unmount failure, not mounted"
                    );
                }
                Err(e) => errors.push(&mountpoint, e),
            }
        }

        tracing::info!(
            root = %root.display(),
            unmounted,
            failed = errors.len(),
            "Unmount batch finished"
        );
        errors.into_result()
    }

    fn create_mount_point(&self, target: &Path) -> HostutilResult<()> {
        tracing::debug!(
            target = %target.display(),
            mode = format!("{:o}", self.config.dir_mode),
            "Creating mountpoint"
        );
        DirBuilder::new()
            .recursive(true)
            .mode(self.config.dir_mode)
            .create(target)
            .map_err(|error| HostutilError::CreateMountPoint {
                path: target.to_path_buf(),
                error,
            })
    }
}

fn too_few_arguments() -> HostutilError {
    HostutilError::InvalidArguments {
        message: "at least two arguments required".to_string(),
    }
}
