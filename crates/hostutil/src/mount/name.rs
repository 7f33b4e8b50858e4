//! Mount-point names derived from bind sources.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use hostutil_common::{HostutilError, HostutilResult};

/// Names that would put a bind on the target root itself or outside it.
const REFUSED_NAMES: &[&[u8]] = &[b".", b"..", b"/"];

/// Name of the per-source mount point under a target root.
///
/// Always a single path component, never `.`, `..` or `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountPointName(OsString);

impl MountPointName {
    /// Derive the mount-point name for `source` from its final component.
    pub fn resolve(source: impl AsRef<Path>) -> HostutilResult<Self> {
        let name = base_name(source.as_ref().as_os_str());
        if REFUSED_NAMES.contains(&name.as_bytes()) {
            return Err(HostutilError::RefusedMountPoint {
                name: name.to_string_lossy().into_owned(),
            });
        }
        Ok(Self(name.to_os_string()))
    }

    /// The name as an `OsStr`.
    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }
}

impl AsRef<Path> for MountPointName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for MountPointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_string_lossy())
    }
}

/// Last element of `path`, ignoring trailing separators.
///
/// Unlike [`Path::file_name`], a trailing `.` is kept as-is, an empty path
/// yields `.` and a path made only of separators yields `/`.
#[must_use]
pub fn base_name(path: &OsStr) -> &OsStr {
    let bytes = path.as_bytes();
    if bytes.is_empty() {
        return OsStr::new(".");
    }
    let Some(end) = bytes.iter().rposition(|&b| b != b'/') else {
        return OsStr::new("/");
    };
    let trimmed = &bytes[..=end];
    let start = trimmed.iter().rposition(|&b| b == b'/').map_or(0, |i| i + 1);
    OsStr::from_bytes(&trimmed[start..])
}
