//! Ordered failure aggregate for operations that keep going past per-item errors.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{HostutilError, HostutilResult};

/// One failed item of a batch operation.
#[derive(Debug)]
pub struct BatchFailure {
    /// The path the failed item was about (a bind source, a mount point, ...).
    pub subject: PathBuf,
    /// Why it failed.
    pub error: HostutilError,
}

/// Failures collected by a batch operation, in the order they happened.
///
/// Formatting renders `errors occurred:` followed by one failure message per
/// line; the failures themselves stay inspectable through [`Self::iter`].
#[derive(Debug, Default)]
pub struct BatchErrors {
    failures: Vec<BatchFailure>,
}

impl BatchErrors {
    /// Create an empty aggregate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Record a failure for `subject`.
    pub fn push(&mut self, subject: impl AsRef<Path>, error: HostutilError) {
        let subject = subject.as_ref().to_path_buf();
        tracing::debug!(subject = %subject.display(), error = %error, "Recording batch failure");
        self.failures.push(BatchFailure { subject, error });
    }

    /// Whether no failure has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Iterate failures in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, BatchFailure> {
        self.failures.iter()
    }

    /// Subjects of all recorded failures.
    #[must_use]
    pub fn subjects(&self) -> Vec<&Path> {
        self.failures.iter().map(|f| f.subject.as_path()).collect()
    }

    /// `Ok(())` if nothing failed, otherwise the aggregate as an error.
    pub fn into_result(self) -> HostutilResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(HostutilError::Batch(self))
        }
    }
}

impl fmt::Display for BatchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("errors occurred:")?;
        for failure in &self.failures {
            write!(f, "\n{}", failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchErrors {}

impl IntoIterator for BatchErrors {
    type Item = BatchFailure;
    type IntoIter = std::vec::IntoIter<BatchFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchErrors {
    type Item = &'a BatchFailure;
    type IntoIter = std::slice::Iter<'a, BatchFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
