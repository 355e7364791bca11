//! Path traversal and overwrite validation.

use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::types::ExtractRoot;

/// Rejects member names that escape the extraction root or would replace an
/// existing file.
///
/// A guard without a root performs no checks, which is how validation-only
/// callers skip path handling entirely.
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::security::PathGuard;
/// use arcguard_core::types::ExtractRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let guard = PathGuard::new(Some(ExtractRoot::new("/tmp/out")?), false);
/// assert!(guard.check("docs/readme.txt").is_ok());
/// assert!(guard.check("../etc/passwd").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: Option<ExtractRoot>,
    allow_overwrite: bool,
}

impl PathGuard {
    /// Creates a guard for `root`.
    #[must_use]
    pub const fn new(root: Option<ExtractRoot>, allow_overwrite: bool) -> Self {
        Self {
            root,
            allow_overwrite,
        }
    }

    /// Guard that accepts every name.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(None, true)
    }

    /// The root names are checked against, if any.
    #[must_use]
    pub const fn root(&self) -> Option<&ExtractRoot> {
        self.root.as_ref()
    }

    /// Checks `name` and returns where it would be written.
    ///
    /// Returns `Ok(None)` when the guard has no root.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::MemberName`] if the joined path is outside the root
    /// - [`ExtractionError::MemberOverwrite`] if a regular file already exists
    ///   there and overwriting is disabled
    pub fn check(&self, name: &str) -> Result<Option<PathBuf>> {
        self.check_path(name, Path::new(name))
    }

    /// Checks the raw member `path`, reporting failures under `name`.
    ///
    /// Used when the stored name is not valid UTF-8 and `name` is only its
    /// display form.
    ///
    /// # Errors
    ///
    /// Same as [`PathGuard::check`].
    pub fn check_path(&self, name: &str, path: &Path) -> Result<Option<PathBuf>> {
        let Some(root) = &self.root else {
            return Ok(None);
        };

        let joined = root.join_path(path);
        if !root.contains(&joined) {
            return Err(ExtractionError::MemberName {
                name: name.to_string(),
            });
        }

        if !self.allow_overwrite && joined.is_file() {
            return Err(ExtractionError::MemberOverwrite {
                name: name.to_string(),
            });
        }

        Ok(Some(joined))
    }
}
