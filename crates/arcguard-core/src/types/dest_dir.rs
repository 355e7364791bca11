//! Resolved extraction root.

use crate::ExtractionError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// An absolute, normalized extraction root.
///
/// Existing directories are canonicalized so that member paths are compared
/// against the real location. A root that does not exist yet is made
/// absolute and normalized lexically; it is created on demand by
/// [`ExtractRoot::create`].
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::types::ExtractRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = ExtractRoot::new("/tmp/extraction")?;
/// assert!(root.contains(&root.join_member("docs/readme.txt")));
/// assert!(!root.contains(&root.join_member("../escape")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRoot(PathBuf);

impl ExtractRoot {
    /// Resolves `path` into an extraction root.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but is not a directory, or if it
    /// cannot be made absolute.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            if !path.is_dir() {
                return Err(ExtractionError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("path is not a directory: {}", path.display()),
                )));
            }
            let canonical = path.canonicalize().map_err(|e| {
                ExtractionError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to canonicalize path {}: {}", path.display(), e),
                ))
            })?;
            return Ok(Self(canonical));
        }

        let absolute = std::path::absolute(path)?;
        Ok(Self(normalize_lexically(&absolute)))
    }

    /// Returns the root as a path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a member name onto the root and normalizes the result.
    ///
    /// An absolute member name replaces the root entirely.
    #[must_use]
    pub fn join_member(&self, name: &str) -> PathBuf {
        self.join_path(Path::new(name))
    }

    /// Joins a raw member path onto the root and normalizes the result.
    #[must_use]
    pub fn join_path(&self, path: &Path) -> PathBuf {
        normalize_lexically(&self.0.join(path))
    }

    /// Returns `true` if `path` is the root or lies beneath it.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.0)
    }

    /// Creates the root directory and its parents if missing.
    pub fn create(&self) -> Result<()> {
        std::fs::create_dir_all(&self.0)?;
        Ok(())
    }
}

impl AsRef<Path> for ExtractRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the filesystem root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
