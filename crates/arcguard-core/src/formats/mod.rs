//! Archive format implementations.

pub mod common;
pub mod compression;
pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

use std::path::Path;

use crate::Result;

pub use self::tar::TarHandle;
pub use self::zip::ZipHandle;
pub use detect::ArchiveType;
pub use detect::detect_container;
pub use traits::MemberSource;
pub use traits::MemberView;

/// An open archive of either supported container.
#[derive(Debug)]
pub enum ArchiveHandle {
    /// Tar archive, possibly compressed.
    Tar(TarHandle),
    /// Zip archive.
    Zip(ZipHandle),
}

impl ArchiveHandle {
    /// Detects the container at `path` and opens it.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_as(path, detect_container(path)?)
    }

    /// Opens `path` as a container already identified as `kind`.
    pub fn open_as(path: &Path, kind: ArchiveType) -> Result<Self> {
        if kind.is_tar() {
            Ok(Self::Tar(TarHandle::open(path)?))
        } else {
            Ok(Self::Zip(ZipHandle::open(path)?))
        }
    }

    /// Returns `true` for tar archives.
    #[must_use]
    pub const fn is_tar(&self) -> bool {
        matches!(self, Self::Tar(_))
    }

    /// Path the archive was opened from.
    #[must_use]
    pub fn label(&self) -> &Path {
        match self {
            Self::Tar(handle) => handle.label(),
            Self::Zip(handle) => handle.label(),
        }
    }
}
