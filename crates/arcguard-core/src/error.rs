//! Error types for archive validation and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// The aggregate limit that an archive broke.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeLimit {
    /// Sum of member sizes went above the configured maximum.
    TotalSize {
        /// Maximum allowed total uncompressed size in bytes.
        max: u64,
    },
    /// Whole-archive expansion ratio went above the configured maximum.
    ArchiveRatio {
        /// Maximum allowed ratio.
        max: u64,
    },
    /// A single zip member expands more than the configured maximum.
    MemberRatio {
        /// Member name.
        name: String,
        /// Observed ratio.
        ratio: f64,
        /// Maximum allowed ratio.
        max: u64,
    },
    /// Integer overflow while summing member sizes.
    IntegerOverflow,
}

impl SizeLimit {
    fn describe(&self, archive: &std::path::Path) -> String {
        match self {
            Self::TotalSize { max } => format!(
                "Archive '{}' exceeds the allowed uncompressed size limit of {max} bytes",
                archive.display()
            ),
            Self::ArchiveRatio { max } => format!(
                "Archive '{}' exceeds the allowed compression ratio of {max}",
                archive.display()
            ),
            Self::MemberRatio { name, ratio, max } => format!(
                "File '{name}' compression ratio ({ratio:.2}) exceeds the allowed maximum ({max})"
            ),
            Self::IntegerOverflow => format!(
                "Archive '{}' uncompressed size overflows a 64-bit counter",
                archive.display()
            ),
        }
    }
}

/// Errors that can occur while validating or extracting an archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted or the decoder rejected it.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The file is neither a tar (in any supported compression) nor a zip.
    #[error("File '{}' is not supported", path.display())]
    UnsupportedContainer {
        /// Path that was probed.
        path: PathBuf,
    },

    /// A tar archive without a single member.
    #[error("Blank tar archives are not supported")]
    BlankArchive {
        /// Path of the blank archive.
        path: PathBuf,
    },

    /// Zip member uses a compression method outside store, deflate, bzip2 and lzma.
    #[error("Compression type not supported: {method}")]
    UnsupportedCompression {
        /// Member name.
        name: String,
        /// Human-readable method name.
        method: String,
    },

    /// Member is not a regular file or directory.
    #[error("File '{name}' has unsupported type: {file_type}")]
    MemberType {
        /// Member name.
        name: String,
        /// Type label such as `SYM` or `FIFO`.
        file_type: String,
    },

    /// Member would land outside the extraction root.
    #[error("Invalid file path: '{name}'")]
    MemberName {
        /// Member name as stored in the archive.
        name: String,
    },

    /// Member would replace an existing file and overwriting is disabled.
    #[error("File '{name}' already exists")]
    MemberOverwrite {
        /// Member name as stored in the archive.
        name: String,
    },

    /// Archive holds more non-directory members than allowed.
    #[error("Archive '{}' contains too many objects (limit {max})", archive.display())]
    ObjectCount {
        /// Archive path.
        archive: PathBuf,
        /// Count reached when the limit tripped.
        count: u64,
        /// Maximum allowed count.
        max: u64,
    },

    /// Archive breaks a size or ratio limit.
    #[error("{}", limit.describe(archive))]
    ArchiveSize {
        /// Archive path.
        archive: PathBuf,
        /// Which limit was exceeded.
        limit: SizeLimit,
    },
}

impl ExtractionError {
    /// Returns `true` if this error rejects the archive content on safety grounds.
    ///
    /// Unsupported containers, blank archives and unsupported compression
    /// methods are capability errors, not violations.
    ///
    /// # Examples
    ///
    /// ```
    /// use arcguard_core::ExtractionError;
    ///
    /// let err = ExtractionError::MemberName {
    ///     name: "../etc/passwd".to_string(),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::InvalidArchive("truncated".to_string());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::MemberType { .. }
                | Self::MemberName { .. }
                | Self::MemberOverwrite { .. }
                | Self::ObjectCount { .. }
                | Self::ArchiveSize { .. }
        )
    }

    /// Returns the member name the error refers to, if any.
    #[must_use]
    pub fn member_name(&self) -> Option<&str> {
        match self {
            Self::UnsupportedCompression { name, .. }
            | Self::MemberType { name, .. }
            | Self::MemberName { name }
            | Self::MemberOverwrite { name } => Some(name),
            Self::ArchiveSize {
                limit: SizeLimit::MemberRatio { name, .. },
                ..
            } => Some(name),
            _ => None,
        }
    }

    /// Returns the size limit that was exceeded, if applicable.
    #[must_use]
    pub const fn size_limit(&self) -> Option<&SizeLimit> {
        match self {
            Self::ArchiveSize { limit, .. } => Some(limit),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}
