//! Archive member type enumeration.

use std::fmt;

/// Declared type of an archive member.
///
/// # Examples
///
/// ```
/// use arcguard_core::types::MemberType;
///
/// assert_eq!(MemberType::Symlink.label(), "SYM");
/// assert!(MemberType::Regular.is_supported());
/// assert!(!MemberType::Fifo.is_supported());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberType {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Hard link.
    HardLink,
    /// Symbolic link.
    Symlink,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix socket.
    Socket,
    /// Contiguous file (tar type `7`).
    Contiguous,
    /// GNU sparse file.
    Sparse,
    /// Zip member without POSIX type bits.
    NonPosix,
    /// Any type indicator not listed above.
    Unknown,
}

impl MemberType {
    /// Short label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "REG",
            Self::Directory => "DIR",
            Self::HardLink => "LNK",
            Self::Symlink => "SYM",
            Self::CharDevice => "CHR",
            Self::BlockDevice => "BLK",
            Self::Fifo => "FIFO",
            Self::Socket => "SOCK",
            Self::Contiguous => "CONT",
            Self::Sparse => "SPARSE",
            Self::NonPosix => "non-POSIX",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` if members of this type may be extracted.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Regular | Self::Directory | Self::NonPosix)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
