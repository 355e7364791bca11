//! Decoder-neutral metadata for archive members.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use zip::CompressionMethod;

/// Metadata of a tar member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarMember {
    /// Member name as stored in the header, lossily decoded for display.
    pub name: String,
    /// Path the decoder writes the member to, built from the raw header bytes.
    pub path: PathBuf,
    /// Raw type indicator byte.
    pub type_flag: u8,
    /// Declared size in bytes.
    pub size: u64,
}

impl TarMember {
    /// Creates a member whose path is its name.
    #[must_use]
    pub fn new(name: impl Into<String>, type_flag: u8, size: u64) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            type_flag,
            size,
        }
    }
}

/// Metadata of a zip member, as read from the central directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipMember {
    /// Position in the central directory.
    pub index: usize,
    /// Member name as stored in the archive.
    pub name: String,
    /// Unix mode derived from the external attributes, `0` when absent.
    pub unix_mode: u32,
    /// Whether the decoder reports the member as a directory.
    pub is_dir: bool,
    /// Declared uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Compression method.
    pub method: ZipMethod,
}

/// A member from either container format.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberRecord {
    /// Tar member.
    Tar(TarMember),
    /// Zip member.
    Zip(ZipMember),
}

impl MemberRecord {
    /// Member name as stored in the archive.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tar(member) => &member.name,
            Self::Zip(member) => &member.name,
        }
    }

    /// Path the member is written to, relative to the extraction root.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Tar(member) => &member.path,
            Self::Zip(member) => Path::new(&member.name),
        }
    }

    /// Declared uncompressed size.
    #[must_use]
    pub const fn size(&self) -> u64 {
        match self {
            Self::Tar(member) => member.size,
            Self::Zip(member) => member.size,
        }
    }

    /// Compressed size; only zip records carry one.
    #[must_use]
    pub const fn compressed_size(&self) -> Option<u64> {
        match self {
            Self::Tar(_) => None,
            Self::Zip(member) => Some(member.compressed_size),
        }
    }

    /// Returns `true` for directory members.
    ///
    /// Tar uses the type indicator; zip uses the decoder's own notion, which
    /// is a trailing `/` in the name.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        match self {
            Self::Tar(member) => {
                crate::security::classify::classify_tar(member.type_flag).is_directory()
            }
            Self::Zip(member) => member.is_dir,
        }
    }
}

/// A zip compression method identified by its APPNOTE code.
///
/// # Examples
///
/// ```
/// use arcguard_core::types::ZipMethod;
///
/// assert!(ZipMethod::DEFLATE.is_supported());
/// assert_eq!(ZipMethod::from_code(98).name(), "ppmd");
/// assert!(!ZipMethod::from_code(98).is_supported());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZipMethod(u16);

/// Names of APPNOTE compression codes.
const METHOD_NAMES: &[(u16, &str)] = &[
    (0, "store"),
    (1, "shrink"),
    (2, "reduce"),
    (3, "reduce"),
    (4, "reduce"),
    (5, "reduce"),
    (6, "implode"),
    (7, "tokenize"),
    (8, "deflate"),
    (9, "deflate64"),
    (10, "implode"),
    (12, "bzip2"),
    (14, "lzma"),
    (18, "terse"),
    (19, "lz77"),
    (93, "zstd"),
    (94, "mp3"),
    (95, "xz"),
    (96, "jpeg"),
    (97, "wavpack"),
    (98, "ppmd"),
    (99, "aes"),
];

impl ZipMethod {
    /// No compression.
    pub const STORE: Self = Self(0);
    /// Deflate.
    pub const DEFLATE: Self = Self(8);
    /// Bzip2.
    pub const BZIP2: Self = Self(12);
    /// LZMA.
    pub const LZMA: Self = Self(14);

    /// Wraps a raw method code.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        Self(code)
    }

    /// Raw method code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Returns `true` for store, deflate, bzip2 and lzma.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self.0, 0 | 8 | 12 | 14)
    }

    /// Human-readable name; unknown codes are rendered as a number.
    #[must_use]
    pub fn name(self) -> String {
        METHOD_NAMES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map_or_else(|| self.0.to_string(), |(_, name)| (*name).to_string())
    }

    /// Converts the decoder's method value.
    #[must_use]
    #[allow(deprecated)]
    pub const fn from_compression(method: CompressionMethod) -> Self {
        Self(method.to_u16())
    }
}

impl fmt::Display for ZipMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
