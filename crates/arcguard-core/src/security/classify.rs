//! Member type classification.
//!
//! Only regular files and directories are extractable. Zip members carry
//! their type in the high bits of the external attributes; a mode without a
//! recognised POSIX file type is treated as `0`, which marks an archive
//! produced on a non-POSIX host and is accepted.

use crate::ExtractionError;
use crate::Result;
use crate::types::MemberRecord;
use crate::types::MemberType;

/// File type mask of a POSIX mode.
pub const S_IFMT: u32 = 0o170_000;

const S_IFIFO: u32 = 0o010_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFREG: u32 = 0o100_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFSOCK: u32 = 0o140_000;

/// Outcome of classifying one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Declared type.
    pub member_type: MemberType,
    /// Mode after dropping unrecognised file type bits (zip only).
    pub normalized_mode: Option<u32>,
}

impl Classification {
    /// Returns `true` if the member may be extracted.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.member_type.is_supported()
    }
}

/// Maps a tar type indicator to a member type.
#[must_use]
pub const fn classify_tar(type_flag: u8) -> MemberType {
    match type_flag {
        b'0' | b'\0' => MemberType::Regular,
        b'1' => MemberType::HardLink,
        b'2' => MemberType::Symlink,
        b'3' => MemberType::CharDevice,
        b'4' => MemberType::BlockDevice,
        b'5' => MemberType::Directory,
        b'6' => MemberType::Fifo,
        b'7' => MemberType::Contiguous,
        b'S' => MemberType::Sparse,
        _ => MemberType::Unknown,
    }
}

/// Drops the mode to `0` when its file type bits are not a POSIX type.
#[must_use]
pub const fn normalize_zip_mode(mode: u32) -> u32 {
    match mode & S_IFMT {
        S_IFIFO | S_IFCHR | S_IFDIR | S_IFBLK | S_IFREG | S_IFLNK | S_IFSOCK => mode,
        _ => 0,
    }
}

/// Classifies a zip member from its unix mode.
#[must_use]
pub const fn classify_zip(unix_mode: u32) -> Classification {
    let mode = normalize_zip_mode(unix_mode);
    let member_type = if mode == 0 {
        MemberType::NonPosix
    } else {
        match mode & S_IFMT {
            S_IFREG => MemberType::Regular,
            S_IFDIR => MemberType::Directory,
            S_IFLNK => MemberType::Symlink,
            S_IFCHR => MemberType::CharDevice,
            S_IFBLK => MemberType::BlockDevice,
            S_IFIFO => MemberType::Fifo,
            S_IFSOCK => MemberType::Socket,
            _ => MemberType::Unknown,
        }
    };
    Classification {
        member_type,
        normalized_mode: Some(mode),
    }
}

/// Classifies a member of either format.
#[must_use]
pub fn classify(record: &MemberRecord) -> Classification {
    match record {
        MemberRecord::Tar(member) => Classification {
            member_type: classify_tar(member.type_flag),
            normalized_mode: None,
        },
        MemberRecord::Zip(member) => classify_zip(member.unix_mode),
    }
}

/// Classifies a member and rejects unsupported types.
///
/// # Errors
///
/// Returns [`ExtractionError::MemberType`] carrying the type label.
pub fn ensure_supported(record: &MemberRecord) -> Result<Classification> {
    let classification = classify(record);
    if classification.is_supported() {
        Ok(classification)
    } else {
        Err(ExtractionError::MemberType {
            name: record.name().to_string(),
            file_type: classification.member_type.label().to_string(),
        })
    }
}
