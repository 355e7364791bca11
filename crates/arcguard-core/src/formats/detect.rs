//! Container detection by content.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::formats::compression;
use crate::formats::compression::CompressionCodec;

/// Size of a tar header block.
pub const TAR_BLOCK_SIZE: usize = 512;

const CHECKSUM_RANGE: std::ops::Range<usize> = 148..156;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// Uncompressed tar.
    Tar,
    /// Gzip-compressed tar.
    TarGz,
    /// Bzip2-compressed tar.
    TarBz2,
    /// Xz-compressed tar.
    TarXz,
    /// Zstd-compressed tar.
    TarZst,
    /// Zip.
    Zip,
}

impl ArchiveType {
    /// Tar type for the given compression layer.
    #[must_use]
    pub const fn tar(codec: Option<CompressionCodec>) -> Self {
        match codec {
            None => Self::Tar,
            Some(CompressionCodec::Gzip) => Self::TarGz,
            Some(CompressionCodec::Bzip2) => Self::TarBz2,
            Some(CompressionCodec::Xz) => Self::TarXz,
            Some(CompressionCodec::Zstd) => Self::TarZst,
        }
    }

    /// Returns `true` for every tar variant.
    #[must_use]
    pub const fn is_tar(self) -> bool {
        !matches!(self, Self::Zip)
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        }
    }
}

/// Returns `true` if `block` is a tar header or an end-of-archive block.
///
/// A block of zeros marks a blank archive. Otherwise the stored header
/// checksum must match the byte sum with the checksum field read as spaces.
#[must_use]
pub fn is_tar_block(block: &[u8]) -> bool {
    if block.len() != TAR_BLOCK_SIZE {
        return false;
    }
    if block.iter().all(|b| *b == 0) {
        return true;
    }

    let computed: u32 = block
        .iter()
        .enumerate()
        .map(|(i, b)| {
            if CHECKSUM_RANGE.contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(*b)
            }
        })
        .sum();

    tar::Header::from_byte_slice(block)
        .cksum()
        .is_ok_and(|stored| stored == computed)
}

fn probe_tar(path: &Path) -> Result<Option<ArchiveType>> {
    let file = File::open(path)?;
    let Ok((codec, mut reader)) = compression::decompressed(BufReader::new(file)) else {
        return Ok(None);
    };
    match compression::read_prefix(&mut reader, TAR_BLOCK_SIZE) {
        Ok(block) if is_tar_block(&block) => Ok(Some(ArchiveType::tar(codec))),
        Ok(_) => Ok(None),
        Err(err) => {
            log::debug!("{} is not a tar stream: {err}", path.display());
            Ok(None)
        }
    }
}

fn probe_zip(path: &Path) -> Result<bool> {
    let file = File::open(path)?;
    Ok(zip::ZipArchive::new(BufReader::new(file)).is_ok())
}

/// Identifies the container format of the file at `path`.
///
/// Tar is tried first, through any supported compression layer, then zip.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsupportedContainer`] if neither matches, or
/// an I/O error if the file cannot be opened.
pub fn detect_container(path: &Path) -> Result<ArchiveType> {
    if let Some(kind) = probe_tar(path)? {
        log::debug!("detected {} archive at {}", kind.name(), path.display());
        return Ok(kind);
    }
    if probe_zip(path)? {
        log::debug!("detected zip archive at {}", path.display());
        return Ok(ArchiveType::Zip);
    }
    Err(ExtractionError::UnsupportedContainer {
        path: path.to_path_buf(),
    })
}
