//! Compression layers recognised around tar archives.
//!
//! The codec is chosen from the leading magic bytes, never from the file
//! name, so a renamed `.tar.gz` still decodes.
//!
//! # Supported Codecs
//!
//! - **Gzip**: `1f 8b`
//! - **Bzip2**: `BZh`
//! - **Xz**: `fd 37 7a 58 5a 00`
//! - **Zstd**: `28 b5 2f fd`

use std::io::Cursor;
use std::io::Read;

use crate::Result;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];

/// Bytes needed to recognise every supported codec.
pub const MAGIC_LEN: usize = 6;

/// Compression codec wrapped around a tar stream.
///
/// # Examples
///
/// ```
/// use arcguard_core::formats::compression::CompressionCodec;
///
/// assert_eq!(
///     CompressionCodec::from_magic(&[0x1f, 0x8b, 0x08]),
///     Some(CompressionCodec::Gzip)
/// );
/// assert_eq!(CompressionCodec::from_magic(b"ustar"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate).
    Gzip,
    /// Bzip2.
    Bzip2,
    /// Xz (LZMA2).
    Xz,
    /// Zstandard.
    Zstd,
}

impl CompressionCodec {
    /// Identifies the codec from the first bytes of a stream.
    #[must_use]
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(GZIP_MAGIC) {
            Some(Self::Gzip)
        } else if bytes.starts_with(BZIP2_MAGIC) {
            Some(Self::Bzip2)
        } else if bytes.starts_with(XZ_MAGIC) {
            Some(Self::Xz)
        } else if bytes.starts_with(ZSTD_MAGIC) {
            Some(Self::Zstd)
        } else {
            None
        }
    }

    /// Short codec name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` in the matching decoder.
    pub fn decoder<R: Read + 'static>(self, reader: R) -> Result<Box<dyn Read>> {
        let decoder: Box<dyn Read> = match self {
            Self::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        };
        Ok(decoder)
    }
}

/// Reads up to `len` bytes, stopping early only at end of stream.
pub fn read_prefix<R: Read>(reader: &mut R, len: usize) -> std::io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Peeks at the magic bytes of `reader` and returns a decompressed view.
///
/// Works on non-seekable streams: the peeked bytes are chained back in
/// front of the remaining input.
pub fn decompressed<R: Read + 'static>(
    mut reader: R,
) -> Result<(Option<CompressionCodec>, Box<dyn Read>)> {
    let prefix = read_prefix(&mut reader, MAGIC_LEN)?;
    let codec = CompressionCodec::from_magic(&prefix);
    let restored = Cursor::new(prefix).chain(reader);
    match codec {
        Some(codec) => Ok((Some(codec), codec.decoder(restored)?)),
        None => Ok((None, Box::new(restored))),
    }
}
