//! Tar archive access through the `tar` crate.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::formats::compression;
use crate::formats::compression::CompressionCodec;
use crate::formats::traits::MemberSource;
use crate::formats::traits::MemberView;
use crate::types::MemberRecord;
use crate::types::TarMember;

/// Label used for archives that come from a stream instead of a file.
pub const STREAM_LABEL: &str = "<stream>";

type Decoded = Box<dyn Read>;

/// An open tar archive, decompressed if needed.
///
/// A handle supports a single pass: either [`TarHandle::members`] or
/// [`TarHandle::unpack`].
pub struct TarHandle {
    archive: tar::Archive<Decoded>,
    codec: Option<CompressionCodec>,
    label: PathBuf,
}

impl std::fmt::Debug for TarHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarHandle")
            .field("codec", &self.codec)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl TarHandle {
    /// Opens the tar archive at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut handle = Self::from_reader(BufReader::new(file))?;
        handle.label = path.to_path_buf();
        Ok(handle)
    }

    /// Wraps a byte stream, which need not be seekable.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Result<Self> {
        let (codec, decoded) = compression::decompressed(reader)?;
        Ok(Self {
            archive: tar::Archive::new(decoded),
            codec,
            label: PathBuf::from(STREAM_LABEL),
        })
    }

    /// Compression layer around the tar stream.
    #[must_use]
    pub const fn codec(&self) -> Option<CompressionCodec> {
        self.codec
    }

    /// Path of the archive, or [`STREAM_LABEL`].
    #[must_use]
    pub fn label(&self) -> &Path {
        &self.label
    }

    /// Iterates over the members.
    ///
    /// The source yields [`ExtractionError::BlankArchive`] if the archive
    /// ends before its first member.
    pub fn members(&mut self) -> Result<TarMembers<'_>> {
        let entries = self.archive.entries()?;
        Ok(TarMembers {
            entries,
            label: &self.label,
            seen_any: false,
            done: false,
        })
    }

    /// Extracts every member under `root` in one call.
    pub fn unpack(&mut self, root: &Path) -> Result<()> {
        self.archive.unpack(root)?;
        Ok(())
    }
}

/// A tar member with its data stream still attached.
pub struct TarEntry<'a> {
    record: MemberRecord,
    entry: tar::Entry<'a, Decoded>,
}

impl std::fmt::Debug for TarEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarEntry")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl TarEntry<'_> {
    /// Writes the member beneath `root`.
    ///
    /// Returns `false` when the decoder declined to write it.
    pub fn unpack_in(&mut self, root: &Path) -> Result<bool> {
        Ok(self.entry.unpack_in(root)?)
    }
}

impl MemberView for TarEntry<'_> {
    fn record(&self) -> &MemberRecord {
        &self.record
    }

    fn into_record(self) -> MemberRecord {
        self.record
    }
}

/// Lazy member sequence of a [`TarHandle`].
pub struct TarMembers<'a> {
    entries: tar::Entries<'a, Decoded>,
    label: &'a Path,
    seen_any: bool,
    done: bool,
}

impl std::fmt::Debug for TarMembers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarMembers")
            .field("label", &self.label)
            .field("seen_any", &self.seen_any)
            .finish_non_exhaustive()
    }
}

impl<'a> MemberSource for TarMembers<'a> {
    type Member = TarEntry<'a>;

    fn next_member(&mut self) -> Option<Result<TarEntry<'a>>> {
        if self.done {
            return None;
        }

        let next = loop {
            match self.entries.next() {
                Some(Ok(entry)) if entry.header().entry_type().is_pax_global_extensions() => {
                    log::debug!("skipping pax global header in {}", self.label.display());
                }
                other => break other,
            }
        };

        match next {
            None => {
                self.done = true;
                if self.seen_any {
                    None
                } else {
                    Some(Err(ExtractionError::BlankArchive {
                        path: self.label.to_path_buf(),
                    }))
                }
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(ExtractionError::InvalidArchive(err.to_string())))
            }
            Some(Ok(entry)) => {
                self.seen_any = true;
                let path = match entry.path() {
                    Ok(path) => path.into_owned(),
                    Err(err) => {
                        self.done = true;
                        return Some(Err(ExtractionError::InvalidArchive(err.to_string())));
                    }
                };
                let record = MemberRecord::Tar(TarMember {
                    name: String::from_utf8_lossy(&entry.path_bytes()).into_owned(),
                    path,
                    type_flag: entry.header().entry_type().as_byte(),
                    size: entry.size(),
                });
                Some(Ok(TarEntry { record, entry }))
            }
        }
    }
}
