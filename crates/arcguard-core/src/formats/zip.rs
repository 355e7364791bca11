//! Zip archive access through the `zip` crate.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use zip::ZipArchive;

use crate::ExtractionError;
use crate::Result;
use crate::formats::common;
use crate::formats::traits::MemberSource;
use crate::types::ExtractRoot;
use crate::types::MemberRecord;
use crate::types::ZipMember;
use crate::types::ZipMethod;

/// An open zip archive.
#[derive(Debug)]
pub struct ZipHandle<R = BufReader<File>> {
    archive: ZipArchive<R>,
    label: PathBuf,
}

impl ZipHandle {
    /// Opens the zip archive at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), path)
    }
}

impl<R: Read + Seek> ZipHandle<R> {
    /// Reads the central directory of `reader`.
    pub fn from_reader(reader: R, label: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
            label: label.into(),
        })
    }

    /// Path of the archive.
    #[must_use]
    pub fn label(&self) -> &Path {
        &self.label
    }

    /// Number of members in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Iterates over the members in central directory order.
    pub fn members(&mut self) -> ZipMembers<'_, R> {
        ZipMembers {
            archive: &mut self.archive,
            next: 0,
        }
    }
}

/// Lazy member sequence of a [`ZipHandle`].
///
/// Metadata is read without decompressing, so members with unsupported
/// methods are still reported and can be rejected by name.
#[derive(Debug)]
pub struct ZipMembers<'a, R> {
    archive: &'a mut ZipArchive<R>,
    next: usize,
}

impl<R: Read + Seek> ZipMembers<'_, R> {
    fn read_record(&mut self, index: usize) -> Result<MemberRecord> {
        let file = self.archive.by_index_raw(index)?;
        Ok(MemberRecord::Zip(ZipMember {
            index,
            name: file.name().to_string(),
            unix_mode: file.unix_mode().unwrap_or(0),
            is_dir: file.is_dir(),
            size: file.size(),
            compressed_size: file.compressed_size(),
            method: ZipMethod::from_compression(file.compression()),
        }))
    }

    /// Writes `member` beneath `root` and returns the written path.
    ///
    /// The member must already have passed validation against the same
    /// root.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MemberName`] if the name does not resolve
    /// inside `root`, or the decoder's error if decompression fails.
    pub fn extract(&mut self, member: &ZipMember, root: &ExtractRoot) -> Result<PathBuf> {
        let target = root.join_member(&member.name);
        if !root.contains(&target) {
            return Err(ExtractionError::MemberName {
                name: member.name.clone(),
            });
        }

        if member.is_dir {
            common::create_directory(&target)?;
        } else {
            let mut file = self.archive.by_index(member.index)?;
            common::write_file(&mut file, &target)?;
        }
        Ok(target)
    }
}

impl<R: Read + Seek> MemberSource for ZipMembers<'_, R> {
    type Member = MemberRecord;

    fn next_member(&mut self) -> Option<Result<MemberRecord>> {
        if self.next >= self.archive.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.read_record(index))
    }
}
