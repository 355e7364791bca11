//! Cumulative object, size and compression ratio accounting.

use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::config::Thresholds;
use crate::error::SizeLimit;
use crate::types::MemberRecord;

/// Running totals for one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationState {
    /// Non-directory members seen so far.
    pub object_count: u64,
    /// Sum of declared member sizes.
    pub uncompressed_size: u64,
    /// On-disk size of the archive; `0` disables the whole-archive ratio.
    pub compressed_size: u64,
}

/// Returns `true` if `uncompressed / compressed > max`.
///
/// Evaluated on integers so no precision is lost near the boundary. A zero
/// `compressed` never exceeds.
#[must_use]
pub const fn exceeds_ratio(uncompressed: u64, compressed: u64, max: u64) -> bool {
    if compressed == 0 {
        return false;
    }
    (uncompressed as u128) > (max as u128) * (compressed as u128)
}

/// Enforces [`Thresholds`] across the members of one archive.
///
/// Each member is accounted before the next one is considered, so a limit
/// trips at the first member that crosses it.
#[derive(Debug, Clone)]
pub struct RatioAccountant {
    archive: PathBuf,
    thresholds: Thresholds,
    state: ValidationState,
}

impl RatioAccountant {
    /// Creates an accountant for an archive of `compressed_size` bytes.
    #[must_use]
    pub fn new(archive: impl Into<PathBuf>, compressed_size: u64, thresholds: Thresholds) -> Self {
        Self {
            archive: archive.into(),
            thresholds,
            state: ValidationState {
                compressed_size,
                ..ValidationState::default()
            },
        }
    }

    /// Creates an accountant whose compressed size is the file's size on disk.
    pub fn for_archive_file(path: &Path, thresholds: Thresholds) -> Result<Self> {
        let compressed_size = std::fs::metadata(path)?.len();
        Ok(Self::new(path, compressed_size, thresholds))
    }

    /// Totals accumulated so far.
    #[must_use]
    pub const fn state(&self) -> &ValidationState {
        &self.state
    }

    /// Archive label used in error messages.
    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Adds `member` to the totals and checks every threshold.
    ///
    /// A zip member's own ratio is checked first and leaves the totals
    /// untouched when it fails.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::ObjectCount`] when the count passes `max_objects`
    /// - [`ExtractionError::ArchiveSize`] when the total size, a zip member's
    ///   own ratio or the whole-archive ratio passes its limit
    pub fn account(&mut self, member: &MemberRecord) -> Result<()> {
        if let Some(max) = self.thresholds.max_ratio
            && let Some(compressed) = member.compressed_size()
            && exceeds_ratio(member.size(), compressed, max)
        {
            return Err(self.size_error(SizeLimit::MemberRatio {
                name: member.name().to_string(),
                ratio: member.size() as f64 / compressed as f64,
                max,
            }));
        }

        let count = if member.is_dir() {
            Some(self.state.object_count)
        } else {
            self.state.object_count.checked_add(1)
        };
        let size = self.state.uncompressed_size.checked_add(member.size());
        let (Some(count), Some(size)) = (count, size) else {
            return Err(self.size_error(SizeLimit::IntegerOverflow));
        };
        self.state.object_count = count;
        self.state.uncompressed_size = size;

        if let Some(max) = self.thresholds.max_objects
            && self.state.object_count > max
        {
            return Err(ExtractionError::ObjectCount {
                archive: self.archive.clone(),
                count: self.state.object_count,
                max,
            });
        }

        if let Some(max) = self.thresholds.max_size
            && self.state.uncompressed_size > max
        {
            return Err(self.size_error(SizeLimit::TotalSize { max }));
        }

        if let Some(max) = self.thresholds.max_ratio
            && exceeds_ratio(
                self.state.uncompressed_size,
                self.state.compressed_size,
                max,
            )
        {
            return Err(self.size_error(SizeLimit::ArchiveRatio { max }));
        }

        Ok(())
    }

    fn size_error(&self, limit: SizeLimit) -> ExtractionError {
        ExtractionError::ArchiveSize {
            archive: self.archive.clone(),
            limit,
        }
    }
}
