//! Extraction operation reporting.

use std::time::Duration;

use crate::extraction::ExtractionStrategy;

/// Report of an archive extraction operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Number of files extracted.
    pub files_extracted: usize,

    /// Number of directory members created.
    pub directories_created: usize,

    /// Declared bytes of the extracted files.
    pub bytes_written: u64,

    /// Strategy that produced this report.
    pub strategy: ExtractionStrategy,

    /// Duration of the extraction operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report for `strategy`.
    #[must_use]
    pub const fn new(strategy: ExtractionStrategy) -> Self {
        Self {
            files_extracted: 0,
            directories_created: 0,
            bytes_written: 0,
            strategy,
            duration: Duration::ZERO,
        }
    }

    /// Records one extracted file of `size` bytes.
    pub fn record_file(&mut self, size: u64) {
        self.files_extracted += 1;
        self.bytes_written = self.bytes_written.saturating_add(size);
    }

    /// Records one extracted directory.
    pub fn record_directory(&mut self) {
        self.directories_created += 1;
    }

    /// Returns total number of members extracted.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}
