//! Error conversion utilities for CLI.
//!
//! Converts arcguard-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use arcguard_core::ExtractionError;
use arcguard_core::PartialExtraction;
use arcguard_core::SizeLimit;
use std::path::Path;

fn hint_for(err: &ExtractionError) -> Option<&'static str> {
    match err {
        ExtractionError::MemberName { .. } => {
            Some("This archive may be malicious. Do not extract from untrusted sources.")
        }
        ExtractionError::MemberType { .. } => {
            Some("Only regular files and directories can be extracted.")
        }
        ExtractionError::MemberOverwrite { .. } => {
            Some("Use --allow-overwrite to replace existing files.")
        }
        ExtractionError::ObjectCount { .. } => Some("Use --max-objects to raise the limit."),
        ExtractionError::ArchiveSize { limit, .. } => match limit {
            SizeLimit::TotalSize { .. } => Some("Use --max-size to raise the limit."),
            SizeLimit::ArchiveRatio { .. } | SizeLimit::MemberRatio { .. } => Some(
                "This archive may be a decompression bomb. Use --max-ratio to allow higher ratios if legitimate.",
            ),
            SizeLimit::IntegerOverflow => Some("The archive declares impossible member sizes."),
        },
        ExtractionError::UnsupportedCompression { .. } => {
            Some("Supported zip methods: store, deflate, bzip2, lzma")
        }
        ExtractionError::UnsupportedContainer { .. } => {
            Some("Supported formats: tar, tar.gz, tar.bz2, tar.xz, tar.zst, zip")
        }
        ExtractionError::InvalidArchive(_) => {
            Some("The archive may be corrupted or truncated.")
        }
        _ => None,
    }
}

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    let prefix = if err.is_security_violation() {
        "Security violation in"
    } else {
        "Error processing"
    };

    match hint_for(&err) {
        Some(hint) => anyhow!("{prefix} '{}': {err}\nHINT: {hint}", archive.display()),
        None => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Converts a failed streaming extraction, noting what was left on disk.
pub fn convert_partial_extraction(
    partial: PartialExtraction,
    archive: &Path,
    dest: &Path,
) -> anyhow::Error {
    let written = partial.written.len();
    let err = convert_extraction_error(partial.error, archive);
    if written == 0 {
        err
    } else {
        anyhow!(
            "{err}\nNOTE: {written} members were extracted into '{}' before the failure",
            dest.display()
        )
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}
