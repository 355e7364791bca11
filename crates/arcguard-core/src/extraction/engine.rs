//! Core extraction engine.

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ExtractionReport;
use crate::Result;
use crate::SecurityConfig;
use crate::extraction::ExtractionStrategy;
use crate::extraction::PartialExtraction;
use crate::extraction::stream;
use crate::formats::ArchiveHandle;
use crate::formats::ArchiveType;
use crate::formats::detect_container;
use crate::security::ArchiveValidator;
use crate::security::PathGuard;
use crate::security::RatioAccountant;
use crate::types::ExtractRoot;
use crate::types::MemberRecord;

/// Runs one validation pass over the archive file at `archive`.
///
/// Path checks run only when `root` is given.
pub fn validate_file(
    archive: &Path,
    kind: ArchiveType,
    root: Option<ExtractRoot>,
    config: &SecurityConfig,
) -> Result<Vec<MemberRecord>> {
    let guard = PathGuard::new(root, config.allow_overwrite);
    let accountant = RatioAccountant::for_archive_file(archive, config.thresholds)?;

    match ArchiveHandle::open_as(archive, kind)? {
        ArchiveHandle::Tar(mut handle) => {
            ArchiveValidator::new(handle.members()?, guard, accountant).validate_all()
        }
        ArchiveHandle::Zip(mut handle) => {
            ArchiveValidator::new(handle.members(), guard, accountant).validate_all()
        }
    }
}

fn tally(report: &mut ExtractionReport, records: &[MemberRecord]) {
    for record in records {
        if record.is_dir() {
            report.record_directory();
        } else {
            report.record_file(record.size());
        }
    }
}

/// Main extraction engine.
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::SecurityConfig;
/// use arcguard_core::extraction::ExtractionEngine;
/// use arcguard_core::extraction::ExtractionStrategy;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ExtractionEngine::new(SecurityConfig::default());
/// let report = engine.extract(
///     Path::new("archive.tar.gz"),
///     Path::new("/tmp/output"),
///     ExtractionStrategy::Precheck,
/// )?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    config: SecurityConfig,
}

impl ExtractionEngine {
    /// Creates a new extraction engine with the given configuration.
    #[must_use]
    pub const fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Extracts `archive` into `output_dir` with the chosen strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction fails or security checks are violated.
    pub fn extract(
        &self,
        archive: &Path,
        output_dir: &Path,
        strategy: ExtractionStrategy,
    ) -> Result<ExtractionReport> {
        match strategy {
            ExtractionStrategy::Precheck => self.extract_prechecked(archive, output_dir),
            ExtractionStrategy::Streaming => Ok(self.extract_streaming(archive, output_dir)?),
        }
    }

    /// Validates every member, then extracts the archive in bulk.
    ///
    /// Nothing is written if validation fails.
    pub fn extract_prechecked(&self, archive: &Path, output_dir: &Path) -> Result<ExtractionReport> {
        let start = Instant::now();
        let root = ExtractRoot::new(output_dir)?;
        let kind = detect_container(archive)?;
        let records = validate_file(archive, kind, Some(root.clone()), &self.config)?;

        log::info!(
            "extracting {} ({}, {} members) into {}",
            archive.display(),
            kind.name(),
            records.len(),
            root.as_path().display()
        );
        root.create()?;

        let mut report = ExtractionReport::new(ExtractionStrategy::Precheck);
        match ArchiveHandle::open_as(archive, kind)? {
            ArchiveHandle::Tar(mut handle) => handle.unpack(root.as_path())?,
            ArchiveHandle::Zip(mut handle) => {
                let mut members = handle.members();
                for record in &records {
                    if let MemberRecord::Zip(member) = record {
                        members.extract(member, &root)?;
                    }
                }
            }
        }
        tally(&mut report, &records);

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Validates and extracts one member at a time.
    ///
    /// # Errors
    ///
    /// The returned [`PartialExtraction`] lists the members written before
    /// the failure.
    pub fn extract_streaming(
        &self,
        archive: &Path,
        output_dir: &Path,
    ) -> std::result::Result<ExtractionReport, PartialExtraction> {
        let start = Instant::now();
        let mut report = ExtractionReport::new(ExtractionStrategy::Streaming);
        let mut written = Vec::new();

        match self.stream_members(archive, output_dir, &mut report, &mut written) {
            Ok(()) => {
                report.duration = start.elapsed();
                Ok(report)
            }
            Err(error) => Err(PartialExtraction { error, written }),
        }
    }

    fn stream_members(
        &self,
        archive: &Path,
        output_dir: &Path,
        report: &mut ExtractionReport,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let root = ExtractRoot::new(output_dir)?;
        let kind = detect_container(archive)?;
        let compressed_size = std::fs::metadata(archive)?.len();
        root.create()?;

        log::info!(
            "streaming {} ({}) into {}",
            archive.display(),
            kind.name(),
            root.as_path().display()
        );

        match ArchiveHandle::open_as(archive, kind)? {
            ArchiveHandle::Tar(mut handle) => {
                stream::stream_tar(&mut handle, &root, &self.config, compressed_size, report, written)
            }
            ArchiveHandle::Zip(mut handle) => {
                let guard = PathGuard::new(Some(root.clone()), self.config.allow_overwrite);
                let accountant =
                    RatioAccountant::new(archive, compressed_size, self.config.thresholds);
                let mut validator = ArchiveValidator::new(handle.members(), guard, accountant);

                while let Some(member) = validator.next() {
                    let MemberRecord::Zip(member) = member? else {
                        continue;
                    };
                    let path = validator.source_mut().extract(&member, &root)?;
                    if member.is_dir {
                        report.record_directory();
                    } else {
                        report.record_file(member.size);
                    }
                    written.push(path);
                }
                Ok(())
            }
        }
    }
}
