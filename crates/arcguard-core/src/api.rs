//! High-level public API for archive validation and extraction.

use std::path::Path;

use crate::ExtractionReport;
use crate::Result;
use crate::SecurityConfig;
use crate::extraction::ExtractionEngine;
use crate::extraction::ExtractionStrategy;
use crate::extraction::PartialExtraction;
use crate::extraction::engine::validate_file;
use crate::formats::ArchiveHandle;
use crate::formats::detect_container;
use crate::types::ExtractRoot;
use crate::types::MemberRecord;

/// Extracts an archive to the specified output directory.
///
/// The container format is detected from the file content. The output
/// directory is created if missing.
///
/// # Errors
///
/// Returns an error if:
/// - Archive file cannot be opened
/// - Archive format is unsupported or the tar archive is blank
/// - A member fails validation
/// - I/O operations fail
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::ExtractionStrategy;
/// use arcguard_core::SecurityConfig;
/// use arcguard_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SecurityConfig::default();
/// let report = extract_archive(
///     "archive.tar.gz",
///     "/tmp/output",
///     &config,
///     ExtractionStrategy::Precheck,
/// )?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &SecurityConfig,
    strategy: ExtractionStrategy,
) -> Result<ExtractionReport> {
    ExtractionEngine::new(*config).extract(archive_path.as_ref(), output_dir.as_ref(), strategy)
}

/// Validates every member, then extracts. Nothing is written on failure.
pub fn extract_prechecked<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    ExtractionEngine::new(*config).extract_prechecked(archive_path.as_ref(), output_dir.as_ref())
}

/// Validates and extracts member by member.
///
/// # Errors
///
/// The returned [`PartialExtraction`] lists the members written before the
/// failure.
pub fn extract_streaming<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &SecurityConfig,
) -> std::result::Result<ExtractionReport, PartialExtraction> {
    ExtractionEngine::new(*config).extract_streaming(archive_path.as_ref(), output_dir.as_ref())
}

/// Validates an archive without writing anything.
///
/// Path and overwrite checks run only when `root` is given.
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::SecurityConfig;
/// use arcguard_core::validate_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let members = validate_archive("upload.zip", None::<&str>, &SecurityConfig::default())?;
/// for member in &members {
///     println!("{}", member.name());
/// }
/// # Ok(())
/// # }
/// ```
pub fn validate_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    root: Option<Q>,
    config: &SecurityConfig,
) -> Result<Vec<MemberRecord>> {
    let archive_path = archive_path.as_ref();
    let root = root.map(|r| ExtractRoot::new(r.as_ref())).transpose()?;
    let kind = detect_container(archive_path)?;
    validate_file(archive_path, kind, root, config)
}

/// Validates an archive and returns a fresh handle positioned at its start.
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::SecurityConfig;
/// use arcguard_core::formats::ArchiveHandle;
/// use arcguard_core::open_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// match open_archive("data.tar.xz", Some("/srv/data"), &SecurityConfig::default())? {
///     ArchiveHandle::Tar(mut tar) => tar.unpack("/srv/data".as_ref())?,
///     ArchiveHandle::Zip(zip) => println!("{} zip members", zip.len()),
/// }
/// # Ok(())
/// # }
/// ```
pub fn open_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    root: Option<Q>,
    config: &SecurityConfig,
) -> Result<ArchiveHandle> {
    let archive_path = archive_path.as_ref();
    let root = root.map(|r| ExtractRoot::new(r.as_ref())).transpose()?;
    let kind = detect_container(archive_path)?;
    let records = validate_file(archive_path, kind, root, config)?;
    log::debug!(
        "{} validated with {} members",
        archive_path.display(),
        records.len()
    );
    ArchiveHandle::open_as(archive_path, kind)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ExtractionError;
    use crate::formats::MemberSource;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::ZipTestBuilder;
    use crate::test_utils::write_archive;
    use tempfile::TempDir;

    #[test]
    fn test_validate_archive_lists_members() {
        let temp = TempDir::new().unwrap();
        let data = ZipTestBuilder::new()
            .add_file("a.txt", b"a")
            .add_file("b.txt", b"b")
            .build();
        let archive = write_archive(temp.path(), "two.zip", &data);
        let members = validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap();
        let names: Vec<&str> = members.iter().map(MemberRecord::name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_validate_archive_with_root_checks_overwrite() {
        let temp = TempDir::new().unwrap();
        let data = TarTestBuilder::new().add_file("a.txt", b"a").build();
        let archive = write_archive(temp.path(), "a.tar", &data);
        let root = temp.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), b"existing").unwrap();

        let err = validate_archive(&archive, Some(&root), &SecurityConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractionError::MemberOverwrite { .. }));
    }

    #[test]
    fn test_open_archive_returns_fresh_handle() {
        let temp = TempDir::new().unwrap();
        let data = TarTestBuilder::new()
            .add_file("a.txt", b"a")
            .add_file("b.txt", b"b")
            .build();
        let archive = write_archive(temp.path(), "a.tar", &data);

        let handle = open_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap();
        let ArchiveHandle::Tar(mut tar) = handle else {
            panic!("expected tar handle");
        };
        let mut members = tar.members().unwrap();
        let mut count = 0;
        while let Some(member) = members.next_member() {
            member.unwrap();
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_open_archive_rejects_invalid() {
        let temp = TempDir::new().unwrap();
        let data = ZipTestBuilder::new().add_symlink("link", "/etc/passwd").build();
        let archive = write_archive(temp.path(), "bad.zip", &data);
        let err = open_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap_err();
        assert!(err.to_string().contains("SYM"));
    }
}
