//! Streaming member validation.
//!
//! [`ArchiveValidator`] wraps a [`MemberSource`] and runs every check on each
//! member before handing it out. Members are never buffered, so a caller can
//! extract each one as soon as it is yielded.

use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::formats::traits::MemberSource;
use crate::formats::traits::MemberView;
use crate::security::classify;
use crate::security::path::PathGuard;
use crate::security::ratio::RatioAccountant;
use crate::security::ratio::ValidationState;
use crate::types::MemberRecord;

/// Validates members lazily as they are drawn from a source.
///
/// Checks run in a fixed order: compression method (zip only), member type,
/// path, then cumulative accounting. The first failure is yielded as an
/// error and the iterator is exhausted afterwards.
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::Thresholds;
/// use arcguard_core::formats::ZipHandle;
/// use arcguard_core::security::ArchiveValidator;
/// use arcguard_core::security::PathGuard;
/// use arcguard_core::security::RatioAccountant;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = Path::new("three_files.zip");
/// let mut handle = ZipHandle::open(path)?;
/// let accountant = RatioAccountant::for_archive_file(path, Thresholds::default())?;
/// let validator = ArchiveValidator::new(handle.members(), PathGuard::disabled(), accountant);
/// let records = validator.validate_all()?;
/// println!("{} members", records.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArchiveValidator<S> {
    source: S,
    guard: PathGuard,
    accountant: RatioAccountant,
    finished: bool,
}

impl<S: MemberSource> ArchiveValidator<S> {
    /// Creates a validator over `source`.
    #[must_use]
    pub const fn new(source: S, guard: PathGuard, accountant: RatioAccountant) -> Self {
        Self {
            source,
            guard,
            accountant,
            finished: false,
        }
    }

    /// Validates one member against the running state.
    ///
    /// Returns the path the member would be written to when the guard has a
    /// root.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::UnsupportedCompression`] for a zip member using a
    ///   method other than store, deflate, bzip2 or lzma
    /// - [`ExtractionError::MemberType`] for anything but a regular file or
    ///   directory
    /// - [`ExtractionError::MemberName`] or [`ExtractionError::MemberOverwrite`]
    ///   from the path guard
    /// - [`ExtractionError::ObjectCount`] or [`ExtractionError::ArchiveSize`]
    ///   when a threshold is crossed
    pub fn validate_member(&mut self, record: &MemberRecord) -> Result<Option<PathBuf>> {
        if let MemberRecord::Zip(member) = record
            && !member.method.is_supported()
        {
            return Err(ExtractionError::UnsupportedCompression {
                name: member.name.clone(),
                method: member.method.name(),
            });
        }

        classify::ensure_supported(record)?;
        let destination = self.guard.check_path(record.name(), record.path())?;
        self.accountant.account(record)?;

        log::debug!("validated member '{}'", record.name());
        Ok(destination)
    }

    /// Drains the source, returning the metadata of every member.
    ///
    /// # Errors
    ///
    /// Returns the first decoder or validation error.
    pub fn validate_all(self) -> Result<Vec<MemberRecord>> {
        self.map(|member| member.map(MemberView::into_record)).collect()
    }

    /// Mutable access to the wrapped source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The path guard in use.
    #[must_use]
    pub const fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Totals accumulated so far.
    #[must_use]
    pub const fn state(&self) -> &ValidationState {
        self.accountant.state()
    }
}

impl<S: MemberSource> Iterator for ArchiveValidator<S> {
    type Item = Result<S::Member>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let member = match self.source.next_member() {
            None => {
                self.finished = true;
                return None;
            }
            Some(Err(err)) => {
                self.finished = true;
                return Some(Err(err));
            }
            Some(Ok(member)) => member,
        };

        match self.validate_member(member.record()) {
            Ok(_) => Some(Ok(member)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<S: MemberSource> std::iter::FusedIterator for ArchiveValidator<S> {}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::test_utils::RecordSource;
    use crate::types::ExtractRoot;
    use crate::types::TarMember;
    use crate::types::ZipMember;
    use crate::types::ZipMethod;
    use tempfile::TempDir;

    fn tar(name: &str, type_flag: u8, size: u64) -> MemberRecord {
        MemberRecord::Tar(TarMember::new(name, type_flag, size))
    }

    fn zip(name: &str, unix_mode: u32, method: ZipMethod) -> MemberRecord {
        MemberRecord::Zip(ZipMember {
            index: 0,
            name: name.into(),
            unix_mode,
            is_dir: false,
            size: 10,
            compressed_size: 10,
            method,
        })
    }

    fn validator(
        records: Vec<MemberRecord>,
        guard: PathGuard,
        thresholds: Thresholds,
    ) -> ArchiveValidator<RecordSource> {
        ArchiveValidator::new(
            RecordSource::new(records),
            guard,
            RatioAccountant::new("test.archive", 0, thresholds),
        )
    }

    #[test]
    fn test_validate_all_returns_records_in_order() {
        let records = vec![tar("a", b'0', 1), tar("d/", b'5', 0), tar("d/b", b'0', 2)];
        let result = validator(records.clone(), PathGuard::disabled(), Thresholds::default())
            .validate_all()
            .unwrap();
        assert_eq!(result, records);
    }

    #[test]
    fn test_empty_source() {
        let result = validator(Vec::new(), PathGuard::disabled(), Thresholds::default())
            .validate_all()
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_fused_after_first_error() {
        let records = vec![tar("a", b'0', 1), tar("link", b'2', 0), tar("b", b'0', 1)];
        let mut validator = validator(records, PathGuard::disabled(), Thresholds::default());

        assert!(validator.next().unwrap().is_ok());
        let err = validator.next().unwrap().unwrap_err();
        assert!(matches!(err, ExtractionError::MemberType { .. }));
        assert!(validator.next().is_none());
        assert!(validator.next().is_none());
    }

    #[test]
    fn test_compression_checked_before_type() {
        let records = vec![zip("link", 0o120_777, ZipMethod::from_code(98))];
        let err = validator(records, PathGuard::disabled(), Thresholds::default())
            .validate_all()
            .unwrap_err();
        assert_eq!(err.to_string(), "Compression type not supported: ppmd");
    }

    #[test]
    fn test_type_checked_before_path() {
        let temp = TempDir::new().unwrap();
        let guard = PathGuard::new(Some(ExtractRoot::new(temp.path()).unwrap()), false);
        let records = vec![tar("../escape", b'6', 0)];
        let err = validator(records, guard, Thresholds::default())
            .validate_all()
            .unwrap_err();
        assert!(matches!(err, ExtractionError::MemberType { ref file_type, .. } if file_type == "FIFO"));
    }

    #[test]
    fn test_path_checked_before_accounting() {
        let temp = TempDir::new().unwrap();
        let guard = PathGuard::new(Some(ExtractRoot::new(temp.path()).unwrap()), false);
        let mut validator = validator(
            vec![tar("../invalid", b'0', 5)],
            guard,
            Thresholds::default(),
        );
        let err = validator.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Invalid file path: '../invalid'");
        assert_eq!(validator.state().object_count, 0);
    }

    #[test]
    fn test_object_limit() {
        let records = vec![tar("a", b'0', 1), tar("b", b'0', 1), tar("c", b'0', 1)];
        let at_limit = Thresholds {
            max_objects: Some(3),
            ..Thresholds::default()
        };
        assert!(
            validator(records.clone(), PathGuard::disabled(), at_limit)
                .validate_all()
                .is_ok()
        );

        let below = Thresholds {
            max_objects: Some(2),
            ..Thresholds::default()
        };
        let err = validator(records, PathGuard::disabled(), below)
            .validate_all()
            .unwrap_err();
        assert!(matches!(err, ExtractionError::ObjectCount { count: 3, .. }));
    }

    #[test]
    fn test_validate_member_returns_destination() {
        let temp = TempDir::new().unwrap();
        let root = ExtractRoot::new(temp.path()).unwrap();
        let guard = PathGuard::new(Some(root.clone()), false);
        let mut validator = validator(Vec::new(), guard, Thresholds::default());
        let destination = validator
            .validate_member(&tar("dir/file.txt", b'0', 3))
            .unwrap()
            .expect("destination");
        assert_eq!(destination, root.as_path().join("dir/file.txt"));
        assert_eq!(validator.state().uncompressed_size, 3);
    }
}
