//! Member-by-member tar extraction.
//!
//! Also serves tar streams that cannot be reopened, such as the output of a
//! child process. Such streams have no on-disk size, so the whole-archive
//! ratio check is skipped for them.

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::ExtractionReport;
use crate::Result;
use crate::SecurityConfig;
use crate::extraction::ExtractionStrategy;
use crate::extraction::PartialExtraction;
use crate::formats::TarHandle;
use crate::formats::traits::MemberView;
use crate::security::ArchiveValidator;
use crate::security::PathGuard;
use crate::security::RatioAccountant;
use crate::types::ExtractRoot;

/// Validates and writes each member of `handle` in turn.
///
/// Every written path is pushed to `written` as soon as it lands on disk.
pub fn stream_tar(
    handle: &mut TarHandle,
    root: &ExtractRoot,
    config: &SecurityConfig,
    compressed_size: u64,
    report: &mut ExtractionReport,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let accountant =
        RatioAccountant::new(handle.label().to_path_buf(), compressed_size, config.thresholds);
    let guard = PathGuard::new(Some(root.clone()), config.allow_overwrite);
    let mut validator = ArchiveValidator::new(handle.members()?, guard, accountant);

    for member in &mut validator {
        let mut entry = member?;
        let record = entry.record();
        let (name, is_dir, size) = (record.name().to_string(), record.is_dir(), record.size());
        let destination = root.join_path(record.path());

        if entry.unpack_in(root.as_path())? {
            if is_dir {
                report.record_directory();
            } else {
                report.record_file(size);
            }
            written.push(destination);
        } else {
            log::warn!("decoder skipped member '{name}'");
        }
    }

    Ok(())
}

/// Extracts a tar stream read from `reader` into `dest`.
///
/// The compression layer is detected from the stream itself. Members are
/// validated and written one at a time.
///
/// # Errors
///
/// On failure the returned [`PartialExtraction`] lists what was written.
///
/// # Examples
///
/// ```no_run
/// use arcguard_core::SecurityConfig;
/// use arcguard_core::extract_tar_stream;
/// use std::process::Command;
/// use std::process::Stdio;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut child = Command::new("cat")
///     .arg("archive.tar.gz")
///     .stdout(Stdio::piped())
///     .spawn()?;
/// let stdout = child.stdout.take().ok_or("no stdout")?;
/// let report = extract_tar_stream(stdout, "/tmp/output", &SecurityConfig::default())?;
/// child.wait()?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_tar_stream<R: Read + 'static, P: AsRef<Path>>(
    reader: R,
    dest: P,
    config: &SecurityConfig,
) -> std::result::Result<ExtractionReport, PartialExtraction> {
    let start = Instant::now();
    let mut report = ExtractionReport::new(ExtractionStrategy::Streaming);
    let mut written = Vec::new();

    let outcome = ExtractRoot::new(dest.as_ref()).and_then(|root| {
        root.create()?;
        let mut handle = TarHandle::from_reader(reader)?;
        log::info!("extracting tar stream into {}", root.as_path().display());
        stream_tar(&mut handle, &root, config, 0, &mut report, &mut written)
    });

    match outcome {
        Ok(()) => {
            report.duration = start.elapsed();
            Ok(report)
        }
        Err(error) => Err(PartialExtraction { error, written }),
    }
}
