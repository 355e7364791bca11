//! Filesystem writes shared by the zip extraction paths.
//!
//! Tar members are written by the tar decoder itself; zip members go
//! through these helpers.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::Result;

/// Buffer size for file writes (64KB).
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Writes `reader` to `output_path`, creating parent directories.
///
/// An existing file is truncated. Returns the number of bytes written.
pub fn write_file<R: Read>(reader: &mut R, output_path: &Path) -> Result<u64> {
    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let output_file = File::create(output_path)?;
    let mut buffered_writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, output_file);
    let bytes_written = std::io::copy(reader, &mut buffered_writer)?;
    buffered_writer.flush()?;

    Ok(bytes_written)
}

/// Creates a directory and its parents. Existing directories are fine.
pub fn create_directory(dir_path: &Path) -> Result<()> {
    create_dir_all(dir_path)?;
    Ok(())
}
