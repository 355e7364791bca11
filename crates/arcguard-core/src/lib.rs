//! Safety-validating reader for tar and zip archives.
//!
//! `arcguard-core` inspects every member of an archive before it is written
//! and refuses archives that carry special files, escape the extraction
//! directory, replace existing files, or expand beyond configured limits.
//!
//! Tar archives may be uncompressed or wrapped in gzip, bzip2, xz or zstd.
//! Zip members may use store, deflate, bzip2 or lzma.
//!
//! # Examples
//!
//! ```no_run
//! use arcguard_core::ExtractionStrategy;
//! use arcguard_core::SecurityConfig;
//! use arcguard_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SecurityConfig::from_system();
//! let report = extract_archive(
//!     "archive.tar.gz",
//!     "/output/dir",
//!     &config,
//!     ExtractionStrategy::Precheck,
//! )?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
pub mod security;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::extract_archive;
pub use api::extract_prechecked;
pub use api::extract_streaming;
pub use api::open_archive;
pub use api::validate_archive;
pub use config::ConfigError;
pub use config::SecurityConfig;
pub use config::Thresholds;
pub use error::ExtractionError;
pub use error::Result;
pub use error::SizeLimit;
pub use extraction::ExtractionStrategy;
pub use extraction::PartialExtraction;
pub use extraction::extract_tar_stream;
pub use report::ExtractionReport;

// Re-export types module for easier access
pub use types::ExtractRoot;
pub use types::MemberRecord;
pub use types::MemberType;
