//! Extraction drivers.
//!
//! Two strategies are offered. [`ExtractionStrategy::Precheck`] validates
//! the whole archive before writing anything and then extracts in bulk.
//! [`ExtractionStrategy::Streaming`] validates and writes one member at a
//! time; a failure leaves the members written before it in place and
//! reports them through [`PartialExtraction`].

pub mod engine;
pub mod stream;

use std::fmt;
use std::path::PathBuf;

use crate::ExtractionError;

pub use engine::ExtractionEngine;
pub use stream::extract_tar_stream;

/// How an extraction validates and writes members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExtractionStrategy {
    /// Validate every member, then extract.
    #[default]
    Precheck,
    /// Validate and extract member by member.
    Streaming,
}

impl ExtractionStrategy {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Precheck => "precheck",
            Self::Streaming => "streaming",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A streaming extraction that stopped part way.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct PartialExtraction {
    /// Why extraction stopped.
    pub error: ExtractionError,
    /// Paths of members written before the failure, in archive order.
    pub written: Vec<PathBuf>,
}

impl From<PartialExtraction> for ExtractionError {
    fn from(partial: PartialExtraction) -> Self {
        partial.error
    }
}

impl From<ExtractionError> for PartialExtraction {
    fn from(error: ExtractionError) -> Self {
        Self {
            error,
            written: Vec::new(),
        }
    }
}
