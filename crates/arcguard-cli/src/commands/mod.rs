//! Subcommand implementations.

pub mod decompress;
pub mod validate;

use crate::cli::ThresholdArgs;
use arcguard_core::Thresholds;

impl ThresholdArgs {
    /// Thresholds from `--config` (or the system file) with flag overrides.
    pub fn resolve(&self) -> Thresholds {
        let mut thresholds = self
            .config
            .as_deref()
            .map_or_else(Thresholds::system, Thresholds::load_or_default);

        if let Some(limit) = self.max_objects {
            thresholds.max_objects = limit.into_option();
        }
        if let Some(limit) = self.max_size {
            thresholds.max_size = limit.into_option();
        }
        if let Some(limit) = self.max_ratio {
            thresholds.max_ratio = limit.into_option();
        }

        log::debug!("effective thresholds: {thresholds:?}");
        thresholds
    }
}
