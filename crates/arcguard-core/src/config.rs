//! Limits and policy applied while validating archives.
//!
//! Thresholds come from three places, in order of precedence: values set by
//! the caller, the system configuration file, and the built-in defaults.
//! The configuration file is TOML with a single `[THRESHOLDS]` table:
//!
//! ```toml
//! [THRESHOLDS]
//! RATIO_THRESHOLD = 100
//! SIZE_THRESHOLD = 4398046511104
//! OBJECT_THRESHOLD = 100000
//! ```

use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default maximum number of non-directory members.
pub const DEFAULT_MAX_OBJECTS: u64 = 100_000;

/// Default maximum total uncompressed size (4 TiB).
pub const DEFAULT_MAX_SIZE: u64 = 4 * 1024 * 1024 * 1024 * 1024;

/// Default maximum compression ratio.
pub const DEFAULT_MAX_RATIO: u64 = 100;

/// Location of the system configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/arcguard/arcguard.conf";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "ARCGUARD_CONFIG";

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration '{}': {source}", path.display())]
    Read {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or lacks the `[THRESHOLDS]` table.
    #[error("cannot parse configuration '{}': {source}", path.display())]
    Parse {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
}

/// Numeric limits enforced by [`crate::security::RatioAccountant`].
///
/// `None` disables the corresponding check.
///
/// # Examples
///
/// ```
/// use arcguard_core::Thresholds;
///
/// let limits = Thresholds {
///     max_objects: Some(3),
///     ..Thresholds::default()
/// };
/// assert_eq!(limits.max_ratio, Some(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Maximum number of non-directory members.
    pub max_objects: Option<u64>,
    /// Maximum total uncompressed size in bytes.
    pub max_size: Option<u64>,
    /// Maximum ratio of uncompressed to compressed bytes.
    pub max_ratio: Option<u64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_objects: Some(DEFAULT_MAX_OBJECTS),
            max_size: Some(DEFAULT_MAX_SIZE),
            max_ratio: Some(DEFAULT_MAX_RATIO),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "THRESHOLDS")]
    thresholds: ThresholdSection,
}

#[derive(Debug, Deserialize)]
struct ThresholdSection {
    #[serde(rename = "RATIO_THRESHOLD", default = "default_ratio")]
    ratio: u64,
    #[serde(rename = "SIZE_THRESHOLD", default = "default_size")]
    size: u64,
    #[serde(rename = "OBJECT_THRESHOLD", default = "default_objects")]
    objects: u64,
}

const fn default_ratio() -> u64 {
    DEFAULT_MAX_RATIO
}

const fn default_size() -> u64 {
    DEFAULT_MAX_SIZE
}

const fn default_objects() -> u64 {
    DEFAULT_MAX_OBJECTS
}

static SYSTEM_THRESHOLDS: OnceLock<Thresholds> = OnceLock::new();

impl Thresholds {
    /// Thresholds with every check disabled.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_objects: None,
            max_size: None,
            max_ratio: None,
        }
    }

    /// Parses thresholds from TOML text.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(Self {
            max_objects: Some(file.thresholds.objects),
            max_size: Some(file.thresholds.size),
            max_ratio: Some(file.thresholds.ratio),
        })
    }

    /// Loads thresholds from a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Loads thresholds from `path`, falling back to defaults with a warning.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(thresholds) => {
                log::debug!("loaded thresholds from {}", path.display());
                thresholds
            }
            Err(err) => {
                log::warn!("{err}; using default thresholds");
                Self::default()
            }
        }
    }

    /// Thresholds from the system configuration file.
    ///
    /// The file is read once per process. Its location is
    /// [`DEFAULT_CONFIG_PATH`] unless `ARCGUARD_CONFIG` names another file.
    pub fn system() -> Self {
        *SYSTEM_THRESHOLDS.get_or_init(|| {
            Self::load_or_default(&config_path_from(std::env::var_os(CONFIG_PATH_ENV)))
        })
    }
}

/// Resolves the configuration path from an optional override.
#[must_use]
pub fn config_path_from(value: Option<OsString>) -> PathBuf {
    match value {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Policy for a validation or extraction call.
///
/// # Examples
///
/// ```
/// use arcguard_core::SecurityConfig;
///
/// let config = SecurityConfig {
///     allow_overwrite: true,
///     ..Default::default()
/// };
/// assert!(config.allow_overwrite);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Numeric limits.
    pub thresholds: Thresholds,
    /// Permit members to replace existing regular files under the root.
    pub allow_overwrite: bool,
}

impl SecurityConfig {
    /// Configuration using the system thresholds and no overwriting.
    #[must_use]
    pub fn from_system() -> Self {
        Self {
            thresholds: Thresholds::system(),
            allow_overwrite: false,
        }
    }

    /// Replaces the thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets whether existing files may be overwritten.
    #[must_use]
    pub const fn with_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }
}
