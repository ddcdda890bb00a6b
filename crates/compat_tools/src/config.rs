//! Linter configuration.
//!
//! Configuration is read from a RON file. Every field has a default, so an
//! empty `LintConfig()` is a valid configuration.
//!
//! # Example RON
//!
//! ```ron
//! LintConfig(
//!     data_root: "data",
//!     registry: "browsers",
//!     jobs: 4,
//!     color: false,
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when no config is given.
pub const DEFAULT_CONFIG_FILE: &str = "compat-lint.ron";

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// Settings for a lint run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Root of the compat data tree. Categories are derived relative to it.
    pub data_root: PathBuf,
    /// Browser registry directory or file. Relative paths are resolved
    /// against `data_root`.
    pub registry: PathBuf,
    /// Parallel workers (0 = rayon default).
    pub jobs: usize,
    /// Use ANSI styling in text reports.
    pub color: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            registry: PathBuf::from("browsers"),
            jobs: 0,
            color: true,
        }
    }
}

impl LintConfig {
    /// Load a configuration from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        let config: LintConfig = ron::from_str(ron)?;
        Ok(config)
    }

    /// Resolve the configuration to use for this run.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!("Using config from {}", default_path.display());
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Registry location with relative paths resolved against the data root.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        if self.registry.is_absolute() {
            self.registry.clone()
        } else {
            self.data_root.join(&self.registry)
        }
    }
}
