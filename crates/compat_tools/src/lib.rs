//! # Compat Development Tools
//!
//! Command-line tooling around `compat_core`:
//! - Configuration ([`config`])
//! - Registry and data loaders ([`loader`])
//! - Issue reporting ([`logger`])
//! - Batch data validation ([`validate`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod loader;
pub mod logger;
pub mod validate;

pub use config::{ConfigError, LintConfig};
pub use loader::{category_for, collect_data_files, load_feature_file, load_registry, LoadError};
pub use logger::{Logger, Style};
pub use validate::{
    validate_data_directory, validate_file, validate_files, FileReport, LintContext,
    ValidationSummary,
};
