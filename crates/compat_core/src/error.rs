//! Error types for the compatibility data core.

use thiserror::Error;

/// Result type alias using [`CompatError`].
pub type Result<T> = std::result::Result<T, CompatError>;

/// Top-level error type for the core.
///
/// Validation findings are never errors; they are reported as
/// [`Issue`](crate::issue::Issue) values. These variants cover inputs the
/// core cannot work with at all.
#[derive(Debug, Error)]
pub enum CompatError {
    /// The same browser identifier was registered twice.
    #[error("Duplicate browser ID: {0}")]
    DuplicateBrowser(String),

    /// A feature document could not be decoded.
    #[error("Failed to decode feature data: {0}")]
    FeatureDecode(#[source] serde_json::Error),

    /// A browser registry document could not be decoded.
    #[error("Failed to decode browser registry: {0}")]
    RegistryDecode(#[source] serde_json::Error),
}
