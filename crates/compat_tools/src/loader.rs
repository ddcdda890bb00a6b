//! Loading compat data and browser registries from disk.
//!
//! Everything that touches the filesystem lives here; `compat_core` only
//! sees decoded values.

use std::path::{Path, PathBuf};

use compat_core::browsers::{BrowserRegistry, RegistryDocument};
use compat_core::category::Category;
use compat_core::data::FeatureNode;
use compat_core::error::CompatError;
use thiserror::Error;

/// Errors that can occur while loading files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file or directory.
    #[error("Failed to read '{path}': {source}")]
    IoError {
        /// Path that could not be read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON file.
    #[error("Failed to parse JSON file '{path}': {source}")]
    ParseError {
        /// Path to the file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A data file is valid JSON but not a feature tree.
    #[error("Invalid feature data '{path}': {source}")]
    FeatureError {
        /// Path to the file.
        path: String,
        /// Underlying decode error.
        #[source]
        source: CompatError,
    },

    /// Registry files define the same browser twice.
    #[error("Invalid browser registry '{path}': {source}")]
    RegistryError {
        /// Registry file that introduced the conflict.
        path: String,
        /// Underlying registry error.
        #[source]
        source: CompatError,
    },

    /// A path given to the linter does not exist.
    #[error("Path not found: {0}")]
    NotFound(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|e| LoadError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|e| LoadError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

/// List the `.json` files directly inside `dir`, sorted.
fn json_files_in(dir: &Path) -> LoadResult<Vec<PathBuf>> {
    let io_error = |e| LoadError::IoError {
        path: dir.display().to_string(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && is_json(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Load the browser registry.
///
/// `path` is either a single registry file or a directory whose `.json`
/// files are merged, each shaped `{ "browsers": { "<id>": { ... } } }`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or if two files
/// define the same browser.
pub fn load_registry(path: &Path) -> LoadResult<BrowserRegistry> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let files = if path.is_dir() {
        json_files_in(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut registry = BrowserRegistry::new();
    for file in &files {
        let document: RegistryDocument = read_json(file)?;
        tracing::trace!(
            "Registry file {} defines {} browsers",
            file.display(),
            document.browsers.len()
        );
        registry
            .merge(document)
            .map_err(|e| LoadError::RegistryError {
                path: file.display().to_string(),
                source: e,
            })?;
    }

    if registry.is_empty() {
        tracing::warn!("Browser registry at {} is empty", path.display());
    }
    tracing::info!(
        "Loaded {} browsers from {}",
        registry.len(),
        path.display()
    );

    Ok(registry)
}

/// Load a compat data file as a feature tree.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a feature tree.
pub fn load_feature_file(path: &Path) -> LoadResult<FeatureNode> {
    let contents = read_file(path)?;
    FeatureNode::from_json_str(&contents).map_err(|e| LoadError::FeatureError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Derive the category of `file` from its location under `data_root`.
///
/// Files outside the data root are uncategorized.
#[must_use]
pub fn category_for(file: &Path, data_root: &Path) -> Category {
    let relative = file
        .strip_prefix(data_root)
        .ok()
        .map(Path::to_path_buf)
        .or_else(|| {
            let file = std::fs::canonicalize(file).ok()?;
            let root = std::fs::canonicalize(data_root).ok()?;
            file.strip_prefix(root).ok().map(Path::to_path_buf)
        });

    match relative {
        Some(relative) => Category::from_relative_path(&relative),
        None => {
            tracing::warn!(
                "{} is outside the data root {}; treating it as uncategorized",
                file.display(),
                data_root.display()
            );
            Category::Uncategorized
        }
    }
}

/// Directory names never descended into while walking.
pub const IGNORED_DIRS: &[&str] = &["node_modules", "target"];

/// Expand the given paths into the list of data files to check.
///
/// Files are taken as given; directories are walked recursively for
/// `.json` files. Anything under `skip` (the registry directory) is left
/// out, as are hidden directories, [`IGNORED_DIRS`] and symlinked
/// directories found during the walk. The result is sorted and free of
/// duplicates.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn collect_data_files(paths: &[PathBuf], skip: Option<&Path>) -> LoadResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        if path.is_dir() {
            walk_dir(path, skip, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!("Collected {} data files", files.len());
    Ok(files)
}

fn walk_dir(dir: &Path, skip: Option<&Path>, files: &mut Vec<PathBuf>) -> LoadResult<()> {
    if skip.map_or(false, |skip| is_same_path(dir, skip)) {
        tracing::debug!("Skipping registry directory {}", dir.display());
        return Ok(());
    }

    let io_error = |e| LoadError::IoError {
        path: dir.display().to_string(),
        source: e,
    };

    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_error)?;

        if file_type.is_dir() {
            if is_ignored_dir(&path) {
                tracing::debug!("Skipping {}", path.display());
            } else {
                walk_dir(&path, skip, files)?;
            }
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!("Not following directory symlink {}", path.display());
        } else if is_json(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_ignored_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.') || IGNORED_DIRS.contains(&name))
}

fn is_same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
