//! Data validation utilities.
//!
//! Runs the browser-presence check over many files in parallel using rayon.
//! Every file gets its own [`Logger`], and results come back in input
//! order so reports never interleave.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use compat_core::browsers::BrowserRegistry;
use compat_core::category::Category;
use compat_core::presence::check_browser_presence;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::loader::{
    category_for, collect_data_files, load_feature_file, load_registry, LoadError,
};
use crate::logger::{Logger, Style};

/// Title of the browser-presence test in reports.
pub const BROWSERS_TEST: &str = "Browsers";

/// Inputs shared by every file in a run.
#[derive(Debug, Clone)]
pub struct LintContext {
    /// Browser registry the data is checked against.
    pub registry: BrowserRegistry,
    /// Root that categories are derived from.
    pub data_root: PathBuf,
}

impl LintContext {
    /// Create a context.
    pub fn new(registry: BrowserRegistry, data_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            data_root: data_root.into(),
        }
    }
}

/// Result of checking one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// File that was checked.
    pub path: PathBuf,
    /// Category derived from the file's location.
    pub category: Category,
    /// Issues found by the browser-presence test.
    pub logger: Logger,
}

impl FileReport {
    /// Whether the file is clean.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.logger.has_errors()
    }
}

/// A file that could not be checked at all.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// File that failed to load.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// Results of checking a set of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    /// Reports for files that loaded, in input order.
    pub reports: Vec<FileReport>,
    /// Files that failed to load, in input order.
    pub failures: Vec<FileFailure>,
    /// Wall-clock duration of the run.
    pub duration_seconds: f64,
}

impl ValidationSummary {
    /// Whether every file loaded and none had issues.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.reports.iter().all(FileReport::passed)
    }

    /// Number of files with at least one issue.
    #[must_use]
    pub fn failing_files(&self) -> usize {
        self.reports.iter().filter(|r| !r.passed()).count()
    }

    /// Total issues across all files.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.reports.iter().map(|r| r.logger.issues().len()).sum()
    }

    /// Write a human-readable report.
    ///
    /// Clean files are not listed; each failing file gets a header line
    /// followed by its issues.
    pub fn write_text<W: Write>(&self, out: &mut W, style: Style) -> io::Result<()> {
        for report in self.reports.iter().filter(|r| !r.passed()) {
            writeln!(out, "{}", style.red(&format!("✖ {}", report.path.display())))?;
            report.logger.emit(out, style)?;
        }

        for failure in &self.failures {
            writeln!(out, "{}", style.red(&format!("✖ {}", failure.path.display())))?;
            writeln!(out, "    {}", failure.message)?;
        }

        let checked = self.reports.len() + self.failures.len();
        if self.passed() {
            writeln!(
                out,
                "{}",
                style.green(&format!("✔ {checked} files checked, no problems found"))
            )?;
        } else {
            writeln!(
                out,
                "{}",
                style.red(&format!(
                    "{} problems in {} of {checked} files, {} files failed to load",
                    self.issue_count(),
                    self.failing_files(),
                    self.failures.len()
                ))
            )?;
        }
        Ok(())
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self).map_err(io::Error::from)?;
        writeln!(out)
    }
}

/// Check one file for browser-presence issues.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn validate_file(path: &Path, ctx: &LintContext) -> Result<FileReport, LoadError> {
    let tree = load_feature_file(path)?;
    let category = category_for(path, &ctx.data_root);

    let mut logger = Logger::new(BROWSERS_TEST);
    check_browser_presence(&tree, &category, &ctx.registry, &mut logger);

    debug!(
        "{} ({}): {} issues",
        path.display(),
        category,
        logger.issues().len()
    );

    Ok(FileReport {
        path: path.to_path_buf(),
        category,
        logger,
    })
}

/// Check many files in parallel.
///
/// `jobs` limits the worker count; 0 uses rayon's default.
pub fn validate_files(files: &[PathBuf], ctx: &LintContext, jobs: usize) -> ValidationSummary {
    let start = Instant::now();

    let run = || -> Vec<Result<FileReport, FileFailure>> {
        files
            .par_iter()
            .map(|path| {
                validate_file(path, ctx).map_err(|e| {
                    warn!("Skipping {}: {}", path.display(), e);
                    FileFailure {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                })
            })
            .collect()
    };

    let results = if jobs > 0 {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!("Failed to build a {jobs}-worker pool ({e}); using the global pool");
                run()
            }
        }
    } else {
        run()
    };

    let mut summary = ValidationSummary::default();
    for result in results {
        match result {
            Ok(report) => summary.reports.push(report),
            Err(failure) => summary.failures.push(failure),
        }
    }
    summary.duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Checked {} files in {:.2}s: {} with problems, {} failed to load",
        files.len(),
        summary.duration_seconds,
        summary.failing_files(),
        summary.failures.len()
    );

    summary
}

/// Validate all compat data files under a directory.
///
/// Convenience wrapper that treats `root` as the data root, loads the
/// registry from `registry`, and skips the registry directory while
/// collecting files.
///
/// # Errors
///
/// Returns an error if the registry cannot be loaded or `root` cannot be
/// walked. Problems inside individual files are reported in the summary.
pub fn validate_data_directory(root: &Path, registry: &Path) -> Result<ValidationSummary, LoadError> {
    let ctx = LintContext::new(load_registry(registry)?, root);
    let files = collect_data_files(&[root.to_path_buf()], Some(registry))?;
    Ok(validate_files(&files, &ctx, 0))
}
