//! Compat data linter.
//!
//! # Usage
//!
//! ```bash
//! # Check every data file under the data root
//! compat-lint validate --root data
//!
//! # Check specific files, machine-readable output
//! compat-lint validate data/api/AbortController.json --format json
//!
//! # Show which browsers a category permits and requires
//! compat-lint sets --category webextensions
//! ```
//!
//! Reports go to stdout, logs to stderr. The exit status is 1 when any file
//! has problems or could not be checked.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compat_core::category::{classify, Category};
use compat_tools::{
    collect_data_files, load_registry, validate_files, LintConfig, LintContext, Style,
};

#[derive(Parser)]
#[command(name = "compat-lint")]
#[command(about = "Browser-presence linter for compat data")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// RON config file (default: compat-lint.ron if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Files or directories to check (default: the data root)
        paths: Vec<PathBuf>,

        /// Data root categories are derived from
        #[arg(long)]
        root: Option<PathBuf>,

        /// Browser registry directory or file
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Parallel workers (0 = auto)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print the displayable and required browsers of a category
    Sets {
        /// Category label, e.g. api, css, webextensions
        #[arg(short, long)]
        category: Option<String>,

        /// Data root the registry path is resolved against
        #[arg(long)]
        root: Option<PathBuf>,

        /// Browser registry directory or file
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // RUST_LOG takes precedence over --verbose
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::from_level(log_level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = match LintConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Validate {
            paths,
            root,
            registry,
            format,
            no_color,
            jobs,
        } => {
            apply_overrides(&mut config, root, registry);
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            if no_color {
                config.color = false;
            }
            cmd_validate(&config, paths, format)
        }
        Commands::Sets {
            category,
            root,
            registry,
        } => {
            apply_overrides(&mut config, root, registry);
            cmd_sets(&config, category.as_deref())
        }
    }
}

fn apply_overrides(config: &mut LintConfig, root: Option<PathBuf>, registry: Option<PathBuf>) {
    if let Some(root) = root {
        config.data_root = root;
    }
    if let Some(registry) = registry {
        config.registry = registry;
    }
}

/// Validate data files and print the report
fn cmd_validate(config: &LintConfig, paths: Vec<PathBuf>, format: OutputFormat) -> ExitCode {
    let registry_path = config.registry_path();
    let registry = match load_registry(&registry_path) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Failed to load browser registry: {e}");
            return ExitCode::FAILURE;
        }
    };

    let paths = if paths.is_empty() {
        vec![config.data_root.clone()]
    } else {
        paths
    };
    tracing::info!("Validating data files in: {}", display_paths(&paths));

    let files = match collect_data_files(&paths, Some(&registry_path)) {
        Ok(files) => files,
        Err(e) => {
            tracing::error!("Validation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let ctx = LintContext::new(registry, config.data_root.clone());
    let summary = validate_files(&files, &ctx, config.jobs);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match format {
        OutputFormat::Text => summary.write_text(&mut out, Style::new(config.color)),
        OutputFormat::Json => summary.write_json(&mut out),
    };
    if let Err(e) = written.and_then(|()| out.flush()) {
        tracing::error!("Failed to write report: {e}");
        return ExitCode::FAILURE;
    }

    if summary.passed() {
        tracing::info!("Validation passed");
        ExitCode::SUCCESS
    } else {
        tracing::error!(
            "Validation failed: {} files with problems, {} unreadable",
            summary.failing_files(),
            summary.failures.len()
        );
        ExitCode::FAILURE
    }
}

/// Print the browser sets of a category
fn cmd_sets(config: &LintConfig, label: Option<&str>) -> ExitCode {
    let registry = match load_registry(&config.registry_path()) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Failed to load browser registry: {e}");
            return ExitCode::FAILURE;
        }
    };

    let category = Category::from_label(label);
    let sets = classify(&category, &registry);

    println!("Category: {category}");
    println!("Displayable ({}):", sets.displayable.len());
    for id in &sets.displayable {
        let required = if sets.required.contains(id) {
            " (required)"
        } else {
            ""
        };
        let kind = registry
            .get(id)
            .map_or("?", |browser| browser.browser_type.as_str());
        println!("  {id:<20} {kind}{required}");
    }

    ExitCode::SUCCESS
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
