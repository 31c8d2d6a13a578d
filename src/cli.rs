//! Command-line interface module for foldersort.
//!
//! This module is the thin front end around [`Organizer`]:
//! - Argument parsing
//! - Resolving the target directory and the enabled categories
//! - Installing the Ctrl+C handler
//! - Rendering progress and the final summary

use crate::config::AppConfig;
use crate::file_category::{EnabledCategories, RuleSet};
use crate::organizer::{Organizer, ProgressSink};
use crate::output::{OutputFormatter, ProgressBarSink};
use crate::run_log::RunLog;
use crate::summary::RunSummary;
use clap::Parser;
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

/// Sort the files of a folder into category subfolders by extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "foldersort", version, about)]
pub struct Cli {
    /// User whose Downloads folder should be organized
    pub user: Option<String>,

    /// Directory to organize (overrides USER and the config file)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Comma-separated categories to enable (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run log file (default: file_log.txt)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Runs one organization pass as described by the parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use foldersort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["foldersort", "--dir", "/tmp/inbox", "-c", "Documents,Images"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let classifier = config
        .build_classifier()
        .map_err(|e| format!("Error in configuration: {}", e))?;

    let directory = resolve_directory(cli, &config)
        .ok_or_else(|| "Could not determine a directory to organize".to_string())?;
    let enabled = resolve_enabled(cli, &config, classifier.rules())?;
    let log_file = cli.log_file.clone().unwrap_or_else(|| config.log_file());

    let organizer = Organizer::new(classifier, RunLog::new(&log_file));
    install_interrupt_handler(&organizer);

    if !cli.json {
        OutputFormatter::info(&format!(
            "Organizing {} (press Ctrl+C to stop)",
            directory.display()
        ));
    }

    let mut sink = ProgressBarSink::new(!cli.no_progress);
    let progress: Option<&mut dyn ProgressSink> = if cli.json {
        None
    } else {
        Some(&mut sink as &mut dyn ProgressSink)
    };
    let json = cli.json;
    let mut completion = |summary: &RunSummary| print_summary(summary, json);

    let result = organizer.run(&directory, &enabled, progress, &mut completion);
    sink.finish();

    match result {
        Ok(_) => {
            if !json {
                OutputFormatter::success(&format!("Done. Log written to {}", log_file.display()));
            }
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Picks the directory: `--dir`, then USER's Downloads, then the config
/// file, then the current user's Downloads.
pub fn resolve_directory(cli: &Cli, config: &AppConfig) -> Option<PathBuf> {
    if let Some(dir) = &cli.dir {
        return Some(dir.clone());
    }
    if let Some(user) = &cli.user {
        return default_directory(Some(user.as_str()));
    }
    if let Some(dir) = &config.directory {
        return Some(dir.clone());
    }
    default_directory(None)
}

/// The Downloads folder of `user`, or of the current user when `None`.
///
/// Other users' homes are looked up next to the current user's home.
pub fn default_directory(user: Option<&str>) -> Option<PathBuf> {
    match user {
        Some(user) => dirs::home_dir()
            .and_then(|home| home.parent().map(Path::to_path_buf))
            .map(|root| root.join(user).join("Downloads")),
        None => dirs::download_dir().or_else(|| dirs::home_dir().map(|h| h.join("Downloads"))),
    }
}

fn resolve_enabled(
    cli: &Cli,
    config: &AppConfig,
    rules: &RuleSet,
) -> Result<EnabledCategories, String> {
    let names: Option<&[String]> = if !cli.categories.is_empty() {
        Some(cli.categories.as_slice())
    } else {
        config.enabled.as_deref()
    };

    match names {
        Some(names) => EnabledCategories::resolve(rules, names).map_err(|name| {
            format!(
                "Unknown category '{}'. Available: {}",
                name,
                rules.names().collect::<Vec<_>>().join(", ")
            )
        }),
        None => Ok(EnabledCategories::all(rules)),
    }
}

fn install_interrupt_handler(organizer: &Organizer) {
    let cancel = organizer.cancel_flag();
    if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
        warn!("could not install Ctrl+C handler: {}", e);
    }
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{}", text),
            Err(e) => OutputFormatter::error(&format!("Could not serialize summary: {}", e)),
        }
    } else {
        OutputFormatter::summary_table(summary);
    }
}
