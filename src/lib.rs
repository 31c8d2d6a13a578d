//! foldersort - sort the files of a folder into category subfolders
//!
//! This library classifies files by extension, moves them into per-category
//! subfolders of the directory they live in, and keeps an append-only log of
//! every move. [`Organizer`] runs one batch pass; the CLI in [`cli`] is one
//! front end for it.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod organizer;
pub mod output;
pub mod run_log;
pub mod summary;

pub use classifier::{Classifier, Decision};
pub use config::{AppConfig, ConfigError};
pub use file_category::{CategoryRule, EnabledCategories, RuleSet, UNKNOWN_CATEGORY};
pub use file_organizer::{FileOrganizer, MoveError, MovedFile};
pub use organizer::{
    CompletionSink, OrganizeError, Organizer, ProcessedEntry, ProgressSink,
};
pub use run_log::{LogWriteError, RunLog};
pub use summary::{MoveOutcome, MoveRecord, RunSummary};

pub use cli::{Cli, run_cli};
