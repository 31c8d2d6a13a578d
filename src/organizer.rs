//! One-shot batch pass over a directory.
//!
//! [`Organizer::run_batch`] lists the immediate entries of a directory once,
//! classifies every regular file, moves the ones that have a destination and
//! writes each attempt to the [`RunLog`]. Progress is reported inline after
//! every file through a [`ProgressSink`].

use crate::classifier::{Classifier, Decision};
use crate::file_category::EnabledCategories;
use crate::file_organizer::FileOrganizer;
use crate::run_log::{LogResult, RunLog};
use crate::summary::{MoveOutcome, MoveRecord, RunSummary};
use chrono::Local;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What happened to one directory entry.
#[derive(Debug, Clone)]
pub struct ProcessedEntry {
    pub filename: String,
    pub decision: Decision,
    /// Present only when the classifier chose a category.
    pub record: Option<MoveRecord>,
    /// True if moving this file created its category folder.
    pub created_dir: bool,
}

/// Receives progress while a batch runs.
///
/// Any `FnMut(usize, usize)` closure is a sink.
pub trait ProgressSink {
    /// Called after every processed file with the running count and the
    /// number of files found before the scan began.
    fn on_progress(&mut self, processed: usize, total: usize);

    /// Called just before `on_progress` with the details of the file.
    fn on_entry(&mut self, _entry: &ProcessedEntry) {}
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn on_progress(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Receives the final summary of a run.
pub trait CompletionSink {
    fn on_complete(&mut self, summary: &RunSummary);
}

impl<F: FnMut(&RunSummary)> CompletionSink for F {
    fn on_complete(&mut self, summary: &RunSummary) {
        self(summary)
    }
}

/// Errors that stop a run.
#[derive(Debug)]
pub enum OrganizeError {
    /// The input directory is missing or not a directory.
    InvalidDirectory { path: PathBuf, reason: String },
    /// The enabled-category set is empty.
    NoCategoriesSelected,
    /// An enabled category is not declared by the rule set.
    UnknownCategory(String),
    /// The scan broke off after the run had started. The summary is
    /// finalized and the log footer has been written.
    Unexpected {
        summary: Box<RunSummary>,
        source: io::Error,
    },
}

impl OrganizeError {
    /// True for errors raised before any file was touched.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Self::Unexpected { .. })
    }
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path, reason } => {
                write!(f, "Invalid directory {}: {}", path.display(), reason)
            }
            Self::NoCategoriesSelected => write!(f, "Select at least one category"),
            Self::UnknownCategory(name) => write!(f, "Unknown category '{}'", name),
            Self::Unexpected { source, .. } => write!(f, "Unexpected error: {}", source),
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unexpected { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Drives classifier, mover and run log over one directory.
pub struct Organizer {
    classifier: Classifier,
    run_log: RunLog,
    cancel: Arc<AtomicBool>,
}

impl Organizer {
    pub fn new(classifier: Classifier, run_log: RunLog) -> Self {
        Self {
            classifier,
            run_log,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    /// Flag checked before each file. Once set, the current run stops after
    /// the file in hand and still writes its footer; later runs stop
    /// immediately.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs the batch and hands the summary to `completion`.
    ///
    /// `completion` is called for every run that started, including one that
    /// ended in [`OrganizeError::Unexpected`].
    pub fn run(
        &self,
        directory: &Path,
        enabled: &EnabledCategories,
        progress: Option<&mut dyn ProgressSink>,
        completion: &mut dyn CompletionSink,
    ) -> OrganizeResult<RunSummary> {
        deliver(self.run_batch(directory, enabled, progress), completion)
    }

    /// Organizes the regular files directly inside `directory`.
    ///
    /// Listing order is whatever the filesystem returns. Per-file failures
    /// are logged and counted; they never stop the batch. Category names in
    /// `enabled` match declared rules regardless of case.
    pub fn run_batch(
        &self,
        directory: &Path,
        enabled: &EnabledCategories,
        mut progress: Option<&mut dyn ProgressSink>,
    ) -> OrganizeResult<RunSummary> {
        let enabled = &self.check_preconditions(directory, enabled)?;

        let mut summary = RunSummary::start();
        info!("organizing {}", directory.display());
        let opened = self.run_log.open_run(&summary.start_time);
        note_log_failure(&mut summary, opened);

        let total = match count_files(directory) {
            Ok(total) => total,
            Err(e) => return Err(self.abort(summary, e)),
        };
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => return Err(self.abort(summary, e)),
        };

        let own_log = fs::canonicalize(self.run_log.path()).ok();
        let mut processed = 0;

        for entry in entries {
            if self.cancel.load(Ordering::SeqCst) {
                info!("interrupted after {} of {} files", processed, total);
                summary.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry in {}: {}", directory.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            let decision = if is_same_file(&path, own_log.as_deref()) {
                Decision::Ignore
            } else {
                self.classifier.classify(&filename, enabled)
            };

            let mut processed_entry = ProcessedEntry {
                filename,
                decision,
                record: None,
                created_dir: false,
            };

            match &processed_entry.decision {
                Decision::MoveTo(category) => {
                    let (record, created_dir) =
                        move_one(&path, directory, category, &processed_entry.filename);
                    let logged = self.run_log.record(&record);
                    note_log_failure(&mut summary, logged);
                    summary.record(&record);
                    processed_entry.record = Some(record);
                    processed_entry.created_dir = created_dir;
                }
                Decision::Ignore => debug!("ignored {}", processed_entry.filename),
                Decision::NoMatch => debug!("left {} in place", processed_entry.filename),
            }

            processed += 1;
            if let Some(sink) = progress.as_deref_mut() {
                sink.on_entry(&processed_entry);
                sink.on_progress(processed, total);
            }
        }

        self.finish(&mut summary);
        info!(
            "moved {} files in {}",
            summary.total_moved,
            summary.duration_display()
        );
        Ok(summary)
    }

    /// Validates the request and returns `enabled` in canonical spelling.
    fn check_preconditions(
        &self,
        directory: &Path,
        enabled: &EnabledCategories,
    ) -> OrganizeResult<EnabledCategories> {
        if !directory.is_dir() {
            let reason = if directory.exists() {
                "not a directory"
            } else {
                "does not exist"
            };
            return Err(OrganizeError::InvalidDirectory {
                path: directory.to_path_buf(),
                reason: reason.to_string(),
            });
        }

        if enabled.is_empty() {
            return Err(OrganizeError::NoCategoriesSelected);
        }

        EnabledCategories::resolve(self.classifier.rules(), enabled.iter())
            .map_err(OrganizeError::UnknownCategory)
    }

    fn finish(&self, summary: &mut RunSummary) {
        summary.finalize();
        let closed = self.run_log.close_run(summary);
        note_log_failure(summary, closed);
    }

    fn abort(&self, mut summary: RunSummary, source: io::Error) -> OrganizeError {
        warn!("run aborted: {}", source);
        let logged = self.run_log.record_unexpected(&source.to_string());
        note_log_failure(&mut summary, logged);
        self.finish(&mut summary);
        OrganizeError::Unexpected {
            summary: Box::new(summary),
            source,
        }
    }
}

/// Hands the summary of any run that started to `completion`.
fn deliver(
    result: OrganizeResult<RunSummary>,
    completion: &mut dyn CompletionSink,
) -> OrganizeResult<RunSummary> {
    match &result {
        Ok(summary) => completion.on_complete(summary),
        Err(OrganizeError::Unexpected { summary, .. }) => completion.on_complete(summary),
        Err(_) => {}
    }
    result
}

/// Counts regular files (not directories) directly inside `directory`.
pub fn count_files(directory: &Path) -> io::Result<usize> {
    Ok(fs::read_dir(directory)?
        .flatten()
        .filter(|entry| entry.path().is_file())
        .count())
}

fn move_one(
    path: &Path,
    directory: &Path,
    category: &str,
    filename: &str,
) -> (MoveRecord, bool) {
    let planned = directory.join(category).join(filename);
    let (dest_path, outcome, created_dir) =
        match FileOrganizer::move_to_category(path, directory, category) {
            Ok(moved) => {
                if moved.created_dir {
                    info!("created folder {}", directory.join(category).display());
                }
                info!("moved {} to {}/", filename, category);
                (moved.destination, MoveOutcome::Moved, moved.created_dir)
            }
            Err(e) if e.is_collision() => {
                warn!("left {} in place: {}", filename, e);
                (planned, MoveOutcome::Skipped(e.to_string()), false)
            }
            Err(e) => {
                warn!("could not move {}: {}", filename, e);
                (planned, MoveOutcome::Failed(e.to_string()), false)
            }
        };

    let record = MoveRecord {
        timestamp: Local::now(),
        filename: filename.to_string(),
        category: category.to_string(),
        source_path: path.to_path_buf(),
        dest_path,
        outcome,
    };
    (record, created_dir)
}

fn note_log_failure(summary: &mut RunSummary, result: LogResult<()>) {
    if let Err(e) = result {
        warn!("{}", e);
        summary.log_warnings.push(e.to_string());
    }
}

fn is_same_file(path: &Path, other: Option<&Path>) -> bool {
    let Some(other) = other else {
        return false;
    };
    if path.file_name() != other.file_name() {
        return false;
    }
    fs::canonicalize(path).is_ok_and(|p| p == other)
}
