//! Append-only audit log shared by every run.
//!
//! Each run adds a header block, one line per attempted move and a footer.
//! Earlier content is never truncated. Every write opens the file in append
//! mode and syncs it before returning, so a crash loses at most the line
//! being written.
//!
//! ```text
//!
//! ====== Run started ======
//! Date: 2026-10-18
//! Time: 14:03:11
//! =========================
//! [2026-10-18 14:03:11] report.pdf | /home/me/Downloads/report.pdf -> /home/me/Downloads/Documents/report.pdf
//! [ERROR] setup.exe: Failed to create directory /home/me/Downloads/Programs: File exists (os error 17)
//! Total files moved: 1
//! Duration: 0 min. 0 sec.
//! ------------------------------------------------------
//! ```
//!
//! Two processes appending to the same log at once may interleave lines;
//! no file locking is attempted.

use crate::summary::{MoveOutcome, MoveRecord, RunSummary};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "file_log.txt";

const HEADER_TITLE: &str = "====== Run started ======";
const HEADER_RULE: &str = "=========================";
const FOOTER_RULE: &str = "------------------------------------------------------";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A write to the audit log failed.
#[derive(Debug)]
pub struct LogWriteError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl std::fmt::Display for LogWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not write to log file {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for LogWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

pub type LogResult<T> = Result<T, LogWriteError>;

/// Handle to the cumulative log file.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header block that marks the start of a run.
    pub fn open_run(&self, start: &DateTime<Local>) -> LogResult<()> {
        self.append(&format!(
            "\n{}\nDate: {}\nTime: {}\n{}\n",
            HEADER_TITLE,
            start.format("%Y-%m-%d"),
            start.format("%H:%M:%S"),
            HEADER_RULE
        ))
    }

    /// Appends one move record.
    pub fn record(&self, record: &MoveRecord) -> LogResult<()> {
        self.append(&format!("{}\n", format_record(record)))
    }

    /// Appends a line for an error that ended the scan early.
    pub fn record_unexpected(&self, reason: &str) -> LogResult<()> {
        self.append(&format!("[UNEXPECTED ERROR] {}\n", reason))
    }

    /// Writes the footer with the move total and elapsed time.
    pub fn close_run(&self, summary: &RunSummary) -> LogResult<()> {
        let mut footer = String::new();
        if summary.interrupted {
            footer.push_str("Run interrupted\n");
        }
        footer.push_str(&format!(
            "Total files moved: {}\nDuration: {}\n{}\n",
            summary.total_moved,
            summary.duration_display(),
            FOOTER_RULE
        ));
        self.append(&footer)
    }

    fn append(&self, text: &str) -> LogResult<()> {
        let write = || -> io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            file.write_all(text.as_bytes())?;
            file.flush()?;
            file.sync_data()
        };
        write().map_err(|source| LogWriteError {
            path: self.path.clone(),
            source,
        })
    }
}

/// Formats a record as a single log line.
pub fn format_record(record: &MoveRecord) -> String {
    match &record.outcome {
        MoveOutcome::Moved => format!(
            "[{}] {} | {} -> {}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.filename,
            record.source_path.display(),
            record.dest_path.display()
        ),
        MoveOutcome::Skipped(reason) => format!("[SKIPPED] {}: {}", record.filename, reason),
        MoveOutcome::Failed(reason) => format!("[ERROR] {}: {}", record.filename, reason),
    }
}
