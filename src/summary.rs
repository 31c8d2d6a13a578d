//! Per-file move records and the per-run summary.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Result of attempting to relocate one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum MoveOutcome {
    Moved,
    /// Left in place on purpose, e.g. a file with that name is already there.
    Skipped(String),
    Failed(String),
}

/// Audit entry for one file the classifier sent to a category.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRecord {
    pub timestamp: DateTime<Local>,
    pub filename: String,
    pub category: String,
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub outcome: MoveOutcome,
}

/// Counters and timing for a single run.
///
/// Created when the run starts and finalized once the scan is over.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    pub duration: Duration,
    pub counts_by_category: BTreeMap<String, usize>,
    pub total_moved: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Set when the run stopped early on an interrupt.
    pub interrupted: bool,
    /// Run Log writes that failed; the run carried on without them.
    pub log_warnings: Vec<String>,
    #[serde(skip)]
    started: Instant,
}

impl RunSummary {
    pub fn start() -> Self {
        Self {
            start_time: Local::now(),
            end_time: None,
            duration: Duration::ZERO,
            counts_by_category: BTreeMap::new(),
            total_moved: 0,
            skipped: 0,
            failed: 0,
            interrupted: false,
            log_warnings: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Updates the counters from one record.
    pub fn record(&mut self, record: &MoveRecord) {
        match record.outcome {
            MoveOutcome::Moved => {
                *self
                    .counts_by_category
                    .entry(record.category.clone())
                    .or_insert(0) += 1;
                self.total_moved += 1;
            }
            MoveOutcome::Skipped(_) => self.skipped += 1,
            MoveOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Stamps the end time and elapsed duration. Calling it again is a no-op.
    pub fn finalize(&mut self) {
        if self.end_time.is_none() {
            self.end_time = Some(Local::now());
            self.duration = self.started.elapsed();
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.end_time.is_some()
    }

    /// Elapsed time as `"M min. S sec."`.
    pub fn duration_display(&self) -> String {
        format_duration(self.duration)
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{} min. {} sec.", secs / 60, secs % 60)
}
