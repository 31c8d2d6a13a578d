//! Output formatting and styling module.
//!
//! Console rendering for the command-line front end: colored messages, the
//! progress bar that acts as the batch's progress sink, and the summary table
//! shown when a run completes.

use crate::classifier::Decision;
use crate::organizer::{ProcessedEntry, ProgressSink};
use crate::summary::{MoveOutcome, RunSummary};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for file operations.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {percent}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// One console line describing what happened to a file.
    pub fn entry_line(entry: &ProcessedEntry) -> Option<String> {
        match (&entry.decision, &entry.record) {
            (Decision::Ignore, _) => Some(format!(
                "{} {}",
                "Not moved (temporary file):".bright_yellow(),
                entry.filename
            )),
            (Decision::MoveTo(category), Some(record)) => Some(match &record.outcome {
                MoveOutcome::Moved => {
                    format!("{} {} → {}", "✓".green(), entry.filename, category)
                }
                MoveOutcome::Skipped(reason) => {
                    format!("{} {}: {}", "⚠".yellow(), entry.filename, reason)
                }
                MoveOutcome::Failed(reason) => {
                    format!("{} {}: {}", "✗".red(), entry.filename, reason.red())
                }
            }),
            _ => None,
        }
    }

    /// Prints the per-category table, totals and duration for a run.
    pub fn summary_table(summary: &RunSummary) {
        Self::header("SUMMARY");

        let max_category_len = summary
            .counts_by_category
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in &summary.counts_by_category {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            summary.total_moved.to_string().green().bold(),
            plural(summary.total_moved),
            width = max_category_len
        );

        if summary.skipped > 0 {
            Self::warning(&format!("{} left in place (name taken)", summary.skipped));
        }
        if summary.failed > 0 {
            Self::error(&format!("{} could not be moved", summary.failed));
        }
        for warning in &summary.log_warnings {
            Self::warning(warning);
        }
        if summary.interrupted {
            Self::warning("Run was interrupted before all files were processed.");
        }
        println!("Duration: {}", summary.duration_display());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Progress sink that drives an `indicatif` bar and prints a line per file.
pub struct ProgressBarSink {
    bar: Option<ProgressBar>,
    show_bar: bool,
}

impl ProgressBarSink {
    pub fn new(show_bar: bool) -> Self {
        Self {
            bar: None,
            show_bar,
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    fn print(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }
}

impl ProgressSink for ProgressBarSink {
    fn on_progress(&mut self, processed: usize, total: usize) {
        if !self.show_bar {
            return;
        }
        let bar = self
            .bar
            .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
        bar.set_length(total.max(processed) as u64);
        bar.set_position(processed as u64);
    }

    fn on_entry(&mut self, entry: &ProcessedEntry) {
        if entry.created_dir
            && let Decision::MoveTo(category) = &entry.decision
        {
            self.print(&format!("New folder created: {}", category));
        }
        if let Some(line) = OutputFormatter::entry_line(entry) {
            self.print(&line);
        }
    }
}
