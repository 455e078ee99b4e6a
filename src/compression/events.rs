//! Batch run state, progress events, and the final report
//!
//! `RunState` is owned by the batch thread; everything the rest of the
//! app sees is a snapshot carried by a `BatchEvent` or the final
//! `BatchReport`.

use chrono::{DateTime, Local};
use uuid::Uuid;

/// A per-file failure recorded during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub message: String,
}

/// Mutable state of a batch run
#[derive(Debug)]
pub struct RunState {
    total_jobs: usize,
    succeeded: usize,
    failed: usize,
    cancelled: bool,
    errors: Vec<FileFailure>,
}

impl RunState {
    pub fn new(total_jobs: usize) -> Self {
        Self {
            total_jobs,
            succeeded: 0,
            failed: 0,
            cancelled: false,
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, filename: String, message: String) {
        self.failed += 1;
        self.errors.push(FileFailure { filename, message });
    }

    /// Once set, the flag stays set for the rest of the run
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Files processed so far, success and failure alike
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn total_jobs(&self) -> usize {
        self.total_jobs
    }

    #[allow(dead_code)]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Freeze this state into the final report
    pub fn into_report(self, run_id: Uuid, started_at: DateTime<Local>) -> BatchReport {
        BatchReport {
            run_id,
            total_jobs: self.total_jobs,
            succeeded: self.succeeded,
            failed: self.failed,
            cancelled: self.cancelled,
            errors: self.errors,
            started_at,
            finished_at: Local::now(),
        }
    }
}

/// Events sent from the batch thread to whoever is watching the run
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// The run started with `total` candidates queued
    Started { total: usize },
    /// A file is about to be handed to the transcoder
    FileStarted { index: usize, filename: String },
    /// A file failed; the run continues with the next one
    FileFailed { filename: String, message: String },
    /// A file finished processing (success or failure)
    Progress { completed: usize, total: usize },
    /// Terminal event, sent exactly once per run
    Finished(BatchReport),
}

/// Final summary of a batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub total_jobs: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub errors: Vec<FileFailure>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// One-line human summary for the status line and the log
    pub fn summary(&self) -> String {
        if self.cancelled {
            format!(
                "Cancelled after {} of {} file(s): {} compressed, {} failed",
                self.completed(),
                self.total_jobs,
                self.succeeded,
                self.failed
            )
        } else {
            format!(
                "Processed {} file(s): {} compressed, {} failed",
                self.completed(),
                self.succeeded,
                self.failed
            )
        }
    }
}
