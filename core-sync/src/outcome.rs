//! # Per-file Outcomes and Run Summary
//!
//! Every file a run looks at ends in exactly one [`FileOutcome`]. Outcomes are
//! collected into a [`RunSummary`], which is what the run returns and logs.

use bridge_traits::storage::{SourceFile, SourceKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why an observed file was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Id already present in the processed set
    AlreadyProcessed,
    /// Last modified before the eligibility window
    OutsideWindow,
    /// Source had nothing to export yet; retried on a later run
    NoContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::AlreadyProcessed => "already processed",
            SkipReason::OutsideWindow => "outside eligibility window",
            SkipReason::NoContent => "no content",
        };
        f.write_str(text)
    }
}

/// Result of handling one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Written remotely and recorded as processed
    Synced { path: String, created: bool },
    Skipped { reason: SkipReason },
    /// Fetch, resolve or write failed; the file stays unprocessed
    Failed { reason: String },
}

impl FileOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        FileOutcome::Skipped { reason }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        FileOutcome::Failed {
            reason: reason.into(),
        }
    }
}

/// Outcome tagged with the file it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file_id: String,
    pub name: String,
    pub kind: SourceKind,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn new(file: &SourceFile, outcome: FileOutcome) -> Self {
        Self {
            file_id: file.id.clone(),
            name: file.name.clone(),
            kind: file.kind,
            outcome,
        }
    }
}

/// Aggregate of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub synced: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Processed-set entries removed by retention pruning
    pub pruned: usize,
    pub outcomes: Vec<FileReport>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: RunId::new(),
            started_at,
            finished_at: None,
            synced: 0,
            skipped: 0,
            errored: 0,
            pruned: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, report: FileReport) {
        match report.outcome {
            FileOutcome::Synced { .. } => self.synced += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.errored += 1,
        }
        self.outcomes.push(report);
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = Some(finished_at);
    }

    /// Files that were written during this run
    pub fn synced_paths(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Synced { path, .. } => Some(path.as_str()),
            _ => None,
        })
    }
}
