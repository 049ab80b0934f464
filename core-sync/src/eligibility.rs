//! Eligibility filter: decides whether an observed file is a new sync candidate.

use crate::processed::ProcessedSet;
use bridge_traits::storage::SourceFile;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    AlreadyProcessed,
    /// Modified before `now - window`. Never retried; a missed schedule
    /// leaves such files unsynced.
    OutsideWindow,
}

/// Classify `file` against the processed set and the trailing window.
///
/// The window is inclusive at its lower edge. Timestamps later than `now`
/// (clock skew on the source side) count as inside the window.
pub fn check(
    file: &SourceFile,
    processed: &ProcessedSet,
    now: DateTime<Utc>,
    window: Duration,
) -> Eligibility {
    if processed.contains(&file.id) {
        Eligibility::AlreadyProcessed
    } else if file.modified_at < now - window {
        Eligibility::OutsideWindow
    } else {
        Eligibility::Eligible
    }
}

pub fn is_eligible(
    file: &SourceFile,
    processed: &ProcessedSet,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    check(file, processed, now, window) == Eligibility::Eligible
}
