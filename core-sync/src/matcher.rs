//! # Recording ↔ Transcript Matcher
//!
//! Recordings and transcripts of the same meeting are named by the same
//! upstream system from the meeting title, but either side may carry extra
//! prefixes or suffixes. A recording matches a document when either trimmed
//! name contains the other.
//!
//! There is no scoring: the first sibling that passes wins, so two meetings
//! on the same day with overlapping titles can be paired wrongly.

use bridge_traits::storage::SourceFile;

/// Strip a trailing file extension and surrounding whitespace.
///
/// An extension is a final `.` followed by one or more ASCII alphanumerics;
/// anything else after the last dot is kept as part of the name.
pub fn base_name(name: &str) -> &str {
    let trimmed = name.trim();

    let stem = match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            stem
        }
        _ => trimmed,
    };

    stem.trim()
}

/// Id of the first sibling whose name contains `recording_base` or is
/// contained in it. Blank names on either side never match.
pub fn find_match<'a>(siblings: &'a [SourceFile], recording_base: &str) -> Option<&'a str> {
    let base = recording_base.trim();
    if base.is_empty() {
        return None;
    }

    siblings
        .iter()
        .find(|doc| {
            let name = doc.name.trim();
            !name.is_empty() && (name.contains(base) || base.contains(name))
        })
        .map(|doc| doc.id.as_str())
}
