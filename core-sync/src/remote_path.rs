//! Canonical remote paths and commit messages.
//!
//! A path depends only on the file's kind, UTC creation date, name and id, so
//! re-running a sync for the same file always targets the same object.
//!
//! ```text
//! transcripts/2026-02-23_2026-02-23-15-30-weekly-sync_1AbCdEfG.txt
//! audio_triggers/2026-02-23_standup_9ZyXwVuT.json
//! ```

use crate::matcher::base_name;
use bridge_traits::storage::{SourceFile, SourceKind};

const MAX_SLUG_CHARS: usize = 60;
const ID_FRAGMENT_CHARS: usize = 8;

/// Directory prefixes for each payload family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    pub transcript_dir: String,
    pub audio_trigger_dir: String,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            transcript_dir: "transcripts".to_string(),
            audio_trigger_dir: "audio_triggers".to_string(),
        }
    }
}

impl PathLayout {
    pub fn new(transcript_dir: impl Into<String>, audio_trigger_dir: impl Into<String>) -> Self {
        Self {
            transcript_dir: trim_slashes(transcript_dir.into()),
            audio_trigger_dir: trim_slashes(audio_trigger_dir.into()),
        }
    }

    pub fn path_for(&self, file: &SourceFile) -> String {
        let (dir, extension) = match file.kind {
            SourceKind::Document | SourceKind::PlainText => (&self.transcript_dir, "txt"),
            SourceKind::Recording => (&self.audio_trigger_dir, "json"),
        };

        format!(
            "{}/{}_{}_{}.{}",
            dir,
            file.created_at.format("%Y-%m-%d"),
            slugify(display_stem(file)),
            id_fragment(&file.id),
            extension
        )
    }
}

/// Human-readable change description for the remote write
pub fn commit_message(file: &SourceFile) -> String {
    match file.kind {
        SourceKind::Document | SourceKind::PlainText => format!("Add transcript: {}", file.name),
        SourceKind::Recording => format!("Add audio trigger: {}", file.name),
    }
}

/// Name without extension; native documents have none to strip
fn display_stem(file: &SourceFile) -> &str {
    match file.kind {
        SourceKind::Document => file.name.trim(),
        SourceKind::PlainText | SourceKind::Recording => base_name(&file.name),
    }
}

/// Lowercase, keep alphanumerics (any script), collapse everything else to `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_SLUG_CHARS).collect();
    let truncated = truncated.trim_end_matches('-');

    if truncated.is_empty() {
        "untitled".to_string()
    } else {
        truncated.to_string()
    }
}

fn id_fragment(id: &str) -> String {
    let fragment: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(ID_FRAGMENT_CHARS)
        .collect();

    if fragment.is_empty() {
        "noid".to_string()
    } else {
        fragment
    }
}

fn trim_slashes(dir: String) -> String {
    dir.trim_matches('/').to_string()
}
