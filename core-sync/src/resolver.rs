//! # Content Resolver
//!
//! Turns an eligible source file into the bytes that get written remotely:
//!
//! - **Document**: exported to plain text. A non-success export answer means
//!   "no content yet" and the file is retried on a later run.
//! - **PlainText**: raw bytes decoded as UTF-8 (invalid sequences replaced).
//! - **Recording**: the media is never read. An [`AudioTrigger`] record points
//!   the downstream pipeline at the recording and at the transcript the
//!   [matcher](crate::matcher) paired it with, if any.
//!
//! Transport failures are returned as errors; the coordinator turns them into
//! a failed outcome for that one file.

use crate::matcher::{base_name, find_match};
use crate::{Result, SyncError};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::storage::{SourceFile, SourceKind, SourceProvider};
use bridge_traits::time::Clock;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Record written for each eligible recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrigger {
    pub recording_id: String,
    pub recording_name: String,
    /// Best-effort pairing; `None` is a valid outcome
    pub matched_transcript_id: Option<String>,
    /// When this trigger record was built
    pub created_at: DateTime<Utc>,
}

/// Sync-ready content of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedContent {
    Text(String),
    Trigger(AudioTrigger),
}

impl ResolvedContent {
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            ResolvedContent::Text(text) => Ok(Bytes::from(text)),
            ResolvedContent::Trigger(trigger) => serde_json::to_vec_pretty(&trigger)
                .map(Bytes::from)
                .map_err(|e| SyncError::Encoding(e.to_string())),
        }
    }
}

pub struct ContentResolver {
    source: Arc<dyn SourceProvider>,
    clock: Arc<dyn Clock>,
}

impl ContentResolver {
    pub fn new(source: Arc<dyn SourceProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// Resolve `file` into content, or `Ok(None)` when there is nothing to sync yet.
    ///
    /// `siblings` are the documents listed from the same folder; only
    /// recordings look at them. Blank text counts as no content.
    pub async fn resolve(
        &self,
        file: &SourceFile,
        siblings: &[SourceFile],
    ) -> BridgeResult<Option<ResolvedContent>> {
        let content = match file.kind {
            SourceKind::Document => self
                .source
                .export_text(&file.id)
                .await?
                .map(ResolvedContent::Text),
            SourceKind::PlainText => {
                let bytes = self.source.download(&file.id).await?;
                Some(ResolvedContent::Text(
                    String::from_utf8_lossy(&bytes).into_owned(),
                ))
            }
            SourceKind::Recording => Some(ResolvedContent::Trigger(
                self.build_trigger(file, siblings),
            )),
        };

        Ok(content.filter(|c| match c {
            ResolvedContent::Text(text) => !text.trim().is_empty(),
            ResolvedContent::Trigger(_) => true,
        }))
    }

    fn build_trigger(&self, recording: &SourceFile, siblings: &[SourceFile]) -> AudioTrigger {
        let base = base_name(&recording.name);
        let matched = find_match(siblings, base).map(str::to_string);

        debug!(
            recording_id = %recording.id,
            base_name = %base,
            matched = ?matched,
            "Matched recording against transcripts"
        );

        AudioTrigger {
            recording_id: recording.id.clone(),
            recording_name: recording.name.clone(),
            matched_transcript_id: matched,
            created_at: self.clock.now(),
        }
    }
}
