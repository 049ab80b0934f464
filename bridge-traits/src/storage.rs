//! Storage Abstractions
//!
//! Key-value settings persistence and the source-folder collaborator that
//! meeting files are read from.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Key-value settings storage trait
///
/// Holds small opaque properties that must survive between invocations. The
/// sync engine keeps its processed set under a single key.
///
/// Writes must be durable when the returned future completes: a second,
/// overlapping process reading the same key afterwards has to observe the
/// new value.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn remember(store: &dyn SettingsStore) -> Result<()> {
///     store.set_string("processed_files", "{}").await
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value, replacing any previous value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }
}

/// Category of a source file, resolved once when the file is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Native document that must be exported to text
    Document,
    /// Raw text file read as bytes
    PlainText,
    /// Video/audio recording; its media is never read during sync
    Recording,
}

impl SourceKind {
    /// All kinds, in the order a folder is scanned.
    ///
    /// Documents come first so that recordings in the same run can already
    /// reference transcripts written moments earlier.
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Document,
        SourceKind::PlainText,
        SourceKind::Recording,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Document => "document",
            SourceKind::PlainText => "plain_text",
            SourceKind::Recording => "recording",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder found by display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFolder {
    pub id: String,
    pub name: String,
}

/// A file observed in a source folder.
///
/// Owned by the upstream storage system; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Stable identifier, unique per source system
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: SourceKind,
    /// Raw MIME type as reported by the source
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Source folder collaborator
///
/// Abstracts the cloud storage folder API. Listing is scoped to one folder and
/// one [`SourceKind`] at a time.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Find folders whose display name equals `name`. Zero matches is not an error.
    async fn find_folders(&self, name: &str) -> Result<Vec<SourceFolder>>;

    /// List non-trashed files of `kind` directly inside `folder_id`
    async fn list_files(&self, folder_id: &str, kind: SourceKind) -> Result<Vec<SourceFile>>;

    /// Export a native document as plain text.
    ///
    /// Returns `Ok(None)` when the source answers with a non-success status;
    /// the caller treats that as "no content yet" rather than a failure.
    async fn export_text(&self, file_id: &str) -> Result<Option<String>>;

    /// Read the raw bytes of a stored file
    async fn download(&self, file_id: &str) -> Result<Bytes>;

    /// Stream the raw bytes of a stored file without buffering it
    async fn open_stream(
        &self,
        file_id: &str,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
}
