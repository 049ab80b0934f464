//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v3 responses.

use serde::Deserialize;

/// Google Drive API file resource
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID
    pub id: String,

    /// File name
    pub name: String,

    /// MIME type
    #[serde(default)]
    pub mime_type: String,

    /// Creation time (RFC 3339), only present when requested in `fields`
    #[serde(default)]
    pub created_time: Option<String>,

    /// Modification time (RFC 3339), only present when requested in `fields`
    #[serde(default)]
    pub modified_time: Option<String>,
}

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    /// List of files
    #[serde(default)]
    pub files: Vec<DriveFile>,

    /// Token for next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}
