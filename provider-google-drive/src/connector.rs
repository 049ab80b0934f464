//! Google Drive API connector implementation
//!
//! Implements the `SourceProvider` trait for Google Drive API v3.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::{SourceFile, SourceFolder, SourceKind, SourceProvider};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::GoogleDriveError;
use crate::types::{DriveFile, FilesListResponse};

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Maximum results per page (Google Drive API limit)
const MAX_PAGE_SIZE: u32 = 1000;

/// Fields to request for file resources
const FILE_FIELDS: &str = "nextPageToken,files(id,name,mimeType,createdTime,modifiedTime)";

/// Fields to request for folder lookups
const FOLDER_FIELDS: &str = "nextPageToken,files(id,name)";

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";
const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";

/// Default per-request timeout for metadata calls
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for streamed media; reqwest applies it to the whole body
const MEDIA_TIMEOUT: Duration = Duration::from_secs(600);

/// Google Drive API connector
///
/// Implements `SourceProvider` for Google Drive API v3.
///
/// # Features
///
/// - Folder lookup by exact display name
/// - Paginated listing filtered by MIME category, trashed files excluded
/// - Document export to `text/plain`
/// - Buffered and streaming media reads
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::storage::{SourceKind, SourceProvider};
///
/// let connector = GoogleDriveConnector::new(http_client, access_token);
/// for folder in connector.find_folders("Meet Recordings").await? {
///     let docs = connector.list_files(&folder.id, SourceKind::Document).await?;
/// }
/// ```
pub struct GoogleDriveConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token
    access_token: String,

    /// Timeout applied to every metadata and export request
    request_timeout: Duration,
}

impl GoogleDriveConnector {
    /// Create a new Google Drive connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `access_token` - OAuth 2.0 access token with `drive.readonly` scope
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout for metadata and export calls
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(&self.access_token)
            .timeout(self.request_timeout)
    }

    /// Quote a value for a Drive `q` expression
    fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }

    fn kind_clause(kind: SourceKind) -> String {
        match kind {
            SourceKind::Document => format!("mimeType={}", Self::quote(DOCUMENT_MIME_TYPE)),
            SourceKind::PlainText => format!("mimeType={}", Self::quote(PLAIN_TEXT_MIME_TYPE)),
            SourceKind::Recording => "mimeType contains 'video/'".to_string(),
        }
    }

    /// Parse RFC 3339 timestamp
    fn parse_timestamp(rfc3339: Option<&str>) -> Option<DateTime<Utc>> {
        rfc3339
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert a listed DriveFile into a SourceFile of the queried kind.
    ///
    /// Files without parseable timestamps cannot be windowed or dated, so they
    /// are dropped from the listing.
    fn convert_file(drive_file: DriveFile, kind: SourceKind) -> Option<SourceFile> {
        let created_at = Self::parse_timestamp(drive_file.created_time.as_deref());
        let modified_at = Self::parse_timestamp(drive_file.modified_time.as_deref());

        match (created_at, modified_at) {
            (Some(created_at), Some(modified_at)) => Some(SourceFile {
                id: drive_file.id,
                name: drive_file.name,
                kind,
                mime_type: drive_file.mime_type,
                created_at,
                modified_at,
            }),
            _ => {
                warn!(
                    file_id = %drive_file.id,
                    created = ?drive_file.created_time,
                    modified = ?drive_file.modified_time,
                    "Skipping file with unparseable timestamps"
                );
                None
            }
        }
    }

    fn check_status(response: &HttpResponse) -> Result<()> {
        if response.is_success() {
            Ok(())
        } else {
            Err(GoogleDriveError::from_status(response.status, response.body_lossy()).into())
        }
    }

    /// Run a files.list query, following `nextPageToken` to the end
    async fn list_all(&self, query: &str, fields: &str) -> Result<Vec<DriveFile>> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/files?q={}&pageSize={}&fields={}&orderBy=createdTime",
                DRIVE_API_BASE,
                urlencoding::encode(query),
                MAX_PAGE_SIZE,
                urlencoding::encode(fields)
            );

            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
            }

            let response = self.http_client.execute(self.get(url)).await?;
            Self::check_status(&response)?;

            let page: FilesListResponse = serde_json::from_slice(&response.body).map_err(|e| {
                GoogleDriveError::ParseError(format!("Failed to parse files list response: {}", e))
            })?;

            debug!(count = page.files.len(), "Fetched listing page");
            files.extend(page.files);

            match page.next_page_token {
                Some(next) if page_token.as_deref() != Some(next.as_str()) => {
                    page_token = Some(next)
                }
                _ => break,
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl SourceProvider for GoogleDriveConnector {
    #[instrument(skip(self))]
    async fn find_folders(&self, name: &str) -> Result<Vec<SourceFolder>> {
        let query = format!(
            "name = {} and mimeType={} and trashed=false",
            Self::quote(name),
            Self::quote(FOLDER_MIME_TYPE)
        );

        let folders: Vec<SourceFolder> = self
            .list_all(&query, FOLDER_FIELDS)
            .await?
            .into_iter()
            .map(|f| SourceFolder {
                id: f.id,
                name: f.name,
            })
            .collect();

        info!(count = folders.len(), "Found folders");
        Ok(folders)
    }

    #[instrument(skip(self), fields(folder_id = %folder_id, kind = %kind))]
    async fn list_files(&self, folder_id: &str, kind: SourceKind) -> Result<Vec<SourceFile>> {
        let query = format!(
            "{} in parents and {} and trashed=false",
            Self::quote(folder_id),
            Self::kind_clause(kind)
        );

        let files: Vec<SourceFile> = self
            .list_all(&query, FILE_FIELDS)
            .await?
            .into_iter()
            .filter_map(|f| Self::convert_file(f, kind))
            .collect();

        info!(count = files.len(), "Listed files from Google Drive");
        Ok(files)
    }

    #[instrument(skip(self), fields(file_id = %file_id))]
    async fn export_text(&self, file_id: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/files/{}/export?mimeType={}",
            DRIVE_API_BASE,
            urlencoding::encode(file_id),
            urlencoding::encode(PLAIN_TEXT_MIME_TYPE)
        );

        let response = self.http_client.execute(self.get(url)).await?;

        if !response.is_success() {
            warn!(status = response.status, "Document export returned no content");
            return Ok(None);
        }

        debug!(bytes = response.body.len(), "Exported document");
        Ok(Some(response.body_lossy()))
    }

    #[instrument(skip(self), fields(file_id = %file_id))]
    async fn download(&self, file_id: &str) -> Result<Bytes> {
        let url = format!(
            "{}/files/{}?alt=media",
            DRIVE_API_BASE,
            urlencoding::encode(file_id)
        );

        let response = self.http_client.execute(self.get(url)).await?;

        match response.status {
            404 => Err(GoogleDriveError::FileNotFound {
                file_id: file_id.to_string(),
            }
            .into()),
            _ => {
                Self::check_status(&response)?;
                debug!(bytes = response.body.len(), "Downloaded file");
                Ok(response.body)
            }
        }
    }

    #[instrument(skip(self), fields(file_id = %file_id))]
    async fn open_stream(
        &self,
        file_id: &str,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        let url = format!(
            "{}/files/{}?alt=media",
            DRIVE_API_BASE,
            urlencoding::encode(file_id)
        );

        info!("Opening media stream");
        self.http_client
            .download_stream(self.get(url).timeout(MEDIA_TIMEOUT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::io::AsyncReadExt;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
            async fn download_stream(
                &self,
                request: HttpRequest,
            ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn decoded(url: &str) -> String {
        urlencoding::decode(url).unwrap().into_owned()
    }

    fn drive_file(id: &str, created: Option<&str>, modified: Option<&str>) -> DriveFile {
        DriveFile {
            id: id.to_string(),
            name: "Weekly Sync".to_string(),
            mime_type: "text/plain".to_string(),
            created_time: created.map(str::to_string),
            modified_time: modified.map(str::to_string),
        }
    }

    #[test]
    fn test_convert_file() {
        let file = GoogleDriveConnector::convert_file(
            drive_file(
                "file123",
                Some("2026-02-23T06:30:00.000Z"),
                Some("2026-02-23T07:00:00Z"),
            ),
            SourceKind::PlainText,
        )
        .unwrap();

        assert_eq!(file.id, "file123");
        assert_eq!(file.kind, SourceKind::PlainText);
        assert_eq!(file.created_at.to_rfc3339(), "2026-02-23T06:30:00+00:00");
    }

    #[test]
    fn test_convert_file_drops_bad_timestamps() {
        let missing = drive_file("a", None, Some("2026-02-23T07:00:00Z"));
        let garbage = drive_file("b", Some("yesterday"), Some("2026-02-23T07:00:00Z"));

        assert!(GoogleDriveConnector::convert_file(missing, SourceKind::Document).is_none());
        assert!(GoogleDriveConnector::convert_file(garbage, SourceKind::Document).is_none());
    }

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(GoogleDriveConnector::quote("Bob's notes"), r"'Bob\'s notes'");
    }

    #[tokio::test]
    async fn test_find_folders_query() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            let url = decoded(&req.url);
            assert!(url.contains("name = 'Meet Recordings'"));
            assert!(url.contains("mimeType='application/vnd.google-apps.folder'"));
            assert!(url.contains("trashed=false"));
            assert_eq!(
                req.headers.get("Authorization").map(String::as_str),
                Some("Bearer test_token")
            );
            assert_eq!(req.timeout, Some(DEFAULT_TIMEOUT));

            Ok(response(
                200,
                r#"{ "files": [ { "id": "folder1", "name": "Meet Recordings" } ] }"#,
            ))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "test_token".to_string());
        let folders = connector.find_folders("Meet Recordings").await.unwrap();

        assert_eq!(
            folders,
            vec![SourceFolder {
                id: "folder1".to_string(),
                name: "Meet Recordings".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_find_folders_none_is_empty() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(200, r#"{ "files": [] }"#)));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        assert!(connector.find_folders("Missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_files_follows_pages() {
        let mut mock_http = MockHttpClient::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        mock_http.expect_execute().times(2).returning(move |req| {
            let url = decoded(&req.url);
            seen_clone.lock().unwrap().push(url.clone());

            if url.contains("pageToken=page2") {
                Ok(response(
                    200,
                    r#"{ "files": [ {
                        "id": "doc2", "name": "Retro",
                        "mimeType": "application/vnd.google-apps.document",
                        "createdTime": "2026-02-23T08:00:00Z",
                        "modifiedTime": "2026-02-23T09:00:00Z"
                    } ] }"#,
                ))
            } else {
                Ok(response(
                    200,
                    r#"{ "files": [ {
                        "id": "doc1", "name": "Weekly Sync",
                        "mimeType": "application/vnd.google-apps.document",
                        "createdTime": "2026-02-23T06:30:00Z",
                        "modifiedTime": "2026-02-23T07:00:00Z"
                    } ], "nextPageToken": "page2" }"#,
                ))
            }
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        let files = connector
            .list_files("folder1", SourceKind::Document)
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, "doc1");
        assert_eq!(files[1].id, "doc2");
        assert!(files.iter().all(|f| f.kind == SourceKind::Document));

        let urls = seen.lock().unwrap();
        assert!(urls[0].contains("'folder1' in parents"));
        assert!(urls[0].contains("mimeType='application/vnd.google-apps.document'"));
        assert!(!urls[0].contains("&pageToken="));
    }

    #[tokio::test]
    async fn test_list_recordings_uses_video_prefix() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(decoded(&req.url).contains("mimeType contains 'video/'"));
            Ok(response(200, r#"{ "files": [] }"#))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        let files = connector
            .list_files("folder1", SourceKind::Recording)
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_list_files_api_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(401, "invalid credentials")));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        let result = connector.list_files("folder1", SourceKind::PlainText).await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(msg)) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_export_text_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            let url = decoded(&req.url);
            assert!(url.contains("/files/doc1/export"));
            assert!(url.contains("mimeType=text/plain"));
            Ok(response(200, "Agenda\n1. Roadmap"))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        let text = connector.export_text("doc1").await.unwrap();

        assert_eq!(text.as_deref(), Some("Agenda\n1. Roadmap"));
    }

    #[tokio::test]
    async fn test_export_text_non_success_is_none() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(403, "export not allowed yet")));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        assert_eq!(connector.export_text("doc1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_export_text_transport_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Err(BridgeError::Timeout("30s elapsed".to_string())));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        assert!(matches!(
            connector.export_text("doc1").await,
            Err(BridgeError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_download_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("alt=media"));
            Ok(response(200, "hello"))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        let data = connector.download("txt1").await.unwrap();

        assert_eq!(&data[..], b"hello");
    }

    #[tokio::test]
    async fn test_download_not_found() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(response(404, "")));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string());
        let err = connector.download("gone").await.unwrap_err();

        assert!(err.to_string().contains("File not found: gone"));
    }

    #[tokio::test]
    async fn test_open_stream_uses_media_timeout() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_download_stream()
            .times(1)
            .returning(|req| {
                assert!(req.url.ends_with("/files/rec1?alt=media"));
                assert_eq!(req.timeout, Some(MEDIA_TIMEOUT));
                Ok(Box::new(std::io::Cursor::new(b"mp4 bytes".to_vec())))
            });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string())
            .with_timeout(Duration::from_secs(5));
        let mut stream = connector.open_stream("rec1").await.unwrap();

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"mp4 bytes");
    }
}
