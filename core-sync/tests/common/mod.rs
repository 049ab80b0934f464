//! In-memory collaborators shared by the sync integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::{
    content::{ContentStore, PutOutcome, PutRequest, RemoteObject},
    error::{BridgeError, Result},
    storage::{SettingsStore, SourceFile, SourceFolder, SourceKind, SourceProvider},
    time::Clock,
};
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_sync::{SyncCoordinator, SyncOptions};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Clock
// ============================================================================

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// 2026-02-24 09:00 UTC, the "now" most tests run at
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 9, 0, 0).unwrap()
}

// ============================================================================
// Source folder
// ============================================================================

#[derive(Default)]
pub struct FakeSource {
    folders: Mutex<HashMap<String, Vec<SourceFolder>>>,
    files: Mutex<HashMap<(String, SourceKind), Vec<SourceFile>>>,
    exports: Mutex<HashMap<String, Option<String>>>,
    contents: Mutex<HashMap<String, Vec<u8>>>,
    failing_listings: Mutex<HashSet<(String, SourceKind)>>,
    failing_lookups: Mutex<HashSet<String>>,
    pub downloads: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, name: &str, id: &str) {
        self.folders
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push(SourceFolder {
                id: id.to_string(),
                name: name.to_string(),
            });
    }

    pub fn add_file(&self, folder_id: &str, file: SourceFile) {
        self.files
            .lock()
            .unwrap()
            .entry((folder_id.to_string(), file.kind))
            .or_default()
            .push(file);
    }

    pub fn set_export(&self, file_id: &str, text: Option<&str>) {
        self.exports
            .lock()
            .unwrap()
            .insert(file_id.to_string(), text.map(str::to_string));
    }

    pub fn set_content(&self, file_id: &str, bytes: &[u8]) {
        self.contents
            .lock()
            .unwrap()
            .insert(file_id.to_string(), bytes.to_vec());
    }

    pub fn fail_listing(&self, folder_id: &str, kind: SourceKind) {
        self.failing_listings
            .lock()
            .unwrap()
            .insert((folder_id.to_string(), kind));
    }

    pub fn fail_lookup(&self, name: &str) {
        self.failing_lookups.lock().unwrap().insert(name.to_string());
    }
}

#[async_trait]
impl SourceProvider for FakeSource {
    async fn find_folders(&self, name: &str) -> Result<Vec<SourceFolder>> {
        if self.failing_lookups.lock().unwrap().contains(name) {
            return Err(BridgeError::OperationFailed("lookup failed".to_string()));
        }
        Ok(self
            .folders
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_files(&self, folder_id: &str, kind: SourceKind) -> Result<Vec<SourceFile>> {
        let key = (folder_id.to_string(), kind);
        if self.failing_listings.lock().unwrap().contains(&key) {
            return Err(BridgeError::Timeout("listing".to_string()));
        }
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn export_text(&self, file_id: &str) -> Result<Option<String>> {
        self.exports
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| BridgeError::Timeout(format!("export of {}", file_id)))
    }

    async fn download(&self, file_id: &str) -> Result<Bytes> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.contents
            .lock()
            .unwrap()
            .get(file_id)
            .map(|bytes| Bytes::from(bytes.clone()))
            .ok_or_else(|| BridgeError::OperationFailed(format!("no content for {}", file_id)))
    }

    async fn open_stream(
        &self,
        file_id: &str,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        let bytes = self.download(file_id).await?;
        Ok(Box::new(std::io::Cursor::new(bytes.to_vec())))
    }
}

pub fn source_file(
    id: &str,
    name: &str,
    kind: SourceKind,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
) -> SourceFile {
    let mime_type = match kind {
        SourceKind::Document => "application/vnd.google-apps.document",
        SourceKind::PlainText => "text/plain",
        SourceKind::Recording => "video/mp4",
    };

    SourceFile {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        mime_type: mime_type.to_string(),
        created_at,
        modified_at,
    }
}

// ============================================================================
// Remote content store
// ============================================================================

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content: Bytes,
    pub version: String,
    pub message: String,
}

/// Content store with version-token conflict semantics.
///
/// Replacing an existing path requires its current version; a missing or
/// stale token is answered with 409, a token for an absent path with 422.
#[derive(Default)]
pub struct FakeContentStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    next_version: AtomicUsize,
    pub puts: AtomicUsize,
    pub fetches: AtomicUsize,
    /// Simulates another writer landing between fetch and put
    interfere_after_fetch: AtomicBool,
    fail_fetch: AtomicBool,
}

impl FakeContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn interfere_after_fetch(&self, enabled: bool) {
        self.interfere_after_fetch.store(enabled, Ordering::SeqCst);
    }

    pub fn fail_fetch(&self, enabled: bool) {
        self.fail_fetch.store(enabled, Ordering::SeqCst);
    }

    pub fn seed(&self, path: &str, content: &[u8]) -> String {
        let version = self.new_version();
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                content: Bytes::from(content.to_vec()),
                version: version.clone(),
                message: "seed".to_string(),
            },
        );
        version
    }

    fn new_version(&self) -> String {
        format!("v{}", self.next_version.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn fetch(&self, path: &str) -> Result<Option<RemoteObject>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(BridgeError::Timeout("fetch".to_string()));
        }

        let found = self.object(path).map(|object| RemoteObject {
            path: path.to_string(),
            version: object.version,
        });

        if self.interfere_after_fetch.load(Ordering::SeqCst) {
            let version = self.new_version();
            let mut objects = self.objects.lock().unwrap();
            let object = objects.entry(path.to_string()).or_insert_with(|| StoredObject {
                content: Bytes::from_static(b"edited elsewhere"),
                version: String::new(),
                message: "concurrent edit".to_string(),
            });
            object.version = version;
        }

        Ok(found)
    }

    async fn put(&self, request: PutRequest) -> Result<PutOutcome> {
        self.puts.fetch_add(1, Ordering::SeqCst);

        let version = self.new_version();
        let mut objects = self.objects.lock().unwrap();
        let current = objects.get(&request.path).map(|o| o.version.clone());

        let outcome = match (current, request.version.as_deref()) {
            (None, None) => PutOutcome::Created,
            (None, Some(_)) => {
                return Ok(PutOutcome::Rejected {
                    status: 422,
                    body: "sha given for missing file".to_string(),
                })
            }
            (Some(current), Some(presented)) if current == presented => PutOutcome::Updated,
            (Some(current), presented) => {
                return Ok(PutOutcome::Rejected {
                    status: 409,
                    body: format!("is at {} but expected {:?}", current, presented),
                })
            }
        };

        objects.insert(
            request.path,
            StoredObject {
                content: request.content,
                version,
                message: request.message,
            },
        );

        Ok(outcome)
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub source: Arc<FakeSource>,
    pub store: Arc<FakeContentStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Arc::new(MemorySettings::new()))
    }

    pub fn with_settings(settings: Arc<dyn SettingsStore>) -> Self {
        let source = Arc::new(FakeSource::new());
        source.add_folder("Meet Recordings", "folder-1");

        Self {
            source,
            store: Arc::new(FakeContentStore::new()),
            settings,
            clock: Arc::new(FixedClock::at(test_now())),
        }
    }

    pub fn coordinator(&self) -> SyncCoordinator {
        self.coordinator_with(SyncOptions::default())
    }

    pub fn coordinator_with(&self, options: SyncOptions) -> SyncCoordinator {
        SyncCoordinator::new(
            self.source.clone(),
            self.store.clone(),
            self.settings.clone(),
            self.clock.clone(),
            options,
        )
    }

    pub async fn stored_state(&self) -> serde_json::Map<String, serde_json::Value> {
        match self.settings.get_string("processed_files").await.unwrap() {
            Some(raw) => serde_json::from_str(&raw).unwrap(),
            None => serde_json::Map::new(),
        }
    }
}
