//! Service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridges (HTTP, settings storage, clock) and
//! the Drive and GitHub providers into a [`SyncCoordinator`]. Desktop hosts
//! enable the `desktop-shims` feature (on by default) and call
//! [`bootstrap_desktop`]; other hosts build [`CoreDependencies`] themselves.
//! Downloading a single recording only needs a Drive credential, see
//! [`RecordingFetcher`].

pub mod error;

pub use error::{Result, ServiceError};

use std::path::Path;
use std::sync::Arc;

use bridge_traits::{
    content::ContentStore,
    http::HttpClient,
    storage::{SettingsStore, SourceProvider},
    time::{Clock, SystemClock},
};
use core_runtime::config::{FetchConfig, SyncConfig};
use core_sync::{RunSummary, SyncCoordinator, SyncOptions};
use provider_github::GitHubContentStore;
use provider_google_drive::GoogleDriveConnector;
use tracing::{info, instrument};

/// Aggregated handle to the bridge dependencies the service requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub settings_store: Arc<dyn SettingsStore>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        settings_store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http_client,
            settings_store,
            clock,
        }
    }

    pub fn builder() -> CoreDependenciesBuilder {
        CoreDependenciesBuilder::default()
    }
}

/// Collects bridges one at a time; [`build`](Self::build) reports the first
/// one that is missing.
#[derive(Default)]
pub struct CoreDependenciesBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreDependenciesBuilder {
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Defaults to [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CoreDependencies> {
        let http_client = self.http_client.ok_or_else(|| {
            core_runtime::Error::capability_missing(
                "HttpClient",
                "No HTTP client provided. Desktop builds enable the `desktop-shims` feature.",
            )
        })?;

        let settings_store = self.settings_store.ok_or_else(|| {
            core_runtime::Error::capability_missing(
                "SettingsStore",
                "No settings store provided; the processed set cannot be persisted.",
            )
        })?;

        Ok(CoreDependencies {
            http_client,
            settings_store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

/// Primary façade exposed to the CLI and other hosts.
pub struct MeetingSyncService {
    source: Arc<dyn SourceProvider>,
    coordinator: SyncCoordinator,
}

impl MeetingSyncService {
    /// Validate `config` and build the Drive and GitHub providers over `deps`.
    pub fn new(config: &SyncConfig, deps: CoreDependencies) -> Result<Self> {
        config.validate()?;

        let source: Arc<dyn SourceProvider> = Arc::new(
            GoogleDriveConnector::new(deps.http_client.clone(), config.drive_token.clone())
                .with_timeout(config.request_timeout),
        );

        let content_store: Arc<dyn ContentStore> = Arc::new(
            GitHubContentStore::new(
                deps.http_client,
                config.github_token.clone(),
                config.repo_owner.clone(),
                config.repo_name.clone(),
                config.branch.clone(),
            )
            .with_timeout(config.request_timeout),
        );

        info!(
            owner = %config.repo_owner,
            repo = %config.repo_name,
            branch = %config.branch,
            folders = ?config.folder_names,
            "Meeting sync service configured"
        );

        Ok(Self::from_parts(
            source,
            content_store,
            deps.settings_store,
            deps.clock,
            SyncOptions::from(config),
        ))
    }

    /// Assemble a service from already-built collaborators.
    pub fn from_parts(
        source: Arc<dyn SourceProvider>,
        content_store: Arc<dyn ContentStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        options: SyncOptions,
    ) -> Self {
        Self {
            coordinator: SyncCoordinator::new(
                source.clone(),
                content_store,
                settings,
                clock,
                options,
            ),
            source,
        }
    }

    /// Run one sync pass.
    pub async fn run_once(&self) -> Result<RunSummary> {
        Ok(self.coordinator.run_once().await?)
    }

    /// Stream the media of source file `file_id` into `output`.
    ///
    /// See [`RecordingFetcher::fetch`].
    pub async fn fetch_recording(&self, file_id: &str, output: impl AsRef<Path>) -> Result<u64> {
        RecordingFetcher::from_source(self.source.clone())
            .fetch(file_id, output)
            .await
    }
}

/// Downloads recording media by file id, independent of any sync state.
pub struct RecordingFetcher {
    source: Arc<dyn SourceProvider>,
}

impl RecordingFetcher {
    /// Fetch through the Drive API over `http_client`.
    pub fn new(config: &FetchConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self::from_source(Arc::new(
            GoogleDriveConnector::new(http_client, config.drive_token.clone())
                .with_timeout(config.request_timeout),
        ))
    }

    pub fn from_source(source: Arc<dyn SourceProvider>) -> Self {
        Self { source }
    }

    /// Stream the media of `file_id` into `output`, creating parent
    /// directories. Returns the number of bytes written.
    ///
    /// Nothing is created on disk when the source refuses the download.
    #[instrument(skip(self, output))]
    pub async fn fetch(&self, file_id: &str, output: impl AsRef<Path>) -> Result<u64> {
        let output = output.as_ref();
        let io_err = |source: std::io::Error| ServiceError::Io {
            path: output.display().to_string(),
            source,
        };

        let mut reader = self.source.open_stream(file_id).await?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let mut file = tokio::fs::File::create(output).await.map_err(io_err)?;

        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(io_err)?;
        tokio::io::AsyncWriteExt::flush(&mut file)
            .await
            .map_err(io_err)?;

        info!(bytes = written, output = %output.display(), "Recording saved");
        Ok(written)
    }
}

/// Build a service with the desktop bridges: reqwest HTTP and a SQLite
/// settings database at `state_db`.
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap_desktop(
    config: &SyncConfig,
    state_db: std::path::PathBuf,
) -> Result<MeetingSyncService> {
    config.validate()?;

    let http = bridge_desktop::ReqwestHttpClient::with_timeout(config.request_timeout)
        .map_err(|e| ServiceError::InitializationFailed(e.to_string()))?;
    let settings = bridge_desktop::SqliteSettingsStore::new(state_db)
        .await
        .map_err(|e| ServiceError::InitializationFailed(e.to_string()))?;

    let deps = CoreDependencies::builder()
        .http_client(Arc::new(http))
        .settings_store(Arc::new(settings))
        .build()?;

    MeetingSyncService::new(config, deps)
}

/// Build a [`RecordingFetcher`] over the desktop HTTP client. No settings
/// database is opened.
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_fetcher(config: &FetchConfig) -> Result<RecordingFetcher> {
    let http = bridge_desktop::ReqwestHttpClient::with_timeout(config.request_timeout)
        .map_err(|e| ServiceError::InitializationFailed(e.to_string()))?;

    Ok(RecordingFetcher::new(config, Arc::new(http)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{HttpRequest, HttpResponse};
    use mockall::mock;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(
                &self,
                request: HttpRequest,
            ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
        }
    }

    #[derive(Default)]
    struct MemorySettings {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl SettingsStore for MemorySettings {
        async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn delete(&self, key: &str) -> BridgeResult<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn config() -> SyncConfig {
        SyncConfig::builder()
            .github_token("ghp_test")
            .repo_owner("acme")
            .repo_name("minutes")
            .drive_token("ya29.test")
            .build()
            .unwrap()
    }

    fn service(http: MockHttpClient) -> MeetingSyncService {
        let deps = CoreDependencies::builder()
            .http_client(Arc::new(http))
            .settings_store(Arc::new(MemorySettings::default()))
            .build()
            .unwrap();
        MeetingSyncService::new(&config(), deps).unwrap()
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("meeting-sync-{}-{}", std::process::id(), name))
            .join("nested")
            .join("recording.mp4")
    }

    #[test]
    fn test_missing_http_client_is_reported() {
        let result = CoreDependencies::builder()
            .settings_store(Arc::new(MemorySettings::default()))
            .build();

        match result {
            Err(ServiceError::Runtime(core_runtime::Error::CapabilityMissing {
                capability, ..
            })) => assert_eq!(capability, "HttpClient"),
            _ => panic!("expected missing HttpClient"),
        }
    }

    #[test]
    fn test_missing_settings_store_is_reported() {
        let result = CoreDependencies::builder()
            .http_client(Arc::new(MockHttpClient::new()))
            .build();

        assert!(matches!(
            result,
            Err(ServiceError::Runtime(core_runtime::Error::CapabilityMissing { ref capability, .. }))
                if capability == "SettingsStore"
        ));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut bad = config();
        bad.github_token.clear();

        let deps = CoreDependencies::builder()
            .http_client(Arc::new(MockHttpClient::new()))
            .settings_store(Arc::new(MemorySettings::default()))
            .build()
            .unwrap();

        assert!(matches!(
            MeetingSyncService::new(&bad, deps),
            Err(ServiceError::Runtime(core_runtime::Error::Config(_)))
        ));
    }

    #[tokio::test]
    async fn test_fetch_recording_streams_to_file() {
        let mut http = MockHttpClient::new();
        http.expect_download_stream().times(1).returning(|req| {
            assert!(req.url.ends_with("/files/rec-1?alt=media"));
            let body: Box<dyn tokio::io::AsyncRead + Send + Unpin> =
                Box::new(std::io::Cursor::new(b"\x00\x01media".to_vec()));
            Ok(body)
        });

        let output = scratch_path("stream");
        let written = service(http)
            .fetch_recording("rec-1", &output)
            .await
            .unwrap();

        assert_eq!(written, 7);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"\x00\x01media");

        let _ = std::fs::remove_dir_all(output.parent().unwrap().parent().unwrap());
    }

    #[tokio::test]
    async fn test_fetch_recording_propagates_source_error() {
        let mut http = MockHttpClient::new();
        http.expect_download_stream()
            .returning(|_| Err(BridgeError::OperationFailed("HTTP 404".to_string())));

        let output = scratch_path("missing");
        let result = service(http).fetch_recording("gone", &output).await;

        assert!(matches!(result, Err(ServiceError::Source(_))));
        assert!(!output.exists());

        let _ = std::fs::remove_dir_all(output.parent().unwrap().parent().unwrap());
    }

    #[tokio::test]
    async fn test_fetcher_needs_only_drive_credential() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);
        http.expect_download_stream().times(1).returning(|req| {
            assert!(req.url.ends_with("/files/rec-9?alt=media"));
            assert_eq!(
                req.headers.get("Authorization").map(String::as_str),
                Some("Bearer ya29.only")
            );
            let body: Box<dyn tokio::io::AsyncRead + Send + Unpin> =
                Box::new(std::io::Cursor::new(b"audio".to_vec()));
            Ok(body)
        });

        let config = FetchConfig::new("ya29.only", None).unwrap();
        let output = scratch_path("drive-only");
        let written = RecordingFetcher::new(&config, Arc::new(http))
            .fetch("rec-9", &output)
            .await
            .unwrap();

        assert_eq!(written, 5);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"audio");

        let _ = std::fs::remove_dir_all(output.parent().unwrap().parent().unwrap());
    }
}
