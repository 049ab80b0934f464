//! # Sync Coordinator
//!
//! Runs one pass of the Drive → repository sync.
//!
//! ## Workflow
//!
//! 1. Load the processed set and prune entries past retention
//! 2. Look up every configured folder name (each may resolve to zero or more folders)
//! 3. Per folder, list documents, plain-text files and recordings, in that order
//! 4. Per file: eligibility check, content resolution, remote upsert
//! 5. Record each successful write in the processed set immediately
//! 6. Return a [`RunSummary`]
//!
//! Only processed-set storage failures abort a run. Listing, export and write
//! failures are logged and the run moves on; the affected files stay
//! unprocessed and are picked up by a later run while still inside the
//! eligibility window.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncCoordinator, SyncOptions};
//!
//! let coordinator = SyncCoordinator::new(source, content_store, settings, clock, options);
//! let summary = coordinator.run_once().await?;
//! println!("synced {} / skipped {} / errored {}", summary.synced, summary.skipped, summary.errored);
//! ```

use crate::{
    eligibility::{self, Eligibility},
    outcome::{FileOutcome, FileReport, RunSummary, SkipReason},
    processed::{ProcessedSet, ProcessedStore},
    remote_path::{commit_message, PathLayout},
    resolver::ContentResolver,
    upsert::RemoteUpsertClient,
    Result,
};
use bridge_traits::{
    content::{ContentStore, PutOutcome},
    storage::{SettingsStore, SourceFile, SourceFolder, SourceKind, SourceProvider},
    time::Clock,
};
use chrono::{DateTime, Duration, Utc};
use core_runtime::config::SyncConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Engine settings derived from [`SyncConfig`]
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Folder display names to scan, in order
    pub folder_names: Vec<String>,

    /// Trailing window on last-modified time
    pub eligibility_window: Duration,

    /// Age after which processed entries are forgotten
    pub retention_days: u32,

    /// Settings key holding the processed set
    pub state_key: String,

    pub layout: PathLayout,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            folder_names: vec!["Meet Recordings".to_string()],
            eligibility_window: Duration::hours(24),
            retention_days: 30,
            state_key: "processed_files".to_string(),
            layout: PathLayout::default(),
        }
    }
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            folder_names: config.folder_names.clone(),
            eligibility_window: config.eligibility_window(),
            retention_days: config.retention_days,
            state_key: config.state_key.clone(),
            layout: PathLayout::new(&config.transcript_dir, &config.audio_trigger_dir),
        }
    }
}

/// Orchestrates listing, eligibility, resolution and upsert for one run
pub struct SyncCoordinator {
    source: Arc<dyn SourceProvider>,
    resolver: ContentResolver,
    upsert: RemoteUpsertClient,
    processed: ProcessedStore,
    clock: Arc<dyn Clock>,
    options: SyncOptions,
}

impl SyncCoordinator {
    pub fn new(
        source: Arc<dyn SourceProvider>,
        content_store: Arc<dyn ContentStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        options: SyncOptions,
    ) -> Self {
        Self {
            resolver: ContentResolver::new(source.clone(), clock.clone()),
            upsert: RemoteUpsertClient::new(content_store),
            processed: ProcessedStore::new(settings, options.state_key.clone()),
            source,
            clock,
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Execute one sync pass over every configured folder.
    ///
    /// # Errors
    ///
    /// Only when the processed set cannot be read, parsed or written.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<RunSummary> {
        let now = self.clock.now();
        let mut summary = RunSummary::new(now);

        info!(run_id = %summary.run_id, folders = ?self.options.folder_names, "Starting sync run");

        let mut processed = self.processed.load().await?;
        summary.pruned = self
            .processed
            .prune(&mut processed, now, self.options.retention_days)
            .await?;

        let mut seen_folders = HashSet::new();

        for folder_name in &self.options.folder_names {
            let folders = match self.source.find_folders(folder_name).await {
                Ok(folders) => folders,
                Err(e) => {
                    warn!(folder = %folder_name, error = %e, "Folder lookup failed");
                    continue;
                }
            };

            if folders.is_empty() {
                info!(folder = %folder_name, "Folder not found");
            }

            for folder in folders {
                if !seen_folders.insert(folder.id.clone()) {
                    debug!(folder_id = %folder.id, "Folder already scanned in this run");
                    continue;
                }

                self.sync_folder(&folder, now, &mut processed, &mut summary)
                    .await?;
            }
        }

        summary.finish(self.clock.now());

        info!(
            run_id = %summary.run_id,
            synced = summary.synced,
            skipped = summary.skipped,
            errored = summary.errored,
            pruned = summary.pruned,
            "Sync run finished"
        );

        Ok(summary)
    }

    async fn sync_folder(
        &self,
        folder: &SourceFolder,
        now: DateTime<Utc>,
        processed: &mut ProcessedSet,
        summary: &mut RunSummary,
    ) -> Result<()> {
        // Documents are listed first; recordings are matched against them.
        let mut documents: Option<Vec<SourceFile>> = None;

        for kind in SourceKind::ALL {
            let files = match self.source.list_files(&folder.id, kind).await {
                Ok(files) => files,
                Err(e) => {
                    warn!(folder_id = %folder.id, kind = %kind, error = %e, "Listing failed");
                    continue;
                }
            };

            debug!(folder = %folder.name, kind = %kind, count = files.len(), "Listed files");

            if kind == SourceKind::Document {
                documents = Some(files.clone());
            }

            for file in &files {
                let outcome = self
                    .sync_file(file, documents.as_deref(), now, processed)
                    .await?;
                summary.record(FileReport::new(file, outcome));
            }
        }

        Ok(())
    }

    /// Handle one file. `Err` only for processed-set persistence failures.
    async fn sync_file(
        &self,
        file: &SourceFile,
        documents: Option<&[SourceFile]>,
        now: DateTime<Utc>,
        processed: &mut ProcessedSet,
    ) -> Result<FileOutcome> {
        match eligibility::check(file, processed, now, self.options.eligibility_window) {
            Eligibility::Eligible => {}
            Eligibility::AlreadyProcessed => {
                return Ok(FileOutcome::skipped(SkipReason::AlreadyProcessed))
            }
            Eligibility::OutsideWindow => {
                return Ok(FileOutcome::skipped(SkipReason::OutsideWindow))
            }
        }

        let siblings = match (file.kind, documents) {
            (SourceKind::Recording, None) => {
                warn!(file_id = %file.id, "Transcript listing unavailable, leaving recording for a later run");
                return Ok(FileOutcome::failed("transcript listing unavailable"));
            }
            (_, documents) => documents.unwrap_or_default(),
        };

        let content = match self.resolver.resolve(file, siblings).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                info!(file_id = %file.id, name = %file.name, "No content yet");
                return Ok(FileOutcome::skipped(SkipReason::NoContent));
            }
            Err(e) => {
                warn!(file_id = %file.id, name = %file.name, error = %e, "Content fetch failed");
                return Ok(FileOutcome::failed(e.to_string()));
            }
        };

        let bytes = match content.into_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "Payload encoding failed");
                return Ok(FileOutcome::failed(e.to_string()));
            }
        };

        let path = self.options.layout.path_for(file);
        let message = commit_message(file);

        let created = match self.upsert.upsert(&path, &message, bytes).await {
            Ok(PutOutcome::Created) => true,
            Ok(PutOutcome::Updated) => false,
            Ok(PutOutcome::Rejected { status, .. }) => {
                return Ok(FileOutcome::failed(format!(
                    "remote write rejected with status {}",
                    status
                )));
            }
            Err(e) => {
                warn!(file_id = %file.id, path = %path, error = %e, "Remote write failed");
                return Ok(FileOutcome::failed(e.to_string()));
            }
        };

        self.processed
            .mark_processed(processed, &file.id, self.clock.now())
            .await?;

        info!(file_id = %file.id, path = %path, created, "Synced file");
        Ok(FileOutcome::Synced { path, created })
    }
}
