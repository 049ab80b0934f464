//! # Processed-Set Store
//!
//! Durable record of which source files have already been synced, as a map of
//! file id to the ISO-8601 time the sync succeeded. The whole map lives under a
//! single key of a [`SettingsStore`].
//!
//! Entries are written only after the remote write reported success, and are
//! aged out by [`ProcessedStore::prune`] once per run before eligibility checks.
//! The retention window is far wider than the eligibility window, so pruning
//! never forgets a file that could still be picked up again.

use crate::{Result, SyncError};
use bridge_traits::storage::SettingsStore;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// In-memory view of the processed set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSet {
    entries: BTreeMap<String, String>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.entries.contains_key(file_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp recorded for `file_id`, if it parses
    pub fn synced_at(&self, file_id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(file_id).and_then(|raw| parse_timestamp(raw))
    }

    pub fn mark(&mut self, file_id: &str, at: DateTime<Utc>) {
        self.entries.insert(
            file_id.to_string(),
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
    }

    /// Drop entries recorded before `now - retention`.
    ///
    /// Entries whose timestamp cannot be parsed are dropped as well. Returns the
    /// number of removed entries.
    pub fn prune(&mut self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let before = self.entries.len();

        self.entries.retain(|id, raw| match parse_timestamp(raw) {
            Some(at) => at >= cutoff,
            None => {
                warn!(file_id = %id, value = %raw, "Dropping processed entry with unreadable timestamp");
                false
            }
        });

        before - self.entries.len()
    }

    fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_str(raw)?,
        })
    }

    fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Loads and persists a [`ProcessedSet`] through a [`SettingsStore`]
pub struct ProcessedStore {
    settings: Arc<dyn SettingsStore>,
    key: String,
}

impl ProcessedStore {
    pub fn new(settings: Arc<dyn SettingsStore>, key: impl Into<String>) -> Self {
        Self {
            settings,
            key: key.into(),
        }
    }

    /// Read the stored set. A missing key is an empty set.
    pub async fn load(&self) -> Result<ProcessedSet> {
        let raw = self
            .settings
            .get_string(&self.key)
            .await
            .map_err(|e| SyncError::State(format!("Failed to read '{}': {}", self.key, e)))?;

        match raw {
            None => Ok(ProcessedSet::new()),
            Some(raw) if raw.trim().is_empty() => Ok(ProcessedSet::new()),
            Some(raw) => ProcessedSet::from_json(&raw).map_err(|e| SyncError::CorruptState {
                key: self.key.clone(),
                reason: e.to_string(),
            }),
        }
    }

    pub async fn save(&self, set: &ProcessedSet) -> Result<()> {
        let json = set
            .to_json()
            .map_err(|e| SyncError::Encoding(e.to_string()))?;

        self.settings
            .set_string(&self.key, &json)
            .await
            .map_err(|e| SyncError::State(format!("Failed to write '{}': {}", self.key, e)))?;

        debug!(entries = set.len(), "Saved processed set");
        Ok(())
    }

    /// Record `file_id` as synced and persist before returning.
    ///
    /// The stored copy is re-read first, so entries another run wrote since
    /// this run's `load` usually survive. The read and the write are not
    /// atomic: a write landing between them can still be overwritten. The
    /// lost file is then synced again on a later run, which rewrites the
    /// same content.
    pub async fn mark_processed(
        &self,
        set: &mut ProcessedSet,
        file_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut stored = self.load().await?;
        stored.mark(file_id, at);
        self.save(&stored).await?;

        set.mark(file_id, at);
        Ok(())
    }

    /// Prune entries older than `retention_days` and persist the result.
    ///
    /// Works on the union of the stored copy and `set`, which afterwards holds
    /// the pruned union. Returns the number of removed entries.
    pub async fn prune(
        &self,
        set: &mut ProcessedSet,
        now: DateTime<Utc>,
        retention_days: u32,
    ) -> Result<usize> {
        let mut merged = self.load().await?;
        let stored_len = merged.len();

        for (id, raw) in &set.entries {
            merged
                .entries
                .entry(id.clone())
                .or_insert_with(|| raw.clone());
        }
        let added = merged.len() - stored_len;

        let removed = merged.prune(now, Duration::days(i64::from(retention_days)));

        if removed > 0 || added > 0 {
            self.save(&merged).await?;
        }
        if removed > 0 {
            info!(removed, remaining = merged.len(), "Pruned processed set");
        }

        *set = merged;
        Ok(removed)
    }
}
