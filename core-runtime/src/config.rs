//! # Sync Configuration
//!
//! Settings for one sync run.
//!
//! ## Overview
//!
//! A [`SyncConfig`] is assembled with [`SyncConfigBuilder`] (or read from the
//! environment with [`SyncConfig::from_env`]) and validated before any work
//! starts. Missing credentials or repository coordinates are a fatal
//! configuration error for that run; everything else has a default.
//!
//! ## Required Settings
//!
//! - `github_token` - Bearer credential for the remote repository
//! - `repo_owner` / `repo_name` - Remote repository coordinates
//! - `drive_token` - Bearer credential for the source folder API
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .github_token(token)
//!     .repo_owner("acme")
//!     .repo_name("meeting-notes")
//!     .drive_token(drive_token)
//!     .folder_names(["Meet Recordings"])
//!     .build()?;
//! ```
//!
//! ## Environment
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `GITHUB_TOKEN` | `github_token` |
//! | `GITHUB_OWNER` | `repo_owner` |
//! | `GITHUB_REPO` | `repo_name` |
//! | `GITHUB_BRANCH` | `branch` |
//! | `DRIVE_ACCESS_TOKEN` | `drive_token` |
//! | `DRIVE_FOLDER_NAMES` | `folder_names` (comma separated) |
//! | `SYNC_REQUEST_TIMEOUT_SECS` | `request_timeout` |

use crate::error::{Error, Result};
use std::time::Duration;

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_OWNER: &str = "GITHUB_OWNER";
pub const ENV_GITHUB_REPO: &str = "GITHUB_REPO";
pub const ENV_GITHUB_BRANCH: &str = "GITHUB_BRANCH";
pub const ENV_DRIVE_TOKEN: &str = "DRIVE_ACCESS_TOKEN";
pub const ENV_FOLDER_NAMES: &str = "DRIVE_FOLDER_NAMES";
pub const ENV_REQUEST_TIMEOUT: &str = "SYNC_REQUEST_TIMEOUT_SECS";

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_FOLDER_NAME: &str = "Meet Recordings";
const DEFAULT_ELIGIBILITY_WINDOW_HOURS: u32 = 24;
const DEFAULT_RETENTION_DAYS: u32 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_STATE_KEY: &str = "processed_files";
const DEFAULT_TRANSCRIPT_DIR: &str = "transcripts";
const DEFAULT_AUDIO_TRIGGER_DIR: &str = "audio_triggers";

/// Configuration for a sync run.
///
/// Use [`SyncConfig::builder`] to construct instances.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Bearer credential for the remote repository
    pub github_token: String,

    /// Owner (user or organisation) of the remote repository
    pub repo_owner: String,

    /// Name of the remote repository
    pub repo_name: String,

    /// Branch every write targets
    pub branch: String,

    /// Bearer credential for the source folder API
    pub drive_token: String,

    /// Display names of the source folders to scan, tried in order
    pub folder_names: Vec<String>,

    /// Trailing window (hours) a file's last modification must fall into
    pub eligibility_window_hours: u32,

    /// Days a processed-set entry is kept before pruning
    pub retention_days: u32,

    /// Upper bound for every network call
    pub request_timeout: Duration,

    /// Settings key holding the serialized processed set
    pub state_key: String,

    /// Remote directory for transcript payloads
    pub transcript_dir: String,

    /// Remote directory for audio trigger records
    pub audio_trigger_dir: String,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("github_token", &"[REDACTED]")
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("branch", &self.branch)
            .field("drive_token", &"[REDACTED]")
            .field("folder_names", &self.folder_names)
            .field("eligibility_window_hours", &self.eligibility_window_hours)
            .field("retention_days", &self.retention_days)
            .field("request_timeout", &self.request_timeout)
            .field("state_key", &self.state_key)
            .field("transcript_dir", &self.transcript_dir)
            .field("audio_trigger_dir", &self.audio_trigger_dir)
            .finish()
    }
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or empty,
    /// or when an optional variable holds an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(value) = lookup(ENV_GITHUB_TOKEN) {
            builder = builder.github_token(value);
        }
        if let Some(value) = lookup(ENV_GITHUB_OWNER) {
            builder = builder.repo_owner(value);
        }
        if let Some(value) = lookup(ENV_GITHUB_REPO) {
            builder = builder.repo_name(value);
        }
        if let Some(value) = lookup(ENV_GITHUB_BRANCH).filter(|v| !v.trim().is_empty()) {
            builder = builder.branch(value);
        }
        if let Some(value) = lookup(ENV_DRIVE_TOKEN) {
            builder = builder.drive_token(value);
        }
        if let Some(value) = lookup(ENV_FOLDER_NAMES).filter(|v| !v.trim().is_empty()) {
            builder = builder.folder_names(parse_folder_names(&value));
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_REQUEST_TIMEOUT, value
                ))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Eligibility window as a chrono duration
    pub fn eligibility_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.eligibility_window_hours))
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Credentials and repository coordinates are present
    /// - At least one folder name is configured
    /// - Retention comfortably exceeds the eligibility window
    /// - The request timeout is bounded
    pub fn validate(&self) -> Result<()> {
        require("GitHub access token", ENV_GITHUB_TOKEN, &self.github_token)?;
        require("Repository owner", ENV_GITHUB_OWNER, &self.repo_owner)?;
        require("Repository name", ENV_GITHUB_REPO, &self.repo_name)?;
        require("Drive access token", ENV_DRIVE_TOKEN, &self.drive_token)?;

        if self.repo_owner.contains('/') || self.repo_name.contains('/') {
            return Err(Error::Config(
                "Repository owner and name must not contain '/'. \
                 Pass them separately, e.g. owner=acme name=meeting-notes."
                    .to_string(),
            ));
        }

        if self.branch.trim().is_empty() {
            return Err(Error::Config("Branch cannot be empty".to_string()));
        }

        if self.folder_names.is_empty() || self.folder_names.iter().any(|n| n.trim().is_empty()) {
            return Err(Error::Config(
                "At least one non-empty source folder name is required".to_string(),
            ));
        }

        if self.eligibility_window_hours == 0 {
            return Err(Error::Config(
                "Eligibility window must be at least one hour".to_string(),
            ));
        }

        // Pruning must never drop an entry that still guards against a duplicate.
        if u64::from(self.retention_days) * 24 <= u64::from(self.eligibility_window_hours) {
            return Err(Error::Config(format!(
                "Retention ({} days) must exceed the eligibility window ({} hours)",
                self.retention_days, self.eligibility_window_hours
            )));
        }

        check_timeout(self.request_timeout)?;

        if self.state_key.trim().is_empty() {
            return Err(Error::Config("State key cannot be empty".to_string()));
        }

        for (label, dir) in [
            ("Transcript directory", &self.transcript_dir),
            ("Audio trigger directory", &self.audio_trigger_dir),
        ] {
            if dir.trim_matches('/').is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", label)));
            }
        }

        Ok(())
    }
}

/// Settings for a one-off recording download.
///
/// Only the Drive credential is needed; repository coordinates and the
/// processed-set database play no part in fetching media.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub drive_token: String,
    pub request_timeout: Duration,
}

impl FetchConfig {
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the token is blank or the timeout is
    /// out of range.
    pub fn new(drive_token: impl Into<String>, request_timeout: Option<Duration>) -> Result<Self> {
        let config = Self {
            drive_token: drive_token.into(),
            request_timeout: request_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        };

        require("Drive access token", ENV_DRIVE_TOKEN, &config.drive_token)?;
        check_timeout(config.request_timeout)?;
        Ok(config)
    }
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("drive_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn check_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        return Err(Error::Config(
            "Request timeout must be greater than 0 seconds".to_string(),
        ));
    }

    if timeout > Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS) {
        return Err(Error::Config(format!(
            "Request timeout exceeds maximum of {} seconds",
            MAX_REQUEST_TIMEOUT_SECS
        )));
    }

    Ok(())
}

fn require(label: &str, env_key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!(
            "{} is required. Set {} or pass it explicitly.",
            label, env_key
        )));
    }
    Ok(())
}

/// Split a comma separated folder list, dropping blanks
pub fn parse_folder_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builder for constructing [`SyncConfig`] instances.
///
/// Required values start empty so that [`build`](SyncConfigBuilder::build)
/// can report exactly which one is missing.
#[derive(Default)]
pub struct SyncConfigBuilder {
    github_token: Option<String>,
    repo_owner: Option<String>,
    repo_name: Option<String>,
    branch: Option<String>,
    drive_token: Option<String>,
    folder_names: Option<Vec<String>>,
    eligibility_window_hours: Option<u32>,
    retention_days: Option<u32>,
    request_timeout: Option<Duration>,
    state_key: Option<String>,
    transcript_dir: Option<String>,
    audio_trigger_dir: Option<String>,
}

impl SyncConfigBuilder {
    pub fn github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    pub fn repo_owner(mut self, owner: impl Into<String>) -> Self {
        self.repo_owner = Some(owner.into());
        self
    }

    pub fn repo_name(mut self, name: impl Into<String>) -> Self {
        self.repo_name = Some(name.into());
        self
    }

    /// Target branch. Default: `main`
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn drive_token(mut self, token: impl Into<String>) -> Self {
        self.drive_token = Some(token.into());
        self
    }

    /// Source folder display names. Default: `["Meet Recordings"]`
    pub fn folder_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.folder_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Default: 24 hours
    pub fn eligibility_window_hours(mut self, hours: u32) -> Self {
        self.eligibility_window_hours = Some(hours);
        self
    }

    /// Default: 30 days
    pub fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = Some(days);
        self
    }

    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Default: `processed_files`
    pub fn state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = Some(key.into());
        self
    }

    /// Default: `transcripts`
    pub fn transcript_dir(mut self, dir: impl Into<String>) -> Self {
        self.transcript_dir = Some(dir.into());
        self
    }

    /// Default: `audio_triggers`
    pub fn audio_trigger_dir(mut self, dir: impl Into<String>) -> Self {
        self.audio_trigger_dir = Some(dir.into());
        self
    }

    /// Builds and validates the final `SyncConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with an actionable message if a required
    /// setting is missing or any value is out of range.
    pub fn build(self) -> Result<SyncConfig> {
        let config = SyncConfig {
            github_token: self.github_token.unwrap_or_default(),
            repo_owner: self.repo_owner.unwrap_or_default().trim().to_string(),
            repo_name: self.repo_name.unwrap_or_default().trim().to_string(),
            branch: self.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            drive_token: self.drive_token.unwrap_or_default(),
            folder_names: self
                .folder_names
                .unwrap_or_else(|| vec![DEFAULT_FOLDER_NAME.to_string()]),
            eligibility_window_hours: self
                .eligibility_window_hours
                .unwrap_or(DEFAULT_ELIGIBILITY_WINDOW_HOURS),
            retention_days: self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
            request_timeout: self
                .request_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            state_key: self
                .state_key
                .unwrap_or_else(|| DEFAULT_STATE_KEY.to_string()),
            transcript_dir: self
                .transcript_dir
                .unwrap_or_else(|| DEFAULT_TRANSCRIPT_DIR.to_string()),
            audio_trigger_dir: self
                .audio_trigger_dir
                .unwrap_or_else(|| DEFAULT_AUDIO_TRIGGER_DIR.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}
