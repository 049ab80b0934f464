//! CLI definitions using clap.

use anyhow::{anyhow, Result};
use bridge_traits::time::LogLevel;
use clap::{Args, Parser, Subcommand, ValueEnum};
use core_runtime::config::{
    parse_folder_names, FetchConfig, SyncConfig, ENV_DRIVE_TOKEN, ENV_FOLDER_NAMES, ENV_GITHUB_BRANCH,
    ENV_GITHUB_OWNER, ENV_GITHUB_REPO, ENV_GITHUB_TOKEN, ENV_REQUEST_TIMEOUT,
};
use core_runtime::logging::{LogFormat, LoggingConfig};
use std::path::PathBuf;
use std::time::Duration;

const STATE_DB_FILE: &str = "state.db";

/// One week
const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable, multi-line
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line per event
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

/// Sync Google Meet transcripts and recording triggers into a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "meeting-sync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Processed-set database (default: <data dir>/meeting-sync/state.db)
    #[arg(long, global = true, env = "MEETING_SYNC_STATE_DB")]
    pub state_db: Option<PathBuf>,

    /// Minimum level for this tool's own logs
    #[arg(long, global = true, env = "MEETING_SYNC_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format (default: pretty in debug builds, json in release)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    /// Raw filter directives, overriding --log-level and RUST_LOG
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a sync pass, once or on a fixed interval
    Sync {
        /// Repeat every N minutes (at most one week) until interrupted
        #[arg(
            long,
            value_name = "MINUTES",
            value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES)
        )]
        every: Option<u64>,

        /// Print each run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a recording's media to a local file
    FetchRecording {
        /// Source file id
        file_id: String,

        /// Destination path; parent directories are created
        output: PathBuf,
    },
}

/// Connection and layout settings; each flag can also come from the environment
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// GitHub access token
    #[arg(long, global = true, env = ENV_GITHUB_TOKEN, hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository owner
    #[arg(long, global = true, env = ENV_GITHUB_OWNER)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true, env = ENV_GITHUB_REPO)]
    pub repo: Option<String>,

    /// Target branch (default: main)
    #[arg(long, global = true, env = ENV_GITHUB_BRANCH)]
    pub branch: Option<String>,

    /// Drive access token
    #[arg(long, global = true, env = ENV_DRIVE_TOKEN, hide_env_values = true)]
    pub drive_token: Option<String>,

    /// Comma-separated Drive folder names to scan
    #[arg(long, global = true, env = ENV_FOLDER_NAMES)]
    pub folders: Option<String>,

    /// Only files modified within this many hours are synced
    #[arg(long, global = true)]
    pub window_hours: Option<u32>,

    /// Processed entries older than this many days are forgotten
    #[arg(long, global = true)]
    pub retention_days: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = ENV_REQUEST_TIMEOUT)]
    pub timeout_secs: Option<u64>,

    /// Repository directory for transcripts
    #[arg(long, global = true)]
    pub transcript_dir: Option<String>,

    /// Repository directory for audio trigger records
    #[arg(long, global = true)]
    pub audio_trigger_dir: Option<String>,
}

impl SettingsArgs {
    pub fn to_config(&self) -> core_runtime::Result<SyncConfig> {
        let mut builder = SyncConfig::builder();

        if let Some(token) = &self.github_token {
            builder = builder.github_token(token.clone());
        }
        if let Some(owner) = &self.owner {
            builder = builder.repo_owner(owner.clone());
        }
        if let Some(repo) = &self.repo {
            builder = builder.repo_name(repo.clone());
        }
        if let Some(branch) = self.branch.as_ref().filter(|b| !b.trim().is_empty()) {
            builder = builder.branch(branch.clone());
        }
        if let Some(token) = &self.drive_token {
            builder = builder.drive_token(token.clone());
        }
        if let Some(folders) = self.folders.as_ref().filter(|f| !f.trim().is_empty()) {
            builder = builder.folder_names(parse_folder_names(folders));
        }
        if let Some(hours) = self.window_hours {
            builder = builder.eligibility_window_hours(hours);
        }
        if let Some(days) = self.retention_days {
            builder = builder.retention_days(days);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(dir) = &self.transcript_dir {
            builder = builder.transcript_dir(dir.clone());
        }
        if let Some(dir) = &self.audio_trigger_dir {
            builder = builder.audio_trigger_dir(dir.clone());
        }

        builder.build()
    }

    /// Settings for `fetch-recording`: the Drive token and timeout only.
    pub fn to_fetch_config(&self) -> core_runtime::Result<FetchConfig> {
        FetchConfig::new(
            self.drive_token.clone().unwrap_or_default(),
            self.timeout_secs.map(Duration::from_secs),
        )
    }
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        let mut config = LoggingConfig::default().with_level(self.log_level);
        if let Some(format) = self.log_format {
            config = config.with_format(format.into());
        }
        if let Some(filter) = &self.log_filter {
            config = config.with_filter(filter.clone());
        }
        config
    }

    pub fn state_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.state_db {
            return Ok(path.clone());
        }

        dirs::data_dir()
            .map(|dir| dir.join("meeting-sync").join(STATE_DB_FILE))
            .ok_or_else(|| anyhow!("No platform data directory found; pass --state-db"))
    }
}
