//! Meeting transcript sync.
//!
//! Copies recently created Google Meet transcripts from Drive into a GitHub
//! repository and drops a trigger record for each new recording. Runs are
//! idempotent: a processed-set database remembers what was already written.
//!
//! The engine lives in `core-sync`; this crate only holds the command-line
//! surface and re-exports the service façade for hosts that embed it.

pub mod cli;

pub use core_runtime::config::{FetchConfig, SyncConfig};
pub use core_service::{
    CoreDependencies, MeetingSyncService, RecordingFetcher, Result, ServiceError,
};
pub use core_sync::{FileOutcome, RunSummary, SkipReason};

#[cfg(feature = "desktop-shims")]
pub use core_service::{bootstrap_desktop, bootstrap_fetcher};
