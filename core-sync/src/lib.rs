//! # Meeting Sync Engine
//!
//! Mirrors newly created meeting transcripts and recordings from a source
//! folder into a version-controlled remote store, exactly once each.
//!
//! ## Overview
//!
//! Runs are started on a fixed schedule and may overlap. Each run:
//! - Lists candidate files through a `SourceProvider`
//! - Keeps only files that are recent and not yet processed
//! - Resolves each into text or an audio trigger record
//! - Writes it to a deterministic path through a `ContentStore`, presenting
//!   the current version token so concurrent writers cannot clobber each other
//! - Records the file id as processed once the write succeeded
//!
//! ## Components
//!
//! - **Eligibility** (`eligibility`): processed-set and time-window filter
//! - **Matcher** (`matcher`): pairs recordings with transcripts by name
//! - **Resolver** (`resolver`): per-kind content dispatch
//! - **Remote paths** (`remote_path`): canonical path and commit message
//! - **Upsert** (`upsert`): version-token guarded create-or-replace
//! - **Processed set** (`processed`): durable id → sync time map with pruning
//! - **Outcomes** (`outcome`): per-file results and the run summary
//! - **Coordinator** (`coordinator`): one full sync pass

pub mod coordinator;
pub mod eligibility;
pub mod error;
pub mod matcher;
pub mod outcome;
pub mod processed;
pub mod remote_path;
pub mod resolver;
pub mod upsert;

pub use coordinator::{SyncCoordinator, SyncOptions};
pub use eligibility::{is_eligible, Eligibility};
pub use error::{Result, SyncError};
pub use matcher::{base_name, find_match};
pub use outcome::{FileOutcome, FileReport, RunId, RunSummary, SkipReason};
pub use processed::{ProcessedSet, ProcessedStore};
pub use remote_path::{commit_message, slugify, PathLayout};
pub use resolver::{AudioTrigger, ContentResolver, ResolvedContent};
pub use upsert::RemoteUpsertClient;
