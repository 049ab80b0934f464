//! # Host Bridge Traits
//!
//! Capability and collaborator contracts shared by the sync engine and its
//! adapters.
//!
//! ## Overview
//!
//! The sync engine never talks to a concrete network library, database or
//! cloud API. Everything it needs from the outside world is expressed as a
//! trait in this crate and injected at startup:
//!
//! ### Host capabilities
//! - [`HttpClient`](http::HttpClient) - Async HTTP with bounded timeouts and a retry policy
//! - [`SettingsStore`](storage::SettingsStore) - Durable key-value properties (holds the processed set)
//! - [`Clock`](time::Clock) - Time source, swapped for a fixed clock in tests
//!
//! ### External collaborators
//! - [`SourceProvider`](storage::SourceProvider) - Folder lookup, file listing and content export
//! - [`ContentStore`](content::ContentStore) - Path-addressed remote store guarded by version tokens
//!
//! ## Error Handling
//!
//! Every trait returns [`BridgeError`](error::BridgeError). Adapters convert
//! their own failures (HTTP transport, SQLite, provider API errors) into it so
//! the engine can treat them uniformly as per-file failures.
//!
//! ## Thread Safety
//!
//! All traits carry `Send + Sync` bounds so implementations can be shared as
//! `Arc<dyn Trait>` across tasks.

pub mod content;
pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use content::{ContentStore, PutOutcome, PutRequest, RemoteObject};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{SettingsStore, SourceFile, SourceFolder, SourceKind, SourceProvider};
pub use time::{Clock, LogLevel, SystemClock};
