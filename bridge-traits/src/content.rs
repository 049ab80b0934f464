//! Remote Content Store Abstraction
//!
//! A path-addressed object store where every stored revision carries an
//! opaque version token. Overwriting requires presenting the token most
//! recently observed for the path; the store rejects a write whose token is
//! missing or stale instead of silently replacing newer content.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Object currently stored at a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub path: String,
    /// Token identifying the stored revision
    pub version: String,
}

/// Create-or-replace request
#[derive(Debug, Clone)]
pub struct PutRequest {
    pub path: String,
    /// Human-readable change description
    pub message: String,
    /// Raw payload; transport encoding is the store's concern
    pub content: Bytes,
    /// Version token for an existing object, `None` when the path is believed absent
    pub version: Option<String>,
}

/// Status-classified result of a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new object was created at the path
    Created,
    /// An existing object was replaced
    Updated,
    /// The store answered with any other status, including version conflicts
    Rejected { status: u16, body: String },
}

impl PutOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PutOutcome::Created | PutOutcome::Updated)
    }
}

/// Remote content collaborator
///
/// Transport errors (timeouts, connection failures) are returned as `Err`;
/// anything the store actually answered is an `Ok` outcome.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the object at `path`. Absence is `Ok(None)`.
    async fn fetch(&self, path: &str) -> Result<Option<RemoteObject>>;

    /// Create or replace the object at `request.path`
    async fn put(&self, request: PutRequest) -> Result<PutOutcome>;
}
