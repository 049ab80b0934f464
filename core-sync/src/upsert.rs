//! # Remote Upsert Client
//!
//! Create-or-replace against a [`ContentStore`] guarded by version tokens:
//!
//! 1. Fetch the object at the path to learn its current version token.
//!    Absence is not an error.
//! 2. Write with that token, or without one if the path was absent.
//! 3. Only `Created` and `Updated` count as success.
//!
//! A rejected write (stale or missing token, permissions, validation) is
//! logged and returned as-is. It is never retried here; the next scheduled
//! run re-reads the token and tries again.

use bridge_traits::content::{ContentStore, PutOutcome, PutRequest};
use bridge_traits::error::Result;
use bytes::Bytes;
use core_runtime::logging::{truncate_for_log, DEFAULT_BODY_LOG_LIMIT};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct RemoteUpsertClient {
    store: Arc<dyn ContentStore>,
}

impl RemoteUpsertClient {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Write `content` to `path`, replacing whatever revision is current.
    ///
    /// Transport failures are `Err`; any answered status is an `Ok` outcome.
    pub async fn upsert(&self, path: &str, message: &str, content: Bytes) -> Result<PutOutcome> {
        let version = self.store.fetch(path).await?.map(|object| object.version);

        debug!(path, has_version = version.is_some(), bytes = content.len(), "Writing remote object");

        let outcome = self
            .store
            .put(PutRequest {
                path: path.to_string(),
                message: message.to_string(),
                content,
                version,
            })
            .await?;

        if let PutOutcome::Rejected { status, body } = &outcome {
            warn!(
                path,
                status,
                body = %truncate_for_log(body, DEFAULT_BODY_LOG_LIMIT),
                "Remote write rejected"
            );
        }

        Ok(outcome)
    }
}
