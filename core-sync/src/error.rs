use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that abort a whole sync run.
///
/// Problems with a single file never surface here; they become a
/// [`FileOutcome`](crate::outcome::FileOutcome) instead.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Processed-set storage error: {0}")]
    State(String),

    #[error("Stored processed-set under '{key}' is not valid: {reason}")]
    CorruptState { key: String, reason: String },

    #[error("Payload encoding failed: {0}")]
    Encoding(String),
}

impl From<BridgeError> for SyncError {
    fn from(error: BridgeError) -> Self {
        SyncError::State(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
