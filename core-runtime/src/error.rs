//! Startup errors: bad settings or a host that did not provide a bridge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A setting is missing or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required bridge implementation was not injected
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

impl Error {
    pub fn capability_missing(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CapabilityMissing {
            capability: capability.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
