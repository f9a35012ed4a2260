//! Error types for platform calls.
//!
//! Registration errors live in `switchboard-framework`, next to the registry
//! and router that raise them.

use thiserror::Error;

/// Errors returned by a [`Platform`](crate::platform::Platform) implementation.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// The client has no live session.
    #[error("platform client is not connected")]
    NotConnected,

    /// The platform rejected the request.
    #[error("platform rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request or response could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for platform calls.
pub type PlatformResult<T> = Result<T, PlatformError>;
