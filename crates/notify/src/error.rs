//! Error types for the event transport.

use thiserror::Error;

/// Errors that can occur when emitting a check event.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Socket connect or write failed
    #[error("I/O error talking to {endpoint}: {source}")]
    Io {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The endpoint did not accept the event in time
    #[error("Timed out after {timeout_ms}ms sending to {endpoint}")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A human interval such as `5m` could not be parsed
    #[error("Bad interval format for {0:?}")]
    InvalidInterval(String),
}
