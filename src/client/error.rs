//! Client library errors.

use thiserror::Error;

/// Errors surfaced by the client synchronizer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL could not be turned into a handshake request.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    /// The credential cannot be carried in an `Authorization` header.
    #[error("invalid credential header")]
    InvalidCredential,

    /// Handshake or frame-level transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("frame encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The connection driver has stopped (after `disconnect` or going offline).
    #[error("client is not running")]
    Closed,
}

impl ClientError {
    /// Whether retrying the same connect could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
