use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Failures local to a single connection. None of these ever reach the
/// opponent; the session that hits one is torn down and cleaned up.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("Failed to encode control message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Connection closed")]
    Closed,
}
