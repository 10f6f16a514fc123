use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad watch parameters, rejected at add-time and never persisted.
    #[error("Invalid watch spec: {0}")]
    InvalidSpec(String),

    /// Transient bar-fetch failure; the watch is retried next tick.
    #[error("Bar fetch failed: {0}")]
    Fetch(String),

    /// Fewer bars than the SMA period needs; retried next tick.
    #[error("Insufficient history: have {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    /// Alert delivery failed after a real crossing was detected.
    #[error("Alert delivery failed: {0}")]
    Notify(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
