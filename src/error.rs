use thiserror::Error;

/// Errors surfaced by setup code: config, message loading, terminal I/O.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("could not determine the platform config/data directory")]
    NoProjectDirs,

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
