//! Error types for Cinegrid

use thiserror::Error;

/// Failures talking to the TMDB API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No TMDB API key configured")]
    MissingApiKey,

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => ApiError::Http(status),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

/// Failures reading or writing local storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
