use thiserror::Error;

/// Failure of a single backend request. Callers degrade it to a status flip or a log line.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
}
