use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid resource URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] reqwest::Error),

    #[error("Resource not found: '{0}'")]
    NotFound(PathBuf),

    #[error("Failed to read '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    // Resource paths are derived from station ids, so a bad id must not escape the data root
    #[error("Refusing to resolve '{0}' outside the data root")]
    OutsideRoot(String),
}

impl TransportError {
    /// Whether the resource is simply absent (HTTP 404 or a missing file).
    ///
    /// Missing datasets are an expected condition and are logged more quietly.
    pub fn is_not_found(&self) -> bool {
        match self {
            TransportError::NotFound(_) => true,
            TransportError::HttpStatus { status, .. } => *status == reqwest::StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}
