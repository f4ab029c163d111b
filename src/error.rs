//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by storage, configuration and client construction.
///
/// Store actions never return these to consumers: a failed fetch is recorded
/// as data in a [`Resource`](crate::resource::Resource) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single remote fetch.
///
/// The `Display` output is what ends up in `Resource::Error`, so it is kept
/// short and readable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to fetch: {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_is_readable() {
        assert_eq!(FetchError::Status(404).to_string(), "Failed to fetch: 404");
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
    }
}
