use thiserror::Error;

/// Top-level error type for the `ladle-api` crate.
///
/// Covers transport failures and structured API errors. `ladle-core`
/// maps these into user-facing diagnostics -- consumers of the core
/// crate never see this type directly.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success response. `message` carries the `{ message }` field
    /// of the error body when the service provided one.
    #[error("API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of the failing response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The error message the service included in the response body, if any.
    pub fn body_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
