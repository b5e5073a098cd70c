// ── Core error types ──
//
// User-facing errors from ladle-core. Consumers never see HTTP status
// codes or JSON parse failures directly -- the `From<ladle_api::Error>`
// impl translates transport-layer errors into domain variants, and the
// `Api` message prefers the response body's `{ message }` over a
// generic status description.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The operation was superseded or explicitly aborted.
    ///
    /// Never routed through the notifier and never retried; callers
    /// must treat it as a distinguishable non-success, not a failure.
    #[error("operation canceled")]
    Canceled,

    // ── Connection errors ────────────────────────────────────────────
    #[error("cannot reach recipe service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if a response was received).
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("favorites storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for the cancellation outcome, which is never
    /// notified or retried.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ladle_api::Error> for CoreError {
    fn from(err: ladle_api::Error) -> Self {
        match err {
            ladle_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ladle_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            ladle_api::Error::Api { status, message } => CoreError::Api {
                message: message.unwrap_or_else(|| format!("request failed (HTTP {status})")),
                status: Some(status),
            },
            ladle_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
