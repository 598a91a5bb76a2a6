// ── Core error types ──
//
// User-facing errors from fleetwatch-core. Consumers never see raw
// reqwest errors or JSON parse failures directly; the
// `From<fleetwatch_api::Error>` impl translates gateway-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` because cached fetch failures are memoized and shared with
/// every subscriber of the affected entry.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    /// No session is present. The view router prevents this upstream;
    /// seeing it means a presentation surface bypassed the gate.
    #[error("Not logged in")]
    Unauthenticated,

    /// The server rejected the credential. The session has been cleared
    /// and the view forced back to login by the time this surfaces.
    #[error("Session rejected by server -- please log in again")]
    AuthRejected,

    /// Durable credential storage failed (keyring or file backend).
    #[error("Credential storage error: {message}")]
    Credential { message: String },

    // ── Remote errors ────────────────────────────────────────────────
    /// Network/connectivity failure. Retryable via an explicit refresh.
    #[error("Cannot reach server: {message}")]
    Transport { message: String },

    /// Application-level rejection from the server. Not retried
    /// automatically.
    #[error("Server error (HTTP {status}): {message}")]
    RequestFailed { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if this error forces the unauthenticated state.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected)
    }

    /// Returns `true` if a manual refresh is a sensible recovery.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

// ── Conversion from gateway-layer errors ─────────────────────────────

impl From<fleetwatch_api::Error> for CoreError {
    fn from(err: fleetwatch_api::Error) -> Self {
        match err {
            fleetwatch_api::Error::Unauthenticated => CoreError::Unauthenticated,
            fleetwatch_api::Error::AuthRejected => CoreError::AuthRejected,
            fleetwatch_api::Error::Transport(e) => CoreError::Transport {
                message: e.to_string(),
            },
            fleetwatch_api::Error::Tls(message) => CoreError::Transport { message },
            fleetwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid server URL: {e}"),
            },
            fleetwatch_api::Error::RequestFailed { status, message } => {
                CoreError::RequestFailed { status, message }
            }
            fleetwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("unexpected response shape: {message}"))
            }
        }
    }
}
