use thiserror::Error;

/// Top-level error type for the `fleetwatch-api` crate.
///
/// Covers every failure mode of the gateway client: missing session,
/// rejected credentials, transport faults, and application-level rejections.
/// `fleetwatch-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// No session token is present. Checked before any network I/O;
    /// the view router should prevent this upstream.
    #[error("No active session -- login required")]
    Unauthenticated,

    /// The server rejected the credential (401/403). The caller must
    /// force a logout on this.
    #[error("Credential rejected by server -- re-authentication required")]
    AuthRejected,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Application ─────────────────────────────────────────────────
    /// Non-2xx response outside the auth-rejection class.
    #[error("Request failed (HTTP {status}): {message}")]
    RequestFailed { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error must force a transition back to the
    /// unauthenticated state.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected)
    }

    /// Returns `true` if this is a connectivity failure that a manual
    /// refresh might resolve.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RequestFailed { status: 404, .. })
    }
}
