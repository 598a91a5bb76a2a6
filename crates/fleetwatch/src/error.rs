//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fleetwatch_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the dashboard server")]
    #[diagnostic(
        code(fleetwatch::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             Details: {message}"
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not logged in")]
    #[diagnostic(
        code(fleetwatch::auth_required),
        help("Log in first: fleetwatch login --username <name>")
    )]
    AuthRequired,

    #[error("Session rejected by server")]
    #[diagnostic(
        code(fleetwatch::auth_rejected),
        help("The stored token is no longer valid. Log in again: fleetwatch login")
    )]
    AuthRejected,

    #[error("Credential storage error: {message}")]
    #[diagnostic(code(fleetwatch::credential_store))]
    CredentialStore { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(
        code(fleetwatch::not_found),
        help("Run: fleetwatch agents list to see registered agents")
    )]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Server error (HTTP {status}): {message}")]
    #[diagnostic(code(fleetwatch::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation / configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fleetwatch::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(fleetwatch::config))]
    Config(#[from] fleetwatch_config::ConfigError),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("{0}")]
    #[diagnostic(code(fleetwatch::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthRequired | Self::AuthRejected => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(fleetwatch_config::ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthenticated => Self::AuthRequired,
            CoreError::AuthRejected => Self::AuthRejected,
            CoreError::Credential { message } => Self::CredentialStore { message },
            CoreError::Transport { message } => Self::ConnectionFailed { message },
            CoreError::RequestFailed { status: 404, message } => Self::NotFound { message },
            CoreError::RequestFailed { status, message } => Self::ApiError { status, message },
            CoreError::Config { message } => Self::Validation {
                field: "server".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}
