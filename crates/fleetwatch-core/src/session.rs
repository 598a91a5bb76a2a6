// ── Credential store ──
//
// One session per process: an in-memory token slot shared with the
// gateway client, plus a durable backend so the session survives
// restarts. Mutation happens only on login/logout.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::debug;

use fleetwatch_api::TokenCell;

use crate::error::CoreError;

/// Durable storage for the single opaque session token.
///
/// Implementations: `fleetwatch-config` provides keyring and file-backed
/// stores; [`MemoryTokenStore`] backs tests and throwaway sessions.
pub trait TokenStore: Send + Sync {
    /// Read any previously persisted token.
    fn load(&self) -> Result<Option<SecretString>, CoreError>;
    /// Persist the token.
    fn save(&self, token: &SecretString) -> Result<(), CoreError>;
    /// Remove the persisted token. Removing an absent token is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// The process-wide session.
///
/// Owns the shared [`TokenCell`] (read by every outbound request) and the
/// durable [`TokenStore`]. On `set`/`clear` the in-memory slot is updated
/// first, then the durable write is attempted; a storage failure leaves
/// the running process consistent and only affects restart durability.
pub struct Session {
    cell: TokenCell,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Create a session, loading any persisted token into the slot.
    pub fn new(store: Box<dyn TokenStore>) -> Result<Self, CoreError> {
        let cell = TokenCell::new();
        if let Some(token) = store.load()? {
            debug!("restored persisted session token");
            cell.set(token);
        }
        Ok(Self { cell, store })
    }

    /// A handle to the shared token slot, for wiring into the client.
    pub fn token_cell(&self) -> TokenCell {
        self.cell.clone()
    }

    /// Persist and activate a token.
    pub fn set(&self, token: SecretString) -> Result<(), CoreError> {
        self.cell.set(token.clone());
        self.store.save(&token)
    }

    /// Remove and deactivate the token.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.cell.clear();
        self.store.clear()
    }

    /// The active token, or `None` when logged out.
    pub fn current(&self) -> Option<Arc<SecretString>> {
        self.cell.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cell.is_present()
    }
}

// ── In-memory store ──────────────────────────────────────────────────

/// Token store that never touches disk. For tests and one-shot sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: std::sync::Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with a token, as if persisted by an earlier run.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: std::sync::Mutex::new(Some(SecretString::from(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self
            .token
            .lock()
            .expect("token store mutex poisoned")
            .clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        *self.token.lock().expect("token store mutex poisoned") = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.token.lock().expect("token store mutex poisoned") = None;
        Ok(())
    }
}
