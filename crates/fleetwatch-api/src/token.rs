// Process-wide bearer-token slot.
//
// Single writer (login/logout), many readers (every outbound request).
// Lock-free via arc-swap: mutation only happens on discrete user actions,
// never on background activity, so no locking is needed.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;

/// Shared slot holding the current bearer token, if any.
///
/// Cheaply cloneable; all clones observe the same slot. The session owner
/// writes through [`set`](Self::set) / [`clear`](Self::clear); the gateway
/// client reads on every request via [`get`](Self::get).
#[derive(Clone, Default)]
pub struct TokenCell {
    inner: Arc<ArcSwapOption<SecretString>>,
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a token. Replaces any previous value.
    pub fn set(&self, token: SecretString) {
        self.inner.store(Some(Arc::new(token)));
    }

    /// Deactivate the token.
    pub fn clear(&self) {
        self.inner.store(None);
    }

    /// Read the current token, or `None` if no session is active.
    pub fn get(&self) -> Option<Arc<SecretString>> {
        self.inner.load_full()
    }

    /// Whether a token is currently present.
    pub fn is_present(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl std::fmt::Debug for TokenCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCell")
            .field("present", &self.is_present())
            .finish()
    }
}
