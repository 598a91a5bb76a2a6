// ── Durable token storage ──
//
// Primary backend is the OS keyring; a 0600-permission file under the
// platform data directory serves as fallback on hosts without a usable
// keyring (headless Linux, CI).

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use fleetwatch_core::{CoreError, TokenStore};

const KEYRING_SERVICE: &str = "fleetwatch";
const KEYRING_USER: &str = "dashboard-token";
const TOKEN_FILE_NAME: &str = ".session_token";

fn credential_error(op: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::Credential {
        message: format!("{op}: {err}"),
    }
}

// ── Keyring backend ─────────────────────────────────────────────────

/// Token storage in the OS-native credential store.
pub struct KeyringTokenStore {
    service: String,
    user: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.into(),
            user: KEYRING_USER.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| credential_error("keyring unavailable", e))
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(credential_error("keyring read failed", e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| credential_error("keyring write failed", e))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(credential_error("keyring delete failed", e)),
        }
    }
}

// ── File backend ────────────────────────────────────────────────────

/// Token storage in a plain file restricted to the owner.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Token file under the platform data directory.
    pub fn default_path() -> PathBuf {
        crate::project_dirs().map_or_else(
            || PathBuf::from(TOKEN_FILE_NAME),
            |dirs| dirs.data_dir().join(TOKEN_FILE_NAME),
        )
    }

    #[cfg(unix)]
    fn restrict_permissions(path: &std::path::Path) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &std::path::Path) -> std::io::Result<()> {
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_owned())))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(credential_error("token file read failed", e)),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| credential_error("token dir create failed", e))?;
        }
        std::fs::write(&self.path, token.expose_secret())
            .map_err(|e| credential_error("token file write failed", e))?;
        Self::restrict_permissions(&self.path)
            .map_err(|e| credential_error("token file chmod failed", e))?;
        debug!(path = %self.path.display(), "token written to file store");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(credential_error("token file delete failed", e)),
        }
    }
}

// ── Chained backend ─────────────────────────────────────────────────

/// Keyring-first storage with a file fallback.
///
/// Writes land in the keyring when it works, otherwise in the file.
/// Reads consult the keyring first, then the file, so a token written
/// under either regime is found. Clears scrub both backends.
pub struct DurableTokenStore {
    keyring: KeyringTokenStore,
    file: FileTokenStore,
}

impl DurableTokenStore {
    pub fn new() -> Self {
        Self {
            keyring: KeyringTokenStore::new(),
            file: FileTokenStore::new(FileTokenStore::default_path()),
        }
    }
}

impl Default for DurableTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for DurableTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.keyring.load() {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => self.file.load(),
            Err(e) => {
                debug!(error = %e, "keyring read failed, trying file store");
                self.file.load()
            }
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        match self.keyring.save(token) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "keyring unavailable, storing token in file");
                self.file.save(token)
            }
        }
    }

    fn clear(&self) -> Result<(), CoreError> {
        let keyring_result = self.keyring.clear();
        let file_result = self.file.clear();
        keyring_result.and(file_result)
    }
}

/// The standard durable store used by the CLI.
pub fn default_token_store() -> Box<dyn TokenStore> {
    Box::new(DurableTokenStore::new())
}
