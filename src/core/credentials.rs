//! Token storage and resolution.
//!
//! Tokens are looked up in this order: the `--token` flag, the
//! `STARFETCH_{SERVICE}_TOKEN` environment variable, then the system keyring.

use crate::error::{Result, StarfetchError};

/// Keyring service name every entry is filed under.
pub const KEYRING_SERVICE: &str = "starfetch";

/// Persistent per-service token storage.
pub trait TokenStore {
    /// Stored token for `service`, if any. Read failures count as "no token".
    fn load(&self, service: &str) -> Option<String>;

    /// Store `token` for `service`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::CredentialStore`] if the backend refuses.
    fn save(&self, service: &str, token: &str) -> Result<()>;

    /// Forget the token for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`StarfetchError::CredentialStore`] if the backend refuses.
    fn delete(&self, service: &str) -> Result<()>;
}

/// Tokens in the platform keyring, one entry per service.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(service: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &account_name(service))
            .map_err(|e| StarfetchError::CredentialStore(format!("keyring error: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self, service: &str) -> Option<String> {
        match Self::entry(service).and_then(|entry| {
            entry
                .get_password()
                .map_err(|e| StarfetchError::CredentialStore(e.to_string()))
        }) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::debug!(service, error = %e, "No stored token");
                None
            }
        }
    }

    fn save(&self, service: &str, token: &str) -> Result<()> {
        Self::entry(service)?
            .set_password(token)
            .map_err(|e| StarfetchError::CredentialStore(format!("failed to store token: {e}")))
    }

    fn delete(&self, service: &str) -> Result<()> {
        Self::entry(service)?
            .delete_credential()
            .map_err(|e| StarfetchError::CredentialStore(format!("failed to delete token: {e}")))
    }
}

/// Keyring account for `service`, e.g. `github-token`.
#[must_use]
pub fn account_name(service: &str) -> String {
    format!("{service}-token")
}

/// Environment variable holding a token for `service`, e.g.
/// `STARFETCH_GITHUB_TOKEN`.
#[must_use]
pub fn token_env_var(service: &str) -> String {
    let upper: String = service
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("STARFETCH_{upper}_TOKEN")
}

/// Pick the token to use for `service`.
///
/// # Errors
///
/// Returns [`StarfetchError::CredentialMissing`] if no source has a
/// non-blank token.
pub fn resolve_token(
    service: &str,
    explicit: Option<&str>,
    store: &dyn TokenStore,
) -> Result<String> {
    let non_blank = |token: String| {
        let token = token.trim().to_string();
        (!token.is_empty()).then_some(token)
    };

    if let Some(token) = explicit.map(str::to_string).and_then(non_blank) {
        tracing::debug!(service, source = "flag", "Using token");
        return Ok(token);
    }

    if let Some(token) = std::env::var(token_env_var(service)).ok().and_then(non_blank) {
        tracing::debug!(service, source = "env", "Using token");
        return Ok(token);
    }

    if let Some(token) = store.load(service).and_then(non_blank) {
        tracing::debug!(service, source = "keyring", "Using token");
        return Ok(token);
    }

    Err(StarfetchError::CredentialMissing {
        service: service.to_string(),
    })
}
