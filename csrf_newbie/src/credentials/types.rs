use async_trait::async_trait;
use subtle::ConstantTimeEq;

use super::errors::CredentialError;

/// Lookup of the secret registered for a login id.
///
/// Implementations return `Ok(None)` for unknown ids.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    async fn lookup(&self, id: &str) -> Result<Option<String>, CredentialError>;
}

/// Check `password` against the secret stored for `id`.
///
/// Missing or empty fields and unknown ids all fail. The secret comparison runs in constant time.
pub async fn authenticate(
    store: &dyn CredentialStore,
    id: Option<&str>,
    password: Option<&str>,
) -> Result<bool, CredentialError> {
    let (Some(id), Some(password)) = (
        id.filter(|s| !s.is_empty()),
        password.filter(|s| !s.is_empty()),
    ) else {
        tracing::debug!("Login attempt with missing id or password");
        return Ok(false);
    };

    let Some(stored) = store.lookup(id).await? else {
        tracing::debug!("Unknown login id");
        return Ok(false);
    };

    Ok(stored.as_bytes().ct_eq(password.as_bytes()).into())
}
