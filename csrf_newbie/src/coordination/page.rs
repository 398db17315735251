use crate::credentials::{CredentialStore, authenticate};
use crate::session::{Session, SessionError, refresh_csrf_token};

use super::errors::CoordinationError;

/// One-shot message left in the session after a failed login
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed.";

/// Values needed to render the index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub username: Option<String>,
    pub error_message: Option<String>,
    /// Token to embed in the page's forms
    pub csrf_token: String,
    /// Set when a token was issued during this render and the cookie needs updating
    pub new_csrf_token: Option<String>,
}

/// Drain the one-shot error message and make sure the session holds a CSRF token.
pub fn render_index_core(session: &mut Session) -> Result<IndexPage, CoordinationError> {
    let error_message = session.take_error_message();
    let new_csrf_token = refresh_csrf_token(session, false)?;

    let csrf_token = session
        .csrf_token()
        .map(str::to_string)
        .ok_or_else(|| SessionError::CsrfToken("Session has no CSRF token".to_string()))?;

    Ok(IndexPage {
        username: session.username().map(str::to_string),
        error_message,
        csrf_token,
        new_csrf_token,
    })
}

/// Rotate the CSRF token and try to log in. Returns the rotated token.
///
/// A failed login is not an error: it leaves [`LOGIN_FAILED_MESSAGE`] in the session.
pub async fn login_core(
    session: &mut Session,
    credentials: &dyn CredentialStore,
    id: Option<&str>,
    password: Option<&str>,
) -> Result<String, CoordinationError> {
    let next_token = rotate_csrf_token(session)?;

    if !authenticate(credentials, id, password).await? {
        tracing::info!("Login failed");
        session.set_error_message(LOGIN_FAILED_MESSAGE);
        return Ok(next_token);
    }

    tracing::info!("Login succeeded for {:?}", id);
    session.set_username(id.map(str::to_string));
    session.cycle_id()?;
    Ok(next_token)
}

/// Clear the whole session and start over under a new id and token.
pub fn logout_core(session: &mut Session) -> Result<String, CoordinationError> {
    session.clear();
    session.cycle_id()?;
    rotate_csrf_token(session)
}

/// Overwrite the session username. Missing or empty input clears it.
pub fn change_username_core(session: &mut Session, username: Option<String>) {
    let username = username.filter(|name| !name.is_empty());
    tracing::debug!("Changing username to {:?}", username);
    session.set_username(username);
}

fn rotate_csrf_token(session: &mut Session) -> Result<String, CoordinationError> {
    refresh_csrf_token(session, true)?.ok_or_else(|| {
        CoordinationError::from(SessionError::CsrfToken(
            "Forced refresh issued no token".to_string(),
        ))
    })
}
