use http::header::HeaderMap;
use subtle::ConstantTimeEq;

use crate::config::CSRF_COOKIE_NAME;
use crate::session::errors::SessionError;
use crate::utils::{gen_random_string, header_set_cookie};

use super::session::Session;

const CSRF_TOKEN_BYTES: usize = 32;

/// Issue a CSRF token when `force` is set or the session has none yet.
///
/// Returns the new token so the caller can mirror it into the CSRF cookie, or
/// `None` when the existing token stays in place.
pub fn refresh_csrf_token(
    session: &mut Session,
    force: bool,
) -> Result<Option<String>, SessionError> {
    if !force && session.csrf_token().is_some() {
        return Ok(None);
    }

    let token = gen_random_string(CSRF_TOKEN_BYTES)?;
    session.set_csrf_token(token.clone());
    tracing::debug!(force, "Issued new CSRF token");
    Ok(Some(token))
}

/// Check the token a client sent against the one stored in its session.
///
/// Both must be present and non-empty. The comparison runs in constant time.
pub fn verify_csrf_token(
    request_token: Option<&str>,
    session_token: Option<&str>,
) -> Result<(), SessionError> {
    let Some(request_token) = request_token.filter(|t| !t.is_empty()) else {
        return Err(SessionError::CsrfToken("No CSRF token found".to_string()));
    };
    let Some(session_token) = session_token.filter(|t| !t.is_empty()) else {
        return Err(SessionError::CsrfToken(
            "No CSRF token in session".to_string(),
        ));
    };

    if request_token
        .as_bytes()
        .ct_eq(session_token.as_bytes())
        .into()
    {
        Ok(())
    } else {
        Err(SessionError::CsrfToken("CSRF token mismatch".to_string()))
    }
}

/// `Set-Cookie` for the script-readable CSRF mirror cookie
pub fn csrf_cookie_header(token: &str) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, CSRF_COOKIE_NAME.as_str(), token, None, false)?;
    Ok(headers)
}
