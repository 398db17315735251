use axum::{extract::FromRequestParts, http::StatusCode};
use axum_extra::headers::{Cookie, HeaderMapExt};
use http::{HeaderMap, request::Parts};

use csrf_newbie::{SESSION_COOKIE_NAME, Session};

use crate::error::IntoResponseError;
use crate::state::AppState;

/// The request's server-side session, as an Axum extractor
///
/// Mutating routes receive the session the CSRF guard already loaded; other
/// routes load it from the session cookie, or get a fresh one. Handlers must
/// commit it through [`SessionStore::commit`](csrf_newbie::SessionStore::commit)
/// for changes to persist.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

pub(crate) fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.typed_get::<Cookie>()?;
    let session_id = cookies.get(SESSION_COOKIE_NAME.as_str());
    if session_id.is_none() {
        tracing::debug!("No session cookie '{}' found in cookies", *SESSION_COOKIE_NAME);
    }
    session_id.map(str::to_string)
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.remove::<Session>() {
            return Ok(Self(session));
        }

        let session_id = session_id_from_headers(&parts.headers);
        let session = state
            .sessions
            .load(session_id.as_deref())
            .await
            .into_response_error()?;
        Ok(Self(session))
    }
}
