use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, header::CONTENT_TYPE};

use csrf_newbie::{CSRF_FORM_FIELD, CSRF_HEADER_NAME, verify_csrf_token};

use crate::session::session_id_from_headers;
use crate::state::AppState;

const MAX_FORM_BYTES: usize = 64 * 1024;

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "Forbidden").into_response()
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
}

fn csrf_token_from_form(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn csrf_token_from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CSRF_HEADER_NAME.as_str())
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}

/// CSRF check for state-changing routes.
///
/// The token comes from the `csrf_token` form field, or from the CSRF header when
/// the field is absent or empty. It must equal the token stored in the caller's
/// session, otherwise the request ends here with 403 and the handler never runs.
/// On success the loaded session is passed on in the request extensions.
pub async fn csrf_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();

    let (form_token, body) = if is_form_urlencoded(&parts.headers) {
        let bytes: Bytes = match axum::body::to_bytes(body, MAX_FORM_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("CSRF protection: unreadable form body: {e}");
                return forbidden();
            }
        };
        (csrf_token_from_form(&bytes), Body::from(bytes))
    } else {
        (None, body)
    };

    let request_token = form_token.or_else(|| csrf_token_from_header(&parts.headers));

    let session_id = session_id_from_headers(&parts.headers);
    let session = match state.sessions.load(session_id.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to load session: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    if session.is_new() {
        tracing::warn!(
            "CSRF protection: rejecting {} {}: no stored session",
            parts.method,
            parts.uri.path()
        );
        return forbidden();
    }

    if let Err(e) = verify_csrf_token(request_token.as_deref(), session.csrf_token()) {
        tracing::warn!(
            "CSRF protection: rejecting {} {}: {}",
            parts.method,
            parts.uri.path(),
            e
        );
        return forbidden();
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(session);
    next.run(req).await
}
