use http::StatusCode;

use csrf_newbie::{CoordinationError, SessionError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

fn session_error_status(e: &SessionError) -> StatusCode {
    match e {
        SessionError::CsrfToken(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = session_error_status(&e);
            if status.is_server_error() {
                tracing::error!("Session error: {e}");
            }
            (status, e.to_string())
        })
    }
}

impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match &e {
                CoordinationError::Session(inner) => session_error_status(inner),
                CoordinationError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let e = if status.is_server_error() { e.log() } else { e };
            (status, e.to_string())
        })
    }
}

/// Template rendering failures
impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::error!("Template error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    }
}
