use askama::Template;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use http::HeaderMap;
use serde::Deserialize;

use csrf_newbie::{
    CSRF_COOKIE_NAME, CSRF_FORM_FIELD, CSRF_HEADER_NAME, change_username_core,
    csrf_cookie_header, login_core, logout_core, render_index_core,
};

use crate::error::IntoResponseError;
use crate::session::CurrentSession;
use crate::state::AppState;

const REDIRECT_TARGET: &str = "/";

#[derive(Template)]
#[template(path = "app.html")]
struct AppTemplate<'a> {
    username: Option<&'a str>,
    error_message: Option<&'a str>,
    csrf_token: &'a str,
    csrf_field: &'a str,
    csrf_cookie: &'a str,
    csrf_header: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginForm {
    id: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UsernameForm {
    username: Option<String>,
}

/// Fields of a form body, or none at all when the token came in the header
/// and the request carries no urlencoded body.
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!("No form fields in request: {e}");
            T::default()
        }
    }
}

fn append_headers(headers: &mut HeaderMap, other: HeaderMap) {
    other.iter().for_each(|(key, value)| {
        headers.append(key, value.clone());
    });
}

async fn commit_with_csrf_cookie(
    state: &AppState,
    session: &csrf_newbie::Session,
    csrf_token: Option<&str>,
) -> Result<HeaderMap, (StatusCode, String)> {
    let mut headers = state.sessions.commit(session).await.into_response_error()?;
    if let Some(token) = csrf_token {
        append_headers(&mut headers, csrf_cookie_header(token).into_response_error()?);
    }
    Ok(headers)
}

pub(crate) async fn index(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
) -> Result<Response, (StatusCode, String)> {
    let page = render_index_core(&mut session).into_response_error()?;

    let template = AppTemplate {
        username: page.username.as_deref(),
        error_message: page.error_message.as_deref(),
        csrf_token: &page.csrf_token,
        csrf_field: CSRF_FORM_FIELD,
        csrf_cookie: CSRF_COOKIE_NAME.as_str(),
        csrf_header: CSRF_HEADER_NAME.as_str(),
    };
    let html = Html(template.render().into_response_error()?);

    let headers =
        commit_with_csrf_cookie(&state, &session, page.new_csrf_token.as_deref()).await?;
    Ok((headers, html).into_response())
}

pub(crate) async fn login(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    let form = form_or_default(form);
    let next_token = login_core(
        &mut session,
        state.credentials.as_ref(),
        form.id.as_deref(),
        form.password.as_deref(),
    )
    .await
    .into_response_error()?;

    let headers = commit_with_csrf_cookie(&state, &session, Some(&next_token)).await?;
    Ok((headers, Redirect::to(REDIRECT_TARGET)).into_response())
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
) -> Result<Response, (StatusCode, String)> {
    let next_token = logout_core(&mut session).into_response_error()?;

    let headers = commit_with_csrf_cookie(&state, &session, Some(&next_token)).await?;
    Ok((headers, Redirect::to(REDIRECT_TARGET)).into_response())
}

pub(crate) async fn change_username(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
    form: Result<Form<UsernameForm>, FormRejection>,
) -> Result<Response, (StatusCode, String)> {
    let form = form_or_default(form);
    change_username_core(&mut session, form.username);

    let headers = commit_with_csrf_cookie(&state, &session, None).await?;
    Ok((headers, Redirect::to(REDIRECT_TARGET)).into_response())
}
