use crate::common::MockBrowser;
use csrf_newbie_axum::{CSRF_COOKIE_NAME, CSRF_FORM_FIELD, SESSION_COOKIE_NAME};
use http::StatusCode;

/// Tests for the login / logout / username flows across requests
#[tokio::test]
async fn test_login_success() {
    let mut browser = MockBrowser::new();
    let token_before = browser.fetch_token().await;

    let response = browser.login("user1", "password1").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(browser.stored_username().await.as_deref(), Some("user1"));

    // The CSRF cookie carries the rotated token
    let cookies = response.set_cookie_names();
    assert!(cookies.contains(&CSRF_COOKIE_NAME.to_string()));
    assert!(cookies.contains(&SESSION_COOKIE_NAME.to_string()));
    assert_ne!(browser.csrf_cookie(), Some(token_before.as_str()));
    assert_eq!(browser.csrf_cookie(), browser.stored_csrf_token().await.as_deref());

    let page = browser.get("/").await;
    assert!(page.body.contains("user1"));
    assert!(page.body.contains("action=\"/logout\""));
}

#[tokio::test]
async fn test_login_cycles_session_id() {
    let mut browser = MockBrowser::new();
    browser.fetch_token().await;
    let anonymous_id = browser.session_id().unwrap().to_string();

    browser.login("user2", "password2").await;

    let authenticated_id = browser.session_id().unwrap().to_string();
    assert_ne!(anonymous_id, authenticated_id);

    // The pre-login id no longer resolves to a stored session
    let old = browser
        .state()
        .sessions
        .load(Some(anonymous_id.as_str()))
        .await
        .unwrap();
    assert!(old.is_new());
}

#[tokio::test]
async fn test_login_failure_shows_error_once() {
    // Given a failed login
    let mut browser = MockBrowser::new();
    let token_before = browser.fetch_token().await;
    let response = browser.login("user1", "wrong-password").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    assert!(browser.stored_username().await.is_none());
    // The token is rotated even though the login failed
    assert_ne!(browser.csrf_cookie(), Some(token_before.as_str()));

    // When the page is loaded twice
    let first = browser.get("/").await;
    let second = browser.get("/").await;

    // Then the error shows exactly once
    assert!(first.body.contains("Login failed."));
    assert!(!second.body.contains("Login failed."));
    assert!(second.body.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_login_unknown_user_fails() {
    let mut browser = MockBrowser::new();
    browser.login("mallory", "password1").await;

    assert!(browser.stored_username().await.is_none());
    assert!(browser.get("/").await.body.contains("Login failed."));
}

#[tokio::test]
async fn test_login_with_missing_fields_fails() {
    let mut browser = MockBrowser::new();
    let token = browser.fetch_token().await;

    let response = browser
        .post_form("/login", &[(CSRF_FORM_FIELD, token.as_str())])
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(browser.stored_username().await.is_none());
    assert!(browser.get("/").await.body.contains("Login failed."));
}

#[tokio::test]
async fn test_logout_clears_session_and_rotates_token() {
    // Given a logged-in browser
    let mut browser = MockBrowser::new();
    browser.login("user1", "password1").await;
    let token_before_logout = browser.fetch_token().await;
    let id_before_logout = browser.session_id().unwrap().to_string();

    // When logging out
    let response = browser
        .post_form("/logout", &[(CSRF_FORM_FIELD, token_before_logout.as_str())])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    // Then the page shows no user and a fresh token
    let page = browser.get("/").await;
    let token_after_logout = page.page_csrf_token().unwrap();
    assert!(!page.body.contains("user1"));
    assert!(page.body.contains("action=\"/login\""));
    assert_ne!(token_after_logout, token_before_logout);
    assert_eq!(browser.csrf_cookie(), Some(token_after_logout.as_str()));
    assert_ne!(browser.session_id(), Some(id_before_logout.as_str()));
    assert!(browser.stored_username().await.is_none());
}

#[tokio::test]
async fn test_change_username() {
    let mut browser = MockBrowser::new();
    browser.login("user1", "password1").await;
    let token = browser.fetch_token().await;

    let response = browser
        .post_form(
            "/username",
            &[("username", "captain"), (CSRF_FORM_FIELD, token.as_str())],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    // Changing the username does not rotate the token
    assert_eq!(browser.fetch_token().await, token);
    assert!(browser.get("/").await.body.contains("captain"));
}

#[tokio::test]
async fn test_change_username_without_value_clears_it() {
    let mut browser = MockBrowser::new();
    browser.login("user1", "password1").await;
    let token = browser.fetch_token().await;

    browser
        .post_form("/username", &[(CSRF_FORM_FIELD, token.as_str())])
        .await;

    assert!(browser.stored_username().await.is_none());
}

#[tokio::test]
async fn test_username_is_html_escaped() {
    let mut browser = MockBrowser::new();
    browser.login("user1", "password1").await;
    let token = browser.fetch_token().await;

    browser
        .post_form(
            "/username",
            &[
                ("username", "<img src=x onerror=alert(1)>"),
                (CSRF_FORM_FIELD, token.as_str()),
            ],
        )
        .await;

    let page = browser.get("/").await;
    assert!(!page.body.contains("<img src=x"));
    assert!(page.body.contains("&lt;img"));
}
