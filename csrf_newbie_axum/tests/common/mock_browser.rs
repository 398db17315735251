use axum::{Router, body::Body};
use csrf_newbie_axum::{
    AppState, CSRF_COOKIE_NAME, CSRF_FORM_FIELD, InMemoryCredentialStore, SESSION_COOKIE_NAME,
    csrf_newbie_router_no_trace,
};
use http::{
    HeaderMap, Method, Request, StatusCode,
    header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
};
use http_body_util::BodyExt;
use std::collections::HashMap;
use tower::ServiceExt;

/// Response as seen by the mock browser
#[allow(dead_code)]
pub struct PageResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

#[allow(dead_code)]
impl PageResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Names of the cookies this response sets
    pub fn set_cookie_names(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|c| c.split_once('=').map(|(name, _)| name.to_string()))
            .collect()
    }

    /// The CSRF token embedded in the page's forms
    pub fn page_csrf_token(&self) -> Option<String> {
        let marker = format!("name=\"{CSRF_FORM_FIELD}\" value=\"");
        let start = self.body.find(&marker)? + marker.len();
        let len = self.body[start..].find('"')?;
        Some(self.body[start..start + len].to_string())
    }
}

/// Mock browser for integration testing
///
/// Drives the router in-process and keeps the cookies it is given, the way a
/// browser would for a single origin.
pub struct MockBrowser {
    app: Router,
    state: AppState,
    cookies: HashMap<String, String>,
}

#[allow(dead_code)]
impl MockBrowser {
    /// Browser against a fresh app with the demo credential table
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory(InMemoryCredentialStore::demo()))
    }

    /// Browser against an app built from `state`; browsers sharing a state share the server
    pub fn with_state(state: AppState) -> Self {
        Self {
            app: csrf_newbie_router_no_trace(state.clone()),
            state,
            cookies: HashMap::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn csrf_cookie(&self) -> Option<&str> {
        self.cookie(CSRF_COOKIE_NAME.as_str())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.cookie(SESSION_COOKIE_NAME.as_str())
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> PageResponse {
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(COOKIE, cookie_header.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(SET_COOKIE) {
            let cookie = value.to_str().unwrap();
            let pair = cookie.split(';').next().unwrap();
            if let Some((name, value)) = pair.split_once('=') {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        PageResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&mut self, path: &str) -> PageResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> PageResponse {
        self.post_form_with_headers(path, form, &[]).await
    }

    pub async fn post_form_with_headers(
        &mut self,
        path: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> PageResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }

        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// POST without any body, the way a script sending only the CSRF header would
    pub async fn post_empty_with_headers(
        &mut self,
        path: &str,
        headers: &[(&str, &str)],
    ) -> PageResponse {
        let mut builder = Request::builder().method(Method::POST).uri(path);
        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }

        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Load the page and return the token it embeds
    pub async fn fetch_token(&mut self) -> String {
        let page = self.get("/").await;
        assert_eq!(page.status, StatusCode::OK);
        page.page_csrf_token().expect("page should embed a CSRF token")
    }

    pub async fn login(&mut self, id: &str, password: &str) -> PageResponse {
        let token = self.fetch_token().await;
        self.post_form(
            "/login",
            &[("id", id), ("password", password), (CSRF_FORM_FIELD, token.as_str())],
        )
        .await
    }

    /// Username currently stored in this browser's server-side session
    pub async fn stored_username(&self) -> Option<String> {
        let session = self.state.sessions.load(self.session_id()).await.unwrap();
        session.username().map(str::to_string)
    }

    /// CSRF token currently stored in this browser's server-side session
    pub async fn stored_csrf_token(&self) -> Option<String> {
        let session = self.state.sessions.load(self.session_id()).await.unwrap();
        session.csrf_token().map(str::to_string)
    }
}
