use chrono::{Duration, Utc};
use http::header::HeaderMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{MAX_SESSION_MAX_AGE, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::session::types::{SessionData, StoredSession};
use crate::storage::{CacheStore, InMemoryCacheStore};
use crate::utils::{gen_random_string, header_set_cookie};

const SESSION_PREFIX: &str = "session";
const SESSION_ID_BYTES: usize = 32;

/// A request's view of its server-side session.
///
/// Changes are local until the session is handed to [`SessionStore::commit`].
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    data: SessionData,
    is_new: bool,
    replaced_id: Option<String>,
}

impl Session {
    fn fresh() -> Result<Self, SessionError> {
        Ok(Self {
            id: gen_random_string(SESSION_ID_BYTES)?,
            data: SessionData::default(),
            is_new: true,
            replaced_id: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when no stored session matched the request
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.data.csrf_token.as_deref()
    }

    pub(super) fn set_csrf_token(&mut self, token: String) {
        self.data.csrf_token = Some(token);
    }

    pub fn username(&self) -> Option<&str> {
        self.data.username.as_deref()
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.data.username = username;
    }

    /// Read the one-shot error message, removing it from the session.
    pub fn take_error_message(&mut self) -> Option<String> {
        self.data.error_message.take()
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.data.error_message = Some(message.into());
    }

    /// Drop every value held by the session, including its CSRF token.
    pub fn clear(&mut self) {
        self.data = SessionData::default();
    }

    /// Move the session to a new id. The record under the old id is deleted on commit.
    pub fn cycle_id(&mut self) -> Result<(), SessionError> {
        let old_id = std::mem::replace(&mut self.id, gen_random_string(SESSION_ID_BYTES)?);
        if !self.is_new && self.replaced_id.is_none() {
            self.replaced_id = Some(old_id);
        }
        Ok(())
    }
}

/// Server-side session storage keyed by the opaque id in the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<Mutex<Box<dyn CacheStore>>>,
    max_age: u64,
}

impl SessionStore {
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        Self::with_max_age(store, *SESSION_COOKIE_MAX_AGE)
    }

    /// Session store with an explicit lifetime in seconds, capped at [`MAX_SESSION_MAX_AGE`]
    pub fn with_max_age(store: Box<dyn CacheStore>, max_age: u64) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            max_age: max_age.min(MAX_SESSION_MAX_AGE),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryCacheStore::new()))
    }

    /// Load the session for `session_id`, or start a fresh one.
    ///
    /// Unknown, expired and unreadable sessions all yield a fresh session with a
    /// newly generated id; a client-chosen id is never adopted.
    pub async fn load(&self, session_id: Option<&str>) -> Result<Session, SessionError> {
        let Some(session_id) = session_id else {
            tracing::debug!("No session cookie, starting new session");
            return Session::fresh();
        };

        let cached = self
            .store
            .lock()
            .await
            .get(SESSION_PREFIX, session_id)
            .await?;

        let Some(cached) = cached else {
            tracing::debug!("Session not found in store, starting new session");
            return Session::fresh();
        };

        let stored: StoredSession = match cached.try_into() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Discarding unreadable session: {e}");
                return Session::fresh();
            }
        };

        if stored.expires_at < Utc::now() {
            tracing::debug!("Session expired at {}", stored.expires_at);
            return Session::fresh();
        }

        Ok(Session {
            id: session_id.to_string(),
            data: stored.data,
            is_new: false,
            replaced_id: None,
        })
    }

    /// Write the session back and return the `Set-Cookie` header for its id.
    pub async fn commit(&self, session: &Session) -> Result<HeaderMap, SessionError> {
        let expires_at = Utc::now() + Duration::seconds(self.max_age as i64);
        let stored = StoredSession {
            data: session.data.clone(),
            expires_at,
            ttl: self.max_age,
        };

        {
            let mut store = self.store.lock().await;
            if let Some(old_id) = &session.replaced_id {
                tracing::debug!("Removing session record under replaced id");
                store.remove(SESSION_PREFIX, old_id).await?;
            }
            store
                .put_with_ttl(
                    SESSION_PREFIX,
                    &session.id,
                    stored.into(),
                    self.max_age as usize,
                )
                .await?;
        }

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            SESSION_COOKIE_NAME.as_str(),
            &session.id,
            Some(self.max_age as i64),
            true,
        )?;

        Ok(headers)
    }
}
