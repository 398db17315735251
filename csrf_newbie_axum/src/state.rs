use std::sync::Arc;

use csrf_newbie::{CredentialStore, SessionStore};

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(sessions: SessionStore, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            sessions,
            credentials,
        }
    }

    /// State backed by an in-memory session store
    pub fn in_memory(credentials: impl CredentialStore) -> Self {
        Self::new(SessionStore::in_memory(), Arc::new(credentials))
    }
}
