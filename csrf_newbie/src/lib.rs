//! csrf_newbie - Session-bound CSRF protection for a small login demo
//!
//! This crate keeps the framework-agnostic parts: the server-side session store,
//! CSRF token issuance and constant-time verification, the credential lookup
//! abstraction, and the per-route "core" flows that web handlers call into.

mod config;
mod coordination;
mod credentials;
mod session;
mod storage;
mod utils;

pub use config::{
    COOKIE_SECURE, CSRF_COOKIE_NAME, CSRF_FORM_FIELD, CSRF_HEADER_NAME, MAX_SESSION_MAX_AGE,
    SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME,
};

pub use coordination::{
    CoordinationError, IndexPage, LOGIN_FAILED_MESSAGE, change_username_core, login_core,
    logout_core, render_index_core,
};

pub use credentials::{CredentialError, CredentialStore, InMemoryCredentialStore, authenticate};

pub use session::{
    Session, SessionError, SessionStore, csrf_cookie_header, refresh_csrf_token,
    verify_csrf_token,
};

pub use storage::{CacheData, CacheStore, InMemoryCacheStore, StorageError};

pub use utils::{UtilError, gen_random_string};
