//! Axum integration for csrf_newbie
//!
//! Mounts the four demo routes, guards the mutating ones with a CSRF check and
//! renders the single page with askama.

mod error;
mod middleware;
mod pages;
mod router;
mod session;
mod state;

pub use error::IntoResponseError;
pub use middleware::csrf_guard;
pub use router::{csrf_newbie_router, csrf_newbie_router_no_trace};
pub use session::CurrentSession;
pub use state::AppState;

// Re-export the pieces of the core crate applications configure
pub use csrf_newbie::{
    COOKIE_SECURE, CSRF_COOKIE_NAME, CSRF_FORM_FIELD, CSRF_HEADER_NAME, CredentialStore,
    InMemoryCredentialStore, SESSION_COOKIE_NAME, SessionStore,
};
