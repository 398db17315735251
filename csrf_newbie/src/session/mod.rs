mod csrf;
mod errors;
mod session;
mod types;

pub use csrf::{csrf_cookie_header, refresh_csrf_token, verify_csrf_token};
pub use errors::SessionError;
pub use session::{Session, SessionStore};
