//! Per-route flows shared by every web integration
//!
//! Each function works on a loaded [`Session`](crate::Session) and leaves
//! committing it to the caller.

mod errors;
mod page;

pub use errors::CoordinationError;
pub use page::{
    IndexPage, LOGIN_FAILED_MESSAGE, change_username_core, login_core, logout_core,
    render_index_core,
};
