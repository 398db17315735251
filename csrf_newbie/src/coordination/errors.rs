//! Error types for the coordination layer

use thiserror::Error;

use crate::credentials::CredentialError;
use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Error from session operations
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the credential lookup
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl CoordinationError {
    /// Log the error and return self, for use in `map_err` chains
    pub fn log(self) -> Self {
        tracing::error!("{}", self);
        self
    }
}
