use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CredentialError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid credential table: {0}")]
    InvalidTable(String),
}
