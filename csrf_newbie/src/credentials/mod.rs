mod errors;
mod memory;
mod types;

pub use errors::CredentialError;
pub use memory::InMemoryCredentialStore;
pub use types::{CredentialStore, authenticate};
