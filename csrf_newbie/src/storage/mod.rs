mod errors;
mod memory;
mod types;

pub use errors::StorageError;
pub use memory::InMemoryCacheStore;
pub use types::{CacheData, CacheStore};
