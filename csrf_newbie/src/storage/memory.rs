use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::errors::StorageError;
use super::types::{CacheData, CacheStore};

const CACHE_PREFIX: &str = "cache";

struct Entry {
    data: CacheData,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local cache store. Expired entries are purged on every write.
pub struct InMemoryCacheStore {
    entry: HashMap<String, Entry>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory generic cache store");
        Self {
            entry: HashMap::new(),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        let now = Instant::now();
        let before = self.entry.len();
        self.entry.retain(|_, e| e.is_live(now));
        let purged = before - self.entry.len();
        if purged > 0 {
            tracing::debug!("Purged {purged} expired cache entries");
        }

        let key = Self::make_key(prefix, key);
        self.entry.insert(
            key,
            Entry {
                data: value,
                expires_at: now + Duration::from_secs(ttl as u64),
            },
        );
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        Ok(self
            .entry
            .get(&key)
            .filter(|e| e.is_live(Instant::now()))
            .map(|e| e.data.clone()))
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.remove(&key);
        Ok(())
    }
}
