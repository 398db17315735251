use async_trait::async_trait;
use std::collections::HashMap;

use super::errors::CredentialError;
use super::types::CredentialStore;

/// Fixed credential table held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    entry: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: impl Into<String>, password: impl Into<String>) -> Self {
        self.entry.insert(id.into(), password.into());
        self
    }

    /// The three demo accounts: user1/password1, user2/password2, user3/password3
    pub fn demo() -> Self {
        (1..=3).fold(Self::new(), |store, n| {
            store.with_user(format!("user{n}"), format!("password{n}"))
        })
    }

    /// Parse a table written as `id:password,id:password`.
    pub fn parse(table: &str) -> Result<Self, CredentialError> {
        table
            .split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .try_fold(Self::new(), |store, pair| match pair.split_once(':') {
                Some((id, password)) if !id.is_empty() && !password.is_empty() => {
                    Ok(store.with_user(id, password))
                }
                _ => Err(CredentialError::InvalidTable(format!(
                    "expected id:password, got {pair:?}"
                ))),
            })
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(&self, id: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.entry.get(id).cloned())
    }
}
