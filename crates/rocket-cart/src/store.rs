//! # Durable Store
//!
//! The key-value seam the cart snapshot is persisted through.
//!
//! Two implementations ship with the crate:
//! - [`rocket_db::Database`]: SQLite, survives restarts
//! - [`MemoryStore`]: process-local, for embedding and tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rocket_db::Database;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Durable key-value read/write.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Reads `key`. `Ok(None)` means the key was never written.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing the previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DurableStore + ?Sized> DurableStore for Arc<T> {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value).await
    }
}

#[async_trait]
impl DurableStore for Database {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.kv().get(key).await?)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.kv().put(key, value).await?)
    }
}

/// In-memory store.
///
/// Clones share the same map, so a clone kept by a test observes what the
/// engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        MemoryStore {
            values: Arc::new(RwLock::new(values)),
        }
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_db::DbConfig;

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let observer = store.clone();

        store.write("k", "v").await.unwrap();

        assert_eq!(observer.read("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(observer.read("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_database_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.read("@RocketShoes:cart").await.unwrap(), None);
        db.write("@RocketShoes:cart", "[]").await.unwrap();
        assert_eq!(
            db.read("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
