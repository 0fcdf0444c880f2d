//! # Key-Value Repository
//!
//! Durable string values under namespaced keys.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  put("@RocketShoes:cart", "[...]")                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(key) DO UPDATE  ← single statement, atomic     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Row replaced wholesale (never partially updated)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for key-value rows.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// - `Ok(None)` - the key was never written (first run)
    /// - `Ok(Some(value))` - the last written value
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "kv put");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.kv().get("@RocketShoes:cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_overwrite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        kv.put("@RocketShoes:cart", "[]").await.unwrap();
        kv.put("@RocketShoes:cart", r#"[{"id":1,"amount":1}]"#)
            .await
            .unwrap();

        assert_eq!(
            kv.get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":1}]"#)
        );
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        kv.put("a", "1").await.unwrap();
        kv.put("b", "2").await.unwrap();
        kv.put("a", "3").await.unwrap();

        assert_eq!(kv.get("a").await.unwrap().as_deref(), Some("3"));
        assert_eq!(kv.get("b").await.unwrap().as_deref(), Some("2"));
        assert_eq!(kv.get("c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.kv().put("@RocketShoes:cart", "[]").await.unwrap();
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            db.kv().get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
