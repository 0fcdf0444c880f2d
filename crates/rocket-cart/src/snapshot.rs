//! # Snapshot Persistence
//!
//! Reads and writes the whole cart as one JSON value under a fixed key.
//!
//! ## Load Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.read(key)                                                       │
//! │       │                                                                 │
//! │       ├── Err(..)              → startup error (store is broken)       │
//! │       ├── Ok(None) / blank     → empty cart (first run)                │
//! │       ├── Ok(unparseable)      → empty cart + warning                  │
//! │       └── Ok(valid snapshot)   → that cart, order preserved            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Unparseable" includes JSON that parses but breaks a cart invariant
//! (duplicate ids, zero amounts): the cart is never rebuilt from bad data.

use std::sync::Arc;

use rocket_core::Cart;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::DurableStore;

/// Cart snapshots in a [`DurableStore`].
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn DurableStore>,
    key: String,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn DurableStore>, key: impl Into<String>) -> Self {
        SnapshotStore {
            store,
            key: key.into(),
        }
    }

    /// The key snapshots are stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the persisted cart, falling back to an empty one.
    pub async fn load(&self) -> Result<Cart, StoreError> {
        let Some(raw) = self.store.read(&self.key).await? else {
            debug!(key = %self.key, "No stored cart, starting empty");
            return Ok(Cart::new());
        };

        if raw.trim().is_empty() {
            debug!(key = %self.key, "Stored cart is blank, starting empty");
            return Ok(Cart::new());
        }

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                debug!(key = %self.key, entries = cart.len(), "Stored cart loaded");
                Ok(cart)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored cart is corrupt, starting empty");
                Ok(Cart::new())
            }
        }
    }

    /// Writes the full snapshot.
    pub async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let raw = serde_json::to_string(cart).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.store.write(&self.key, &raw).await
    }
}
