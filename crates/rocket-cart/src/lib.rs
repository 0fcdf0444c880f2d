//! # rocket-cart: Cart Engine for Rocket Cart
//!
//! This crate owns the storefront cart: it validates every change against
//! the stock oracle, persists each committed snapshot, and reports failures
//! to a notification sink.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Engine Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    CartEngine (shared by Arc)                    │  │
//! │  │                                                                  │  │
//! │  │  add_product / remove_product / update_product_amount / clear   │  │
//! │  │  → CartOutcome::{Committed, Rejected, Ignored}                  │  │
//! │  └────────┬───────────────────────┬─────────────────────┬──────────┘  │
//! │           ▼                       ▼                     ▼              │
//! │  ┌────────────────┐  ┌────────────────────────┐  ┌──────────────┐     │
//! │  │ StockOracle    │  │ SnapshotStore          │  │ Notifier     │     │
//! │  │ ProductCatalog │  │                        │  │              │     │
//! │  │                │  │ DurableStore seam:     │  │ Tracing /    │     │
//! │  │ ApiClient      │  │ SQLite (rocket-db) or  │  │ Channel /    │     │
//! │  │ (reqwest)      │  │ MemoryStore            │  │ closure      │     │
//! │  └────────────────┘  └────────────────────────┘  └──────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - Stock oracle / product catalog seams and the HTTP client
//! - [`config`] - TOML + environment configuration
//! - [`engine`] - `CartEngine`, its builder and `CartOutcome`
//! - [`error`] - API, store and engine error types
//! - [`notify`] - Notification sinks
//! - [`snapshot`] - Snapshot load/save under the storage key
//! - [`store`] - Durable key-value seam
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rocket_cart::{ApiClient, CartConfig, CartEngine};
//! use rocket_db::{Database, DbConfig};
//!
//! let config = CartConfig::load(None)?;
//! let db = Database::new(DbConfig::new("cart.db")).await?;
//! let api = ApiClient::new(&config.api.base_url, config.api_timeout())?;
//!
//! let engine = CartEngine::builder()
//!     .api(api)
//!     .store(db)
//!     .storage_key(config.storage.storage_key.clone())
//!     .open()
//!     .await?;
//!
//! engine.add_product(ProductId::new(1)).await;
//! println!("{} items", engine.summary().item_count);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{ApiClient, ProductCatalog, StockOracle};
pub use config::{ApiSettings, CartConfig, StorageSettings};
pub use engine::{CartEngine, CartEngineBuilder, CartOutcome};
pub use error::{ApiError, EngineError, EngineResult, StoreError};
pub use notify::{ChannelNotifier, Notifier, TracingNotifier};
pub use snapshot::SnapshotStore;
pub use store::{DurableStore, MemoryStore};
