//! # Cart Engine
//!
//! Owns the cart snapshot and performs the three storefront mutations
//! (plus `clear`) against the stock oracle, product catalog and store.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Mutation                                   │
//! │                                                                         │
//! │  caller ──► snapshot = engine.cart()          (taken when called)      │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           stock oracle / catalog lookups      (no lock held)           │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           pure transition on snapshot ──► Err(CartError) ──┐           │
//! │                 │ Ok(new cart)                             │           │
//! │                 ▼                                          │           │
//! │           commit: save to store ──► Err ──► PersistFailed ─┤           │
//! │                 │ Ok                                       │           │
//! │                 ▼                                          ▼           │
//! │           publish new Arc<Cart>                 notifier.notify(..)    │
//! │                 │                                          │           │
//! │                 ▼                                          ▼           │
//! │        CartOutcome::Committed               CartOutcome::Rejected      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Race
//! Each call works on the snapshot it saw when it started. Any two
//! overlapping mutations compute from the same snapshot and the later commit
//! replaces the earlier one, so an update can be lost even when they target
//! different products: adding 1 and 2 concurrently can leave only one of them
//! in the cart. The commit step itself is serialized, so the stored snapshot
//! always equals the published one.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use rocket_core::validation::{requested_amount, validate_storage_key};
use rocket_core::{
    AmountUpdate, Cart, CartError, CartOperation, CartSummary, CoreResult, Notice, ProductId,
    CART_STORAGE_KEY,
};

use crate::api::{ApiClient, ProductCatalog, StockOracle};
use crate::error::{EngineError, EngineResult};
use crate::notify::{Notifier, TracingNotifier};
use crate::snapshot::SnapshotStore;
use crate::store::DurableStore;

// =============================================================================
// Outcome
// =============================================================================

/// What a cart operation did.
#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome {
    /// The new snapshot was persisted and published.
    Committed(Arc<Cart>),

    /// Nothing changed; one notice was sent.
    Rejected(CartError),

    /// Nothing changed and nothing was reported (non-positive update amount).
    Ignored,
}

impl CartOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CartOutcome::Committed(_))
    }

    /// Returns the committed snapshot.
    pub fn cart(&self) -> Option<&Arc<Cart>> {
        match self {
            CartOutcome::Committed(cart) => Some(cart),
            _ => None,
        }
    }

    /// Returns the rejection reason.
    pub fn error(&self) -> Option<&CartError> {
        match self {
            CartOutcome::Rejected(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the notice that was sent for this outcome, if any.
    pub fn notice(&self) -> Option<Notice> {
        self.error().map(CartError::notice)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The cart engine.
///
/// Built once per session and shared by `Arc` with everything that reads or
/// mutates the cart.
///
/// ## Example
/// ```rust,no_run
/// use std::time::Duration;
/// use rocket_cart::{ApiClient, CartEngine};
/// use rocket_core::ProductId;
/// use rocket_db::{Database, DbConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::new(DbConfig::new("cart.db")).await?;
/// let api = ApiClient::new("http://localhost:3333", Duration::from_secs(10))?;
///
/// let engine = CartEngine::builder().api(api).store(db).open().await?;
///
/// let outcome = engine.add_product(ProductId::new(1)).await;
/// println!("{:?}", outcome.notice());
/// # Ok(())
/// # }
/// ```
pub struct CartEngine {
    stock: Arc<dyn StockOracle>,
    catalog: Arc<dyn ProductCatalog>,
    snapshots: SnapshotStore,
    notifier: Arc<dyn Notifier>,
    cart: RwLock<Arc<Cart>>,
    commit_lock: Mutex<()>,
}

impl CartEngine {
    pub fn builder() -> CartEngineBuilder {
        CartEngineBuilder::default()
    }

    /// Returns the current snapshot.
    pub fn cart(&self) -> Arc<Cart> {
        self.cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns item count and total quantity of the current snapshot.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self.cart().as_ref())
    }

    /// Key the snapshot is persisted under.
    pub fn storage_key(&self) -> &str {
        self.snapshots.key()
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Stock is always queried first; failure rejects with the add notice
    /// - Already in cart: amount + 1, checked against stock
    /// - Not in cart: catalog lookup, then appended with amount 1
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) -> CartOutcome {
        let op = CartOperation::Add;
        let current = self.cart();

        let result = match self.stock.stock(id).await {
            Err(e) => Err(CartError::query_failed(op, e)),
            Ok(stock) => {
                debug!(available = stock.amount, "Stock checked");
                if current.contains(id) {
                    current.increment(id, &stock)
                } else {
                    match self.catalog.product(id).await {
                        Ok(product) => current.append(product, &stock),
                        Err(e) => Err(CartError::query_failed(op, e)),
                    }
                }
            }
        };

        self.settle(op, result).await
    }

    /// Removes a product's entry.
    ///
    /// Removing a product that is not in the cart is an error, not a no-op.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> CartOutcome {
        let result = self.cart().remove(id);
        self.settle(CartOperation::Remove, result).await
    }

    /// Sets a product's amount to an absolute value.
    ///
    /// ## Behavior
    /// - `amount <= 0`: [`CartOutcome::Ignored`], no lookup, no notice
    /// - Stock queried next; failure rejects with the update notice
    /// - Product must already be in the cart
    /// - `amount` must not exceed stock
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: AmountUpdate) -> CartOutcome {
        let op = CartOperation::Update;

        let Some(amount) = requested_amount(update.amount) else {
            debug!("Non-positive amount, ignoring");
            return CartOutcome::Ignored;
        };

        let current = self.cart();
        let result = match self.stock.stock(update.product_id).await {
            Err(e) => Err(CartError::query_failed(op, e)),
            Ok(stock) => {
                debug!(available = stock.amount, "Stock checked");
                current.set_amount(update.product_id, amount, &stock)
            }
        };

        self.settle(op, result).await
    }

    /// Empties the cart.
    #[instrument(skip_all)]
    pub async fn clear(&self) -> CartOutcome {
        self.settle(CartOperation::Clear, Ok(Cart::new())).await
    }

    async fn settle(&self, op: CartOperation, result: CoreResult<Cart>) -> CartOutcome {
        match result {
            Ok(cart) => self.commit(op, cart).await,
            Err(err) => self.reject(err),
        }
    }

    async fn commit(&self, op: CartOperation, cart: Cart) -> CartOutcome {
        let _guard = self.commit_lock.lock().await;

        if let Err(e) = self.snapshots.save(&cart).await {
            error!(operation = %op, error = %e, "Failed to persist cart");
            return self.reject(CartError::persist_failed(op, e));
        }

        let cart = Arc::new(cart);
        *self.cart.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&cart);

        info!(
            operation = %op,
            entries = cart.len(),
            total_quantity = cart.total_quantity(),
            "Cart committed"
        );
        CartOutcome::Committed(cart)
    }

    fn reject(&self, err: CartError) -> CartOutcome {
        let notice = err.notice();
        warn!(error = %err, "Cart operation rejected");
        self.notifier.notify(&notice);
        CartOutcome::Rejected(err)
    }
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("storage_key", &self.snapshots.key())
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`CartEngine`] from its collaborators.
///
/// Stock oracle, product catalog and store are required; the notifier
/// defaults to [`TracingNotifier`] and the key to `"@RocketShoes:cart"`.
#[derive(Default)]
pub struct CartEngineBuilder {
    stock: Option<Arc<dyn StockOracle>>,
    catalog: Option<Arc<dyn ProductCatalog>>,
    store: Option<Arc<dyn DurableStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    storage_key: Option<String>,
}

impl CartEngineBuilder {
    /// Uses one HTTP client as both stock oracle and product catalog.
    pub fn api(mut self, client: ApiClient) -> Self {
        let client = Arc::new(client);
        self.stock = Some(client.clone() as Arc<dyn StockOracle>);
        self.catalog = Some(client as Arc<dyn ProductCatalog>);
        self
    }

    pub fn stock_oracle(mut self, oracle: impl StockOracle + 'static) -> Self {
        self.stock = Some(Arc::new(oracle));
        self
    }

    pub fn product_catalog(mut self, catalog: impl ProductCatalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn store(mut self, store: impl DurableStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Loads the persisted cart and returns the ready engine.
    ///
    /// A missing or corrupt snapshot starts an empty cart; a store that
    /// cannot be read at all is an error.
    pub async fn open(self) -> EngineResult<CartEngine> {
        let stock = self
            .stock
            .ok_or(EngineError::MissingCollaborator("stock oracle"))?;
        let catalog = self
            .catalog
            .ok_or(EngineError::MissingCollaborator("product catalog"))?;
        let store = self
            .store
            .ok_or(EngineError::MissingCollaborator("durable store"))?;

        let key = self
            .storage_key
            .unwrap_or_else(|| CART_STORAGE_KEY.to_string());
        validate_storage_key(&key)?;

        let snapshots = SnapshotStore::new(store, key);
        let cart = snapshots.load().await?;

        info!(
            key = %snapshots.key(),
            entries = cart.len(),
            "Cart engine opened"
        );

        Ok(CartEngine {
            stock,
            catalog,
            snapshots,
            notifier: self
                .notifier
                .unwrap_or_else(|| Arc::new(TracingNotifier)),
            cart: RwLock::new(Arc::new(cart)),
            commit_lock: Mutex::new(()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use rocket_core::{Product, Stock};

    struct FixedStock(i64);

    #[async_trait]
    impl StockOracle for FixedStock {
        async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
            Ok(Stock::new(id, self.0))
        }
    }

    #[async_trait]
    impl ProductCatalog for FixedStock {
        async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
            Ok(Product::new(id))
        }
    }

    async fn engine(stock: i64) -> CartEngine {
        let api = Arc::new(FixedStock(stock));
        CartEngine::builder()
            .stock_oracle(api.clone())
            .product_catalog(api)
            .store(MemoryStore::new())
            .open()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_builder_requires_collaborators() {
        let err = CartEngine::builder()
            .store(MemoryStore::new())
            .open()
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingCollaborator("stock oracle")));

        let err = CartEngine::builder()
            .stock_oracle(FixedStock(1))
            .product_catalog(FixedStock(1))
            .open()
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingCollaborator("durable store")));
    }

    #[tokio::test]
    async fn test_builder_rejects_blank_storage_key() {
        let err = CartEngine::builder()
            .stock_oracle(FixedStock(1))
            .product_catalog(FixedStock(1))
            .store(MemoryStore::new())
            .storage_key("")
            .open()
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_outcome_accessors() {
        let engine = engine(1).await;

        let outcome = engine.add_product(ProductId::new(1)).await;
        assert!(outcome.is_committed());
        assert_eq!(outcome.cart().map(|c| c.len()), Some(1));
        assert_eq!(outcome.notice(), None);
        assert!(Arc::ptr_eq(outcome.cart().unwrap(), &engine.cart()));

        let outcome = engine.add_product(ProductId::new(1)).await;
        assert!(!outcome.is_committed());
        assert_eq!(outcome.notice(), Some(Notice::out_of_stock()));
    }

    #[tokio::test]
    async fn test_ignored_update_keeps_snapshot_identity() {
        let engine = engine(3).await;
        engine.add_product(ProductId::new(1)).await;
        let before = engine.cart();

        let outcome = engine
            .update_product_amount(AmountUpdate::new(ProductId::new(1), 0))
            .await;

        assert_eq!(outcome, CartOutcome::Ignored);
        assert!(Arc::ptr_eq(&before, &engine.cart()));
    }

    #[tokio::test]
    async fn test_summary_and_clear() {
        let engine = engine(5).await;
        engine.add_product(ProductId::new(1)).await;
        engine.add_product(ProductId::new(1)).await;
        engine.add_product(ProductId::new(2)).await;

        let summary = engine.summary();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 3);

        assert!(engine.clear().await.is_committed());
        assert!(engine.cart().is_empty());
    }
}
