//! # Cart Snapshots
//!
//! The cart as an immutable value. Every transition returns a NEW `Cart`
//! and leaves `self` untouched, so a snapshot handed to the UI or to the
//! store can never change underneath it.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Engine Operation          Transition              Rejections           │
//! │  ────────────────          ──────────              ──────────           │
//! │                                                                         │
//! │  add (present) ──────────► increment(id, stock) ── OutOfStock           │
//! │                                                                         │
//! │  add (absent) ───────────► append(product, stock)  OutOfStock           │
//! │                                                                         │
//! │  update ─────────────────► set_amount(id, n, stock) NotInCart,          │
//! │                                                    OutOfStock           │
//! │                                                                         │
//! │  remove ─────────────────► remove(id) ──────────── NotInCart            │
//! │                                                                         │
//! │  NOTE: a rejected transition returns Err and no new snapshot;           │
//! │        the caller keeps the old one.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CartError, CartOperation, CoreResult, ValidationError};
use crate::types::{Product, ProductId, Stock};
use crate::INITIAL_AMOUNT;

/// A product in the cart plus the selected quantity.
///
/// ## Design Notes
/// - `attributes`: frozen copy of the catalog's display fields at the moment
///   of first addition. Later stock checks never refresh them.
/// - `amount`: always > 0 inside a `Cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,

    pub amount: u32,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CartEntry {
    /// Creates an entry from a catalog record and a quantity.
    ///
    /// The catalog's own `amount` is dropped; the entry carries `amount`.
    pub fn from_product(product: Product, amount: u32) -> Self {
        CartEntry {
            id: product.id,
            amount,
            attributes: product.attributes,
        }
    }

    /// Same entry with a different quantity; every other field is kept.
    fn with_amount(&self, amount: u32) -> Self {
        CartEntry {
            amount,
            ..self.clone()
        }
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Entries are unique by `id`
/// - Every `amount` is > 0
/// - Insertion order is preserved (display order only)
///
/// Deserialization goes through [`Cart::from_entries`], so a stored snapshot
/// that breaks an invariant fails to parse instead of producing a bad cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            entries: Vec::new(),
        }
    }

    /// Builds a cart from entries, enforcing the invariants.
    pub fn from_entries(entries: Vec<CartEntry>) -> Result<Self, ValidationError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.amount == 0 {
                return Err(ValidationError::MustBePositive {
                    field: format!("amount of product {}", entry.id),
                });
            }

            if entries[..index].iter().any(|other| other.id == entry.id) {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: entry.id.to_string(),
                });
            }
        }

        Ok(Cart { entries })
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Adds one unit to an existing entry.
    ///
    /// ## Behavior
    /// - `amount + 1 <= stock.amount`: new snapshot with the incremented entry
    /// - otherwise: `OutOfStock`
    /// - product not in cart: `NotInCart`
    pub fn increment(&self, id: ProductId, stock: &Stock) -> CoreResult<Cart> {
        let entry = self.get(id).ok_or(CartError::NotInCart {
            operation: CartOperation::Add,
            product_id: id,
        })?;

        let requested = entry.amount.saturating_add(1);
        ensure_in_stock(id, requested, stock)?;

        Ok(self.replace_amount(id, requested))
    }

    /// Appends a first-time product with the initial quantity of one.
    ///
    /// Only the single unit being added is checked against stock; the
    /// catalog's default `amount` plays no part in the decision.
    pub fn append(&self, product: Product, stock: &Stock) -> CoreResult<Cart> {
        if self.contains(product.id) {
            return Err(CartError::AlreadyInCart {
                product_id: product.id,
            });
        }

        ensure_in_stock(product.id, INITIAL_AMOUNT, stock)?;

        let mut entries = self.entries.clone();
        entries.push(CartEntry::from_product(product, INITIAL_AMOUNT));
        Ok(Cart { entries })
    }

    /// Sets an entry to an absolute quantity.
    ///
    /// ## Behavior
    /// - product not in cart: `NotInCart`
    /// - `amount > stock.amount`: `OutOfStock`
    /// - otherwise: exactly that entry's amount is replaced
    ///
    /// `amount` is already known to be positive; non-positive requests are
    /// filtered out by [`crate::validation::requested_amount`].
    pub fn set_amount(&self, id: ProductId, amount: u32, stock: &Stock) -> CoreResult<Cart> {
        if !self.contains(id) {
            return Err(CartError::NotInCart {
                operation: CartOperation::Update,
                product_id: id,
            });
        }

        ensure_in_stock(id, amount, stock)?;

        Ok(self.replace_amount(id, amount))
    }

    /// Removes an entry, keeping the others in their original order.
    ///
    /// Removing an absent product is an error, not a no-op: callers only
    /// remove items they believe are present.
    pub fn remove(&self, id: ProductId) -> CoreResult<Cart> {
        if !self.contains(id) {
            return Err(CartError::NotInCart {
                operation: CartOperation::Remove,
                product_id: id,
            });
        }

        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        Ok(Cart { entries })
    }

    fn replace_amount(&self, id: ProductId, amount: u32) -> Cart {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                if entry.id == id {
                    entry.with_amount(amount)
                } else {
                    entry.clone()
                }
            })
            .collect();
        Cart { entries }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Entries in display order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Looks up the entry for a product.
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns true if the product has an entry.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of unique products in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total quantity of all entries.
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.amount)).sum()
    }
}

fn ensure_in_stock(id: ProductId, requested: u32, stock: &Stock) -> CoreResult<()> {
    let requested = i64::from(requested);
    if stock.covers(requested) {
        Ok(())
    } else {
        Err(CartError::OutOfStock {
            product_id: id,
            available: stock.amount,
            requested,
        })
    }
}

impl TryFrom<Vec<CartEntry>> for Cart {
    type Error = ValidationError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        Cart::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

/// Cart size summary for UI badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: usize,
    pub total_quantity: u64,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_product(id: u64) -> Product {
        Product::new(ProductId::new(id))
            .with_attribute("title", format!("Shoe {}", id))
            .with_attribute("price", 139.9)
    }

    fn stock(id: u64, amount: i64) -> Stock {
        Stock::new(ProductId::new(id), amount)
    }

    fn cart_with(ids: &[u64]) -> Cart {
        ids.iter().fold(Cart::new(), |cart, &id| {
            cart.append(test_product(id), &stock(id, 10)).unwrap()
        })
    }

    #[test]
    fn test_append_to_empty_cart() {
        let cart = Cart::new().append(test_product(1), &stock(1, 5)).unwrap();

        assert_eq!(cart.len(), 1);
        let entry = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(entry.amount, 1);
        assert_eq!(entry.attributes.get("title"), Some(&json!("Shoe 1")));
    }

    #[test]
    fn test_append_ignores_catalog_amount() {
        let mut product = test_product(1);
        product.amount = Some(7);

        let cart = Cart::new().append(product, &stock(1, 1)).unwrap();
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_append_without_stock_rejected() {
        let err = Cart::new()
            .append(test_product(1), &stock(1, 0))
            .unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { requested: 1, .. }));
    }

    #[test]
    fn test_append_twice_rejected() {
        let cart = cart_with(&[1]);
        let err = cart.append(test_product(1), &stock(1, 10)).unwrap_err();
        assert!(matches!(err, CartError::AlreadyInCart { .. }));
    }

    #[test]
    fn test_increment_leaves_original_untouched() {
        let cart = cart_with(&[1]);
        let next = cart.increment(ProductId::new(1), &stock(1, 2)).unwrap();

        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
        assert_eq!(next.get(ProductId::new(1)).unwrap().amount, 2);
        assert_eq!(
            next.get(ProductId::new(1)).unwrap().attributes,
            cart.get(ProductId::new(1)).unwrap().attributes
        );
    }

    #[test]
    fn test_increment_beyond_stock_rejected() {
        let cart = cart_with(&[1]);
        let err = cart.increment(ProductId::new(1), &stock(1, 1)).unwrap_err();
        assert_eq!(
            err,
            CartError::OutOfStock {
                product_id: ProductId::new(1),
                available: 1,
                requested: 2,
            }
        );
    }

    #[test]
    fn test_set_amount_is_absolute() {
        let cart = cart_with(&[1, 2]);
        let cart = cart.set_amount(ProductId::new(1), 4, &stock(1, 5)).unwrap();
        let cart = cart.set_amount(ProductId::new(1), 2, &stock(1, 5)).unwrap();

        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 1);
    }

    #[test]
    fn test_set_amount_checks_presence_before_stock() {
        let cart = cart_with(&[1]);
        let err = cart
            .set_amount(ProductId::new(9), 50, &stock(9, 1))
            .unwrap_err();
        assert!(matches!(err, CartError::NotInCart { .. }));
    }

    #[test]
    fn test_remove_preserves_order() {
        let cart = cart_with(&[1, 2, 3]);
        let cart = cart.remove(ProductId::new(2)).unwrap();

        let ids: Vec<u64> = cart.entries().iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_remove_absent_rejected() {
        let cart = cart_with(&[1]);
        let err = cart.remove(ProductId::new(2)).unwrap_err();
        assert_eq!(
            err,
            CartError::NotInCart {
                operation: CartOperation::Remove,
                product_id: ProductId::new(2),
            }
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let cart = cart_with(&[1]);
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            json!([{ "id": 1, "amount": 1, "title": "Shoe 1", "price": 139.9 }])
        );
    }

    #[test]
    fn test_snapshot_rejects_broken_invariants() {
        let zero = json!([{ "id": 1, "amount": 0 }]);
        assert!(serde_json::from_value::<Cart>(zero).is_err());

        let duplicate = json!([{ "id": 1, "amount": 1 }, { "id": 1, "amount": 2 }]);
        assert!(serde_json::from_value::<Cart>(duplicate).is_err());

        let negative = json!([{ "id": 1, "amount": -1 }]);
        assert!(serde_json::from_value::<Cart>(negative).is_err());
    }

    #[test]
    fn test_summary() {
        let cart = cart_with(&[1, 2]);
        let cart = cart.set_amount(ProductId::new(2), 3, &stock(2, 3)).unwrap();

        let summary = CartSummary::from(&cart);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 4);
    }
}
