//! # Domain Types
//!
//! Wire-level types exchanged with the storefront API and the UI.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ProductId     │   │     Stock       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  u64 (opaque)   │   │  id             │   │  id             │       │
//! │  │                 │   │  amount (i64)   │   │  amount (opt)   │       │
//! │  │                 │   │  (transient)    │   │  attributes...  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  AmountUpdate   │   Input of update_product_amount:                 │
//! │  │  product_id     │   an absolute target quantity, not a delta        │
//! │  │  amount (i64)   │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Verbatim Attributes
//! The catalog owns display fields (title, price, image, ...). They are kept
//! in an untyped map and copied into the cart unchanged, so the cart never
//! needs to know which fields the storefront renders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

// =============================================================================
// Product Identifier
// =============================================================================

/// Opaque, stable product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product identifier from its raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        ProductId(raw)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(raw: u64) -> Self {
        ProductId(raw)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }

        s.parse::<u64>()
            .map(ProductId)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "product_id".to_string(),
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Units currently available for a product.
///
/// Transient: queried from the stock oracle on every mutation and never
/// stored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}

impl Stock {
    /// Creates a stock reading.
    pub const fn new(id: ProductId, amount: i64) -> Self {
        Stock { id, amount }
    }

    /// Returns true if `requested` units fit into the available stock.
    pub fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product record as returned by the catalog.
///
/// ## Wire Format
/// ```json
/// { "id": 1, "title": "Running Shoe", "price": 179.9, "image": "https://..." }
/// ```
/// `amount` is the catalog's declared default quantity and is frequently
/// absent. Every other field lands in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Catalog default quantity (may be absent or zero).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Display fields, kept verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Creates a product with no display attributes.
    pub fn new(id: ProductId) -> Self {
        Product {
            id,
            amount: None,
            attributes: Map::new(),
        }
    }

    /// Adds a display attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Amount Update
// =============================================================================

/// Request to set a cart entry to an absolute quantity.
///
/// `amount` is signed on purpose: UI controls can submit zero or negative
/// values, which the engine ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountUpdate {
    pub product_id: ProductId,
    pub amount: i64,
}

impl AmountUpdate {
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        AmountUpdate { product_id, amount }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
