//! # rocket-core: Pure Cart Logic for Rocket Cart
//!
//! This crate is the **heart** of Rocket Cart. It holds the cart state machine
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rocket Cart Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI / CLI                          │   │
//! │  │    cart ──► add_product ──► remove_product ──► update_amount    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rocket-cart (CartEngine)                     │   │
//! │  │    stock lookups, catalog lookups, persistence, notices         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rocket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │  notice   │  │ validation│  │   │
//! │  │   │  Product  │  │   Cart    │  │  Notice   │  │  amounts  │  │   │
//! │  │   │   Stock   │  │ CartEntry │  │NoticeKind │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (ProductId, Product, Stock, AmountUpdate)
//! - [`cart`] - Immutable cart snapshots and their transitions
//! - [`error`] - Domain error types
//! - [`notice`] - User-facing notices derived from errors
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rocket_core::{Cart, Product, ProductId, Stock};
//!
//! let id = ProductId::new(1);
//! let stock = Stock::new(id, 5);
//! let product = Product::new(id);
//!
//! let cart = Cart::new().append(product, &stock).unwrap();
//! let cart = cart.increment(id, &stock).unwrap();
//!
//! assert_eq!(cart.get(id).map(|e| e.amount), Some(2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod notice;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry, CartSummary};
pub use error::{CartError, CartOperation, CoreResult, ValidationError};
pub use notice::{Notice, NoticeKind};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the cart snapshot is stored in the durable store.
///
/// The namespace prefix keeps the cart apart from anything else the host
/// application keeps in the same store.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Quantity a product enters the cart with on first addition.
pub const INITIAL_AMOUNT: u32 = 1;
