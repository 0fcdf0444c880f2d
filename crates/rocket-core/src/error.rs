//! # Error Types
//!
//! Domain-specific error types for rocket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rocket-core errors (this file)                                        │
//! │  ├── CartError        - Why a cart mutation was rejected               │
//! │  └── ValidationError  - Malformed input or snapshot                    │
//! │                                                                         │
//! │  rocket-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rocket-cart errors (engine crate)                                     │
//! │  ├── ApiError         - Stock / catalog lookup failures                │
//! │  └── EngineError      - Startup failures                               │
//! │                                                                         │
//! │  Flow: ApiError / DbError ─► CartError ─► Notice ─► Notifier           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Every rejected mutation is a `CartError` variant, never a String
//! 2. Root causes from collaborators are flattened into `reason` text:
//!    the UI only distinguishes categories, not causes
//! 3. Each variant maps to exactly one [`Notice`]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notice::Notice;
use crate::types::ProductId;

// =============================================================================
// Cart Operation
// =============================================================================

/// The public cart operations, used to pick the failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    Add,
    Remove,
    Update,
    Clear,
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartOperation::Add => write!(f, "add"),
            CartOperation::Remove => write!(f, "remove"),
            CartOperation::Update => write!(f, "update"),
            CartOperation::Clear => write!(f, "clear"),
        }
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Reasons a cart mutation is rejected.
///
/// A rejected mutation never changes the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Requested quantity exceeds what the stock oracle reports.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart has 5 × product 1, stock says 5
    ///      │
    ///      ▼
    /// update_product_amount(1, 6)
    ///      │
    ///      ▼
    /// OutOfStock { product_id: 1, available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// UI shows: "quantity requested out of stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Remove or update targeted a product that is not in the cart.
    #[error("Product {product_id} is not in the cart ({operation})")]
    NotInCart {
        operation: CartOperation,
        product_id: ProductId,
    },

    /// Append was asked for a product that already has an entry.
    #[error("Product {product_id} is already in the cart")]
    AlreadyInCart { product_id: ProductId },

    /// The stock oracle or product catalog could not answer.
    #[error("Lookup failed during {operation}: {reason}")]
    QueryFailed {
        operation: CartOperation,
        reason: String,
    },

    /// The new snapshot could not be written to the durable store.
    #[error("Could not persist cart during {operation}: {reason}")]
    PersistFailed {
        operation: CartOperation,
        reason: String,
    },
}

impl CartError {
    /// Creates a QueryFailed error from any displayable cause.
    pub fn query_failed(operation: CartOperation, cause: impl fmt::Display) -> Self {
        CartError::QueryFailed {
            operation,
            reason: cause.to_string(),
        }
    }

    /// Creates a PersistFailed error from any displayable cause.
    pub fn persist_failed(operation: CartOperation, cause: impl fmt::Display) -> Self {
        CartError::PersistFailed {
            operation,
            reason: cause.to_string(),
        }
    }

    /// Returns the user-facing notice for this error.
    ///
    /// ## Mapping
    /// ```text
    /// OutOfStock                 → "quantity requested out of stock"
    /// AlreadyInCart              → failure notice of Add
    /// NotInCart / QueryFailed /
    /// PersistFailed              → failure notice of the operation
    /// ```
    pub fn notice(&self) -> Notice {
        match self {
            CartError::OutOfStock { .. } => Notice::out_of_stock(),
            CartError::AlreadyInCart { .. } => Notice::failed(CartOperation::Add),
            CartError::NotInCart { operation, .. }
            | CartError::QueryFailed { operation, .. }
            | CartError::PersistFailed { operation, .. } => Notice::failed(*operation),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for malformed user input (CLI arguments, configuration) and for
/// stored snapshots that break cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., non-numeric identifier, bad URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two cart entries for one product).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CoreResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================
