//! # Validation Module
//!
//! Input validation utilities for Rocket Cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI controls / CLI arguments                                  │
//! │  └── Type validation (parsing ProductId, amounts)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: CartEngine                                                   │
//! │  └── THIS MODULE: amount guard, config values                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart snapshot                                                │
//! │  └── Cart::from_entries (unique ids, positive amounts)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Turns a requested absolute amount into a cart quantity.
///
/// ## Rules
/// - `<= 0`: `None`. The engine treats this as a silent no-op, guarding
///   against accidental zero/negative submissions from UI controls.
/// - larger than `u32::MAX`: clamped; the stock check rejects it anyway.
///
/// ## Example
/// ```rust
/// use rocket_core::validation::requested_amount;
///
/// assert_eq!(requested_amount(3), Some(3));
/// assert_eq!(requested_amount(0), None);
/// assert_eq!(requested_amount(-3), None);
/// ```
pub fn requested_amount(amount: i64) -> Option<u32> {
    if amount <= 0 {
        return None;
    }
    Some(u32::try_from(amount).unwrap_or(u32::MAX))
}

/// Validates the key the cart snapshot is stored under.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 255 characters
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "storage_key".to_string(),
        });
    }

    if key.len() > 255 {
        return Err(ValidationError::OutOfRange {
            field: "storage_key length".to_string(),
            min: 1,
            max: 255,
        });
    }

    Ok(())
}

/// Validates a timeout expressed in whole seconds.
///
/// ## Rules
/// - Between 1 and 300 seconds
pub fn validate_timeout_secs(secs: u64) -> ValidationResult<()> {
    if secs == 0 {
        return Err(ValidationError::MustBePositive {
            field: "timeout_secs".to_string(),
        });
    }

    if secs > 300 {
        return Err(ValidationError::OutOfRange {
            field: "timeout_secs".to_string(),
            min: 1,
            max: 300,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_amount() {
        assert_eq!(requested_amount(1), Some(1));
        assert_eq!(requested_amount(0), None);
        assert_eq!(requested_amount(-3), None);
        assert_eq!(requested_amount(i64::MAX), Some(u32::MAX));
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("@RocketShoes:cart").is_ok());
        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key("   ").is_err());
        assert!(validate_storage_key(&"k".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_timeout_secs() {
        assert!(validate_timeout_secs(10).is_ok());
        assert!(validate_timeout_secs(0).is_err());
        assert!(validate_timeout_secs(301).is_err());
    }
}
