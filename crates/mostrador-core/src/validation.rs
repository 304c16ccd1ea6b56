//! # Validation Module
//!
//! Input validation utilities for Mostrador POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront                                                    │
//! │  └── Basic format checks, immediate user feedback                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Shell command (Rust)                                          │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  └── NOT NULL, UNIQUE, foreign key constraints                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or category name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use mostrador_core::validation::validate_name;
///
/// assert!(validate_name("Café de grano 500g").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (an empty term lists everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "termino".to_string(),
            max: 100,
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// Zero is allowed (free items); negative prices are not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "priceCents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an optional cost in cents. Negative costs are rejected;
/// `None` and zero are allowed (margin simply stays unset).
pub fn validate_cost_cents(cents: Option<i64>) -> ValidationResult<()> {
    if let Some(c) = cents {
        if c < 0 {
            return Err(ValidationError::OutOfRange {
                field: "costCents".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    Ok(())
}

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "cantidad".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Café de grano").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_term() {
        assert_eq!(validate_search_term("  café ").unwrap(), "café");
        assert_eq!(validate_search_term("").unwrap(), "");
        assert!(validate_search_term(&"A".repeat(150)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_cost_cents() {
        assert!(validate_cost_cents(None).is_ok());
        assert!(validate_cost_cents(Some(0)).is_ok());
        assert!(validate_cost_cents(Some(500)).is_ok());
        assert!(validate_cost_cents(Some(-1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }
}
