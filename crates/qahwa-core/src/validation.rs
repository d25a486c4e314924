//! # Validation Module
//!
//! Input validation utilities for Qahwa.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Client (TypeScript)                                          │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store repositories (Rust)                                    │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Domain invariants                                            │
//! │  ├── Non-negative balances and stock                                   │
//! │  └── Ledger checks (points, usage caps)                                │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use qahwa_core::validation::{validate_phone, validate_quantity};
//!
//! // Validate phone before creating a user
//! validate_phone("0501234567").unwrap();
//!
//! // Validate quantity before a cart operation
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::text::BilingualText;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a bilingual text value.
///
/// ## Rules
/// - Both renditions must be non-empty
/// - Each rendition at most 200 characters
///
/// ## Example
/// ```rust
/// use qahwa_core::text::BilingualText;
/// use qahwa_core::validation::validate_bilingual;
///
/// let ok = BilingualText::new("Espresso", "اسبريسو");
/// assert!(validate_bilingual("name", &ok).is_ok());
///
/// let missing_ar = BilingualText::new("Espresso", "");
/// assert!(validate_bilingual("name", &missing_ar).is_err());
/// ```
pub fn validate_bilingual(field: &str, text: &BilingualText) -> ValidationResult<()> {
    if text.en.trim().is_empty() {
        return Err(ValidationError::Required {
            field: format!("{field}.en"),
        });
    }

    if text.ar.trim().is_empty() {
        return Err(ValidationError::Required {
            field: format!("{field}.ar"),
        });
    }

    if text.en.len() > 200 || text.ar.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a user's display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Digits, plus sign, spaces and hyphens only
///
/// ## Example
/// ```rust
/// use qahwa_core::validation::validate_phone;
///
/// assert!(validate_phone("0501234567").is_ok());
/// assert!(validate_phone("+966 50 123 4567").is_ok());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, +, spaces, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a category key.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (99)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  User enters quantity: 2                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 99? → Error: "quantity must be between 1 and 99"       │
/// │       │                                                                 │
/// │       └── OK → Proceed with add_item                                   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in halalas.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items from rewards)
///
/// ## Example
/// ```rust
/// use qahwa_core::validation::validate_price_halalas;
///
/// assert!(validate_price_halalas(1850).is_ok());  // SR 18.50
/// assert!(validate_price_halalas(0).is_ok());     // Free item
/// assert!(validate_price_halalas(-100).is_err()); // Invalid
/// ```
pub fn validate_price_halalas(halalas: i64) -> ValidationResult<()> {
    if halalas < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a loyalty point amount for crediting or pricing a reward.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_points(points: i64) -> ValidationResult<()> {
    if points < 0 {
        return Err(ValidationError::OutOfRange {
            field: "points".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a restock quantity.
///
/// ## Rules
/// - Must be positive (> 0); restocking zero is a no-op mistake
pub fn validate_restock_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "restock quantity".to_string(),
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
    fn test_validate_bilingual() {
        let ok = BilingualText::new("Espresso", "اسبريسو");
        assert!(validate_bilingual("name", &ok).is_ok());

        let missing_en = BilingualText::new("", "اسبريسو");
        assert!(validate_bilingual("name", &missing_en).is_err());

        let missing_ar = BilingualText::new("Espresso", "   ");
        assert!(validate_bilingual("name", &missing_ar).is_err());

        let too_long = BilingualText::new("A".repeat(300), "اسبريسو");
        assert!(validate_bilingual("name", &too_long).is_err());
    }

    #[test]
    fn test_validate_user_name() {
        assert!(validate_user_name("Salem Al-Qahtani").is_ok());
        assert!(validate_user_name("").is_err());
        assert!(validate_user_name("   ").is_err());
        assert!(validate_user_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0501234567").is_ok());
        assert!(validate_phone("+966 50 123 4567").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone(&"1".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(50).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_price_halalas() {
        assert!(validate_price_halalas(0).is_ok());
        assert!(validate_price_halalas(1850).is_ok());
        assert!(validate_price_halalas(-100).is_err());
    }

    #[test]
    fn test_validate_points() {
        assert!(validate_points(0).is_ok());
        assert!(validate_points(250).is_ok());
        assert!(validate_points(-10).is_err());
    }

    #[test]
    fn test_validate_restock_quantity() {
        assert!(validate_restock_quantity(20).is_ok());
        assert!(validate_restock_quantity(0).is_err());
        assert!(validate_restock_quantity(-5).is_err());
    }
}
