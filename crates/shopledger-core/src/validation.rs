//! # Validation Module
//!
//! Input validation utilities for ShopLedger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                          │
//! │                                                                 │
//! │  Layer 1: Outer surface (HTTP body / form)                      │
//! │  ├── Shape validation (deserialization)                         │
//! │  └── Immediate user feedback                                    │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: THIS MODULE - business rule validation,               │
//! │           before any store access                               │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 3: Database (SQLite)                                     │
//! │  ├── NOT NULL / UNIQUE constraints                              │
//! │  ├── CHECK (stock_level >= 0, quantity > 0)                     │
//! │  └── Foreign key constraints                                    │
//! │                                                                 │
//! │  Defense in depth: multiple layers catch different errors       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{BillRequest, BillRequestItem};
use crate::{MAX_BILL_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use shopledger_core::validation::validate_sku;
///
/// assert!(validate_sku("RICE-5KG").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
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

/// Validates a free-text name field (shop name, customer name, username,
/// department).
pub fn validate_person_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a customer mobile number.
///
/// ## Rules
/// - Must not be empty
/// - 6 to 15 characters of digits, with an optional leading `+`
pub fn validate_mobile_number(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();

    if mobile.is_empty() {
        return Err(ValidationError::Required {
            field: "customerMobileNumber".to_string(),
        });
    }

    let digits = mobile.strip_prefix('+').unwrap_or(mobile);
    if digits.len() < 6 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "customerMobileNumber".to_string(),
            reason: "must be 6-15 digits with optional leading +".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
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

/// Validates a price/amount in paise.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items exist)
pub fn validate_price_paise(field: &str, paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Bill Request Validation
// =============================================================================

/// Validates a bill request before any store access.
///
/// Checks shape only; existence, stock sufficiency and total cross-check
/// happen inside the billing transaction where they can see a consistent
/// snapshot.
///
/// ## User Workflow
/// ```text
/// POST /bills body
///      │
///      ▼
/// validate_bill_request ← THIS FUNCTION
///      │
///      ├── empty items? → "items is required"
///      ├── qty <= 0?    → "quantity must be positive"
///      ├── bad mobile?  → "customerMobileNumber has invalid format"
///      │
///      └── OK → billing transaction begins
/// ```
pub fn validate_bill_request(req: &BillRequest) -> ValidationResult<()> {
    validate_person_name("shopId", &req.shop_id)?;
    validate_person_name("customerName", &req.customer_name)?;
    validate_mobile_number(&req.customer_mobile)?;

    if req.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if req.items.len() > MAX_BILL_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_BILL_ITEMS as i64,
        });
    }

    for BillRequestItem { product_id, quantity } in &req.items {
        if product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "items.product".to_string(),
            });
        }
        validate_quantity(*quantity)?;
    }

    validate_price_paise("totalAmount", req.total_amount_paise)?;
    validate_price_paise("amountPaid", req.amount_paid_paise)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    fn sample_request() -> BillRequest {
        BillRequest {
            shop_id: "shop-1".to_string(),
            customer_name: "Asha".to_string(),
            customer_mobile: "9876543210".to_string(),
            items: vec![BillRequestItem {
                product_id: "prod-1".to_string(),
                quantity: 2,
            }],
            total_amount_paise: 1000,
            payment_method: PaymentMethod::Cash,
            amount_paid_paise: 1000,
        }
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("RICE-5KG").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Basmati Rice 5kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_mobile_number() {
        assert!(validate_mobile_number("9876543210").is_ok());
        assert!(validate_mobile_number("+919876543210").is_ok());

        assert!(validate_mobile_number("").is_err());
        assert!(validate_mobile_number("12345").is_err());
        assert!(validate_mobile_number("not-a-number").is_err());
    }

    #[test]
    fn test_validate_price_paise() {
        assert!(validate_price_paise("price", 0).is_ok());
        assert!(validate_price_paise("price", 1099).is_ok());
        assert!(validate_price_paise("price", -100).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_bill_request_ok() {
        assert!(validate_bill_request(&sample_request()).is_ok());
    }

    #[test]
    fn test_validate_bill_request_empty_items() {
        let mut req = sample_request();
        req.items.clear();
        let err = validate_bill_request(&req).unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "items"));
    }

    #[test]
    fn test_validate_bill_request_bad_quantity() {
        let mut req = sample_request();
        req.items[0].quantity = 0;
        assert!(validate_bill_request(&req).is_err());
    }

    #[test]
    fn test_validate_bill_request_missing_customer() {
        let mut req = sample_request();
        req.customer_name = "  ".to_string();
        assert!(validate_bill_request(&req).is_err());
    }
}
