//! # Validation Module
//!
//! Input validation utilities for Trackside POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Route handler (Rust)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (customer phone, sale number)                  │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  A request rejected here has written NOTHING to the database.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::SaleRequest;
use crate::types::{PaymentMethod, TaxRate};
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (customer, service, menu item, track, car...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use trackside_core::validation::validate_name;
///
/// assert_eq!(validate_name("  Racing Track  ", "name").unwrap(), "Racing Track");
/// assert!(validate_name("", "name").is_err());
/// ```
pub fn validate_name(name: &str, field: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

/// Validates a customer phone number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Digits, spaces, `+` and `-` only
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
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
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, + and -".to_string(),
        });
    }

    Ok(phone.to_string())
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

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i32) -> ValidationResult<()> {
    if qty <= 0 || qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
///
/// ## Example
/// ```rust
/// use trackside_core::money::Money;
/// use trackside_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_paise(50000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_paise(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount amount (line-level or header-level).
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_discount(discount: Money, field: &str) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a positive expense amount.
///
/// ## Rules
/// - Must be strictly positive (> 0)
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Café items sit at 0, 500 or 1000 in practice
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() < 0 || rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Sale Request Validator
// =============================================================================

/// Validates a full sale request before anything touches the database.
///
/// ## Rules
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  POST /sales payload                                                    │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_sale_request ← THIS FUNCTION                                 │
/// │       │                                                                 │
/// │       ├── no lines at all?        → EmptySale                          │
/// │       ├── more than 100 lines?    → SaleTooLarge                       │
/// │       ├── payment_method missing? → Required                           │
/// │       ├── any quantity < 1?       → OutOfRange                         │
/// │       ├── any discount < 0?       → MustBeNonNegative                  │
/// │       │                                                                 │
/// │       └── OK → the validated payment method                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Returns
/// The payment method, proven present.
pub fn validate_sale_request(req: &SaleRequest) -> ValidationResult<PaymentMethod> {
    let line_count = req.services.len() + req.packages.len() + req.menu_items.len();

    if line_count == 0 {
        return Err(ValidationError::EmptySale);
    }

    if line_count > MAX_SALE_LINES {
        return Err(ValidationError::SaleTooLarge {
            max: MAX_SALE_LINES,
        });
    }

    let payment_method = req.payment_method.ok_or_else(|| ValidationError::Required {
        field: "payment_method".to_string(),
    })?;

    validate_discount(req.discount_amount, "discount_amount")?;

    for line in &req.services {
        validate_quantity(line.quantity)?;
        validate_discount(line.discount_amount, "services.discount_amount")?;
    }

    for line in &req.packages {
        validate_quantity(line.quantity)?;
        validate_discount(line.discount_amount, "packages.discount_amount")?;
    }

    for line in &req.menu_items {
        validate_quantity(line.quantity)?;
        validate_discount(line.discount_amount, "menu_items.discount_amount")?;
    }

    Ok(payment_method)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{MenuLineRequest, ServiceLineRequest};
    use uuid::Uuid;

    fn minimal_request() -> SaleRequest {
        SaleRequest {
            customer_id: None,
            payment_method: Some(PaymentMethod::Cash),
            discount_amount: Money::zero(),
            notes: None,
            services: vec![ServiceLineRequest {
                service_id: Uuid::new_v4(),
                quantity: 1,
                discount_amount: Money::zero(),
                track_id: None,
                car_id: None,
                duration_minutes: None,
                notes: None,
            }],
            packages: vec![],
            menu_items: vec![],
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Racing Track", "name").unwrap(), "Racing Track");
        assert_eq!(validate_name("  padded  ", "name").unwrap(), "padded");
        assert!(validate_name("", "name").is_err());
        assert!(validate_name("   ", "name").is_err());
        assert!(validate_name(&"A".repeat(300), "name").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("call me maybe").is_err());
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
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_paise(50000)).is_ok());
        assert!(validate_price(Money::from_paise(-1)).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(TaxRate::zero()).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(1000)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(10000)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(10001)).is_err());
        assert!(validate_tax_rate(TaxRate::from_bps(-1)).is_err());
    }

    #[test]
    fn test_sale_request_requires_a_line() {
        let mut req = minimal_request();
        req.services.clear();
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::EmptySale)
        ));
    }

    #[test]
    fn test_sale_request_requires_payment_method() {
        let mut req = minimal_request();
        req.payment_method = None;
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_sale_request_rejects_bad_quantity() {
        let mut req = minimal_request();
        req.services[0].quantity = 0;
        assert!(validate_sale_request(&req).is_err());
    }

    #[test]
    fn test_sale_request_rejects_negative_discount() {
        let mut req = minimal_request();
        req.menu_items.push(MenuLineRequest {
            menu_item_id: Uuid::new_v4(),
            quantity: 1,
            discount_amount: Money::from_paise(-500),
        });
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[test]
    fn test_sale_request_accepts_valid() {
        let method = validate_sale_request(&minimal_request()).unwrap();
        assert_eq!(method, PaymentMethod::Cash);
    }

    #[test]
    fn test_sale_request_line_cap() {
        let mut req = minimal_request();
        for _ in 0..MAX_SALE_LINES {
            req.menu_items.push(MenuLineRequest {
                menu_item_id: Uuid::new_v4(),
                quantity: 1,
                discount_amount: Money::zero(),
            });
        }
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::SaleTooLarge { .. })
        ));
    }
}
