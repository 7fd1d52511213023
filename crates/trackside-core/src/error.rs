//! # Error Types
//!
//! Domain-specific error types for trackside-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  trackside-core errors (this file)                                     │
//! │  ├── CoreError        - Pricing / domain failures                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  trackside-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (in apps/api)                                             │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity id, field, bounds)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or pricing failures.
/// Inside the sale transaction a catalog miss aborts the whole sale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale line referenced a service id that does not exist.
    ///
    /// ## When This Occurs
    /// - The id was never in the catalog
    /// - The service row was deleted between client load and checkout
    #[error("Service {0} not found")]
    ServiceNotFound(Uuid),

    /// A sale line referenced a package id that does not exist.
    #[error("Package {0} not found")]
    PackageNotFound(Uuid),

    /// A sale line referenced a menu item id that does not exist.
    #[error("Menu item {0} not found")]
    MenuItemNotFound(Uuid),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs, so a rejected
/// request never touches the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Monetary value may not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A sale needs something to sell.
    #[error("At least one service, package, or menu item is required")]
    EmptySale,

    /// Sale has exceeded the maximum line count.
    #[error("Sale cannot have more than {max} lines")]
    SaleTooLarge { max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let id = Uuid::nil();
        let err = CoreError::ServiceNotFound(id);
        assert_eq!(
            err.to_string(),
            "Service 00000000-0000-0000-0000-000000000000 not found"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "payment_method".to_string(),
        };
        assert_eq!(err.to_string(), "payment_method is required");

        let err = ValidationError::EmptySale;
        assert_eq!(
            err.to_string(),
            "At least one service, package, or menu item is required"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptySale;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
