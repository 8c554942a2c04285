//! # Error Types
//!
//! Domain-specific error types for duka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Error Types                              │
//! │                                                                 │
//! │  duka-core errors (this file)                                   │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  duka-db errors (separate crate)                                │
//! │  ├── DbError          - Storage operation failures              │
//! │  └── StoreError       - CoreError + DbError, the checkout       │
//! │                         surface with HTTP status mapping        │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → StoreError → transport     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every failure inside the sale transaction is a typed variant so the
//!    transaction wrapper can abort uniformly

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations detected during the sale
/// workflow. Each variant maps to a well-defined HTTP status at the
/// transport boundary (see `StoreError::status_code` in duka-db).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Requested credit exceeds the customer's remaining limit.
    ///
    /// ## When This Occurs
    /// - `balance_amount > max_credit_limit` at authorization time
    /// - A concurrent sale consumed the limit between read and update
    #[error("Customer {customer_id} is not eligible for credit of {requested} (limit {limit})")]
    CreditDenied {
        customer_id: String,
        requested: i64,
        limit: i64,
    },

    /// Insufficient stock to complete a line item.
    ///
    /// ## When This Occurs
    /// The guarded decrement `stock_qty >= qty` matched no row while the
    /// product exists. Callers must treat this as transaction-aborting.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request doesn't meet requirements.
/// Used for early validation before the transaction opens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Collection has too many entries.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
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
        let err = CoreError::CreditDenied {
            customer_id: "c-1".to_string(),
            requested: 150,
            limit: 100,
        };
        assert_eq!(
            err.to_string(),
            "Customer c-1 is not eligible for credit of 150 (limit 100)"
        );

        let err = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product p-1: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customerId".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
