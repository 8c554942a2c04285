//! # Validation Module
//!
//! Request validation for the sale workflow.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Validation Layers                           │
//! │                                                                 │
//! │  Layer 1: Deserialization (serde)                               │
//! │  └── Shape and type checks                                      │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: THIS MODULE                                           │
//! │  └── Business rule validation, before the transaction opens     │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 3: Database (SQLite)                                     │
//! │  ├── NOT NULL / UNIQUE / FK constraints                         │
//! │  └── CHECK (stock_qty >= 0), guarded delta updates              │
//! │                                                                 │
//! │  Defense in depth: each layer catches different errors          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewSale, NewSaleItem};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an inbound sale request.
///
/// ## Rules
/// - All monetary totals are non-negative
/// - A credit sale (`balance_amount > 0`) must reference a customer
/// - At most [`MAX_SALE_ITEMS`] line items, each individually valid
///
/// Sufficiency of stock and credit is NOT checked here: those are
/// transactional concerns that only the storage layer can answer
/// race-free.
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    for (field, amount) in [
        ("saleAmount", sale.sale_amount),
        ("balanceAmount", sale.balance_amount),
        ("paidAmount", sale.paid_amount),
    ] {
        if amount < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: field.to_string(),
            });
        }
    }

    if sale.extends_credit() && sale.customer_id.as_deref().unwrap_or("").trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customerId".to_string(),
        });
    }

    if sale.sale_items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::TooMany {
            field: "saleItems".to_string(),
            max: MAX_SALE_ITEMS,
        });
    }

    for item in &sale.sale_items {
        validate_sale_item(item)?;
    }

    Ok(())
}

/// Validates a single line item.
///
/// ## Rules
/// - Product reference present
/// - Quantity between 1 and [`MAX_ITEM_QUANTITY`]
/// - Non-negative price
pub fn validate_sale_item(item: &NewSaleItem) -> ValidationResult<()> {
    if item.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "productId".to_string(),
        });
    }

    if item.qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    if item.qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "qty".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    if item.product_price < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "productPrice".to_string(),
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
    use crate::types::{PaymentMethod, SaleType};

    fn item(qty: i64) -> NewSaleItem {
        NewSaleItem {
            product_id: "p-1".to_string(),
            qty,
            product_price: 500,
            product_name: "Sugar 1kg".to_string(),
            product_image: None,
        }
    }

    fn cash_sale(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            customer_id: None,
            customer_name: None,
            customer_email: None,
            sale_amount: 1000,
            balance_amount: 0,
            paid_amount: 1000,
            sale_type: SaleType::Paid,
            payment_method: PaymentMethod::Cash,
            transaction_code: None,
            shop_id: None,
            sale_items: items,
        }
    }

    #[test]
    fn test_valid_cash_sale() {
        assert!(validate_new_sale(&cash_sale(vec![item(2)])).is_ok());
    }

    #[test]
    fn test_zero_qty_rejected() {
        let err = validate_new_sale(&cash_sale(vec![item(0)])).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));
    }

    #[test]
    fn test_credit_sale_requires_customer() {
        let mut sale = cash_sale(vec![item(1)]);
        sale.balance_amount = 500;

        let err = validate_new_sale(&sale).unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "customerId"));

        sale.customer_id = Some("c-1".to_string());
        assert!(validate_new_sale(&sale).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut sale = cash_sale(vec![item(1)]);
        sale.paid_amount = -5;
        assert!(validate_new_sale(&sale).is_err());
    }

    #[test]
    fn test_oversized_qty_rejected() {
        let err = validate_new_sale(&cash_sale(vec![item(MAX_ITEM_QUANTITY + 1)])).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_empty_item_list_is_allowed() {
        // A sale with no line items only records money movement.
        assert!(validate_new_sale(&cash_sale(vec![])).is_ok());
    }
}
