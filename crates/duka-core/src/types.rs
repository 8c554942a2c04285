//! # Domain Types
//!
//! Core domain types used throughout Duka POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                             │
//! │                                                                 │
//! │  ┌───────────────┐   ┌───────────────┐   ┌────────────────┐    │
//! │  │   Customer    │   │    Product    │   │     Sale       │    │
//! │  │ ───────────── │   │ ───────────── │   │ ────────────── │    │
//! │  │ id (UUID)     │   │ id (UUID)     │   │ id (UUID)      │    │
//! │  │ max_credit_   │   │ stock_qty     │   │ sale_number    │    │
//! │  │   limit       │   │ price         │   │ sale_amount    │    │
//! │  │ unpaid_credit │   │               │   │ balance_amount │    │
//! │  └───────────────┘   └───────────────┘   └───────┬────────┘    │
//! │                                                  │ 1..N        │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────▼────────┐    │
//! │  │   SaleType    │   │ PaymentMethod │   │   SaleItem     │    │
//! │  │ ───────────── │   │ ───────────── │   │ ────────────── │    │
//! │  │ PAID          │   │ CASH          │   │ product_id     │    │
//! │  │ CREDIT        │   │ MOBILEMONEY   │   │ qty            │    │
//! │  └───────────────┘   │ BANK          │   │ product_price  │    │
//! │                      └───────────────┘   └────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//! - `id`: UUID v4 string, immutable, used for relations
//! - Monetary fields: integers in the currency's minor unit (never floats)
//! - serde renames preserve the original wire shape: camelCase fields,
//!   UPPERCASE enum values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Mobile money transfer (MTN, Airtel, M-Pesa, ...).
    MobileMoney,
    /// Bank transfer.
    Bank,
}

// =============================================================================
// Sale Type
// =============================================================================

/// Whether a sale was settled in full or extends credit.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleType {
    /// Paid in full at the counter.
    Paid,
    /// Part of the amount is carried as customer credit.
    Credit,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer who may hold store credit.
///
/// The two credit fields move together and only through the sale
/// orchestrator's credit path: extending credit of amount B decrements
/// `max_credit_limit` and increments `unpaid_credit_amount` by B in the
/// same transaction.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Contact email. Unique when present.
    pub email: Option<String>,

    /// Contact phone. Unique when present.
    pub phone: Option<String>,

    /// Remaining credit capacity.
    pub max_credit_limit: i64,

    /// Running total of outstanding credit.
    pub unpaid_credit_amount: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on receipts.
    pub name: String,

    /// Optional product image URL.
    pub image_url: Option<String>,

    /// Unit price in the currency's minor unit.
    pub price: i64,

    /// Available quantity. Never negative.
    pub stock_qty: i64,

    /// Shop this product belongs to.
    pub shop_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// Created exactly once by the sale orchestrator and immutable thereafter.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// Human-readable sale number. Unique by storage constraint.
    pub sale_number: String,

    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,

    /// Total value of the sale.
    pub sale_amount: i64,

    /// Amount carried as customer credit. Positive means this sale
    /// extended credit.
    pub balance_amount: i64,

    /// Amount settled at the counter.
    pub paid_amount: i64,

    pub sale_type: SaleType,
    pub payment_method: PaymentMethod,

    /// External reference for non-cash payments (mobile money code, ...).
    pub transaction_code: Option<String>,

    pub shop_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,

    /// Quantity sold. The same amount was decremented from the product's
    /// stock in the transaction that created this row.
    pub qty: i64,

    /// Unit price at time of sale (frozen).
    pub product_price: i64,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Product image at time of sale (frozen).
    pub product_image: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale + Items
// =============================================================================

/// A sale together with its line items, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub sale_items: Vec<SaleItem>,
}

// =============================================================================
// Requests
// =============================================================================

/// A line item in an inbound sale request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    pub product_id: String,
    pub qty: i64,
    pub product_price: i64,
    pub product_name: String,
    pub product_image: Option<String>,
}

/// An inbound sale request.
///
/// Matches the `SaleRequestBody` wire shape: camelCase fields, amounts as
/// integers, ordered line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub sale_amount: i64,
    pub balance_amount: i64,
    pub paid_amount: i64,
    pub sale_type: SaleType,
    pub payment_method: PaymentMethod,
    pub transaction_code: Option<String>,
    pub shop_id: Option<String>,
    pub sale_items: Vec<NewSaleItem>,
}

impl NewSale {
    /// Whether this request extends customer credit.
    #[inline]
    pub fn extends_credit(&self) -> bool {
        self.balance_amount > 0
    }
}

/// Fields for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub max_credit_limit: i64,
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub stock_qty: i64,
    pub shop_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
