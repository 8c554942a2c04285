//! # duka-core: Pure Business Logic for Duka POS
//!
//! This crate is the **heart** of the Duka POS backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Duka POS Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Transport (out of scope)                    │   │
//! │  │    POST /sales, GET /sales, GET /sales/report, ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ duka-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────────┐ ┌──────────────┐  │   │
//! │  │  │  types  │ │ credit  │ │ sale_number │ │    report    │  │   │
//! │  │  │Customer │ │authorize│ │  generator  │ │ categorize   │  │   │
//! │  │  │ Product │ │         │ │             │ │   periods    │  │   │
//! │  │  │  Sale   │ └─────────┘ └─────────────┘ └──────────────┘  │   │
//! │  │  └─────────┘                                               │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  duka-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, sale orchestration       │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Sale, SaleItem, ...)
//! - [`credit`] - Credit authorization decision
//! - [`sale_number`] - Sale-number generation
//! - [`report`] - Sales report categorization and period bounds
//! - [`validation`] - Business rule validation
//! - [`envelope`] - `{error, data}` JSON envelope
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic business logic, randomness isolated
//!    to [`sale_number`]
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are integers in the currency's
//!    minor unit (no floating point)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credit;
pub mod envelope;
pub mod error;
pub mod report;
pub mod sale_number;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use credit::{authorize, CreditDecision};
pub use envelope::ApiEnvelope;
pub use error::{CoreError, ValidationError};
pub use report::{categorize_sales, PeriodReports, ReportPeriod, SaleSummary, SalesReport};
pub use sale_number::generate_sale_number;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale request.
///
/// ## Business Reason
/// Prevents runaway requests and keeps transactions short-lived.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
