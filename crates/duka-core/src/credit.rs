//! # Credit Authorization
//!
//! Pure decision logic for extending store credit.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Credit Extension Path                        │
//! │                                                                 │
//! │  Sale request with balance_amount > 0                           │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  Fetch customer (duka-db, inside the sale transaction)          │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  authorize(balance_amount, customer.max_credit_limit)  ◄── HERE │
//! │       │                                                         │
//! │       ├── Denied   → abort transaction, 403                     │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  Apply delta: max_credit_limit -= B, unpaid_credit_amount += B  │
//! │  (single guarded UPDATE, same transaction)                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decision is pure so the rule is testable without a database. The
//! storage layer re-checks the limit in its guarded UPDATE, which protects
//! against a concurrent sale consuming the limit after this decision.

use serde::{Deserialize, Serialize};

/// Outcome of a credit authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditDecision {
    /// The requested amount fits within the customer's remaining limit.
    Approved,
    /// The requested amount exceeds the remaining limit.
    Denied,
}

impl CreditDecision {
    #[inline]
    pub fn is_approved(&self) -> bool {
        matches!(self, CreditDecision::Approved)
    }
}

/// Decides whether a customer may receive `requested` additional credit.
///
/// Denied exactly when `requested > max_credit_limit`. A request equal to
/// the remaining limit is approved and exhausts it.
///
/// ## Example
/// ```rust
/// use duka_core::credit::{authorize, CreditDecision};
///
/// assert_eq!(authorize(50, 100), CreditDecision::Approved);
/// assert_eq!(authorize(100, 100), CreditDecision::Approved);
/// assert_eq!(authorize(150, 100), CreditDecision::Denied);
/// ```
#[inline]
pub fn authorize(requested: i64, max_credit_limit: i64) -> CreditDecision {
    if requested > max_credit_limit {
        CreditDecision::Denied
    } else {
        CreditDecision::Approved
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
