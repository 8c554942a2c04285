//! # Repository Module
//!
//! Repository implementations for database operations.
//!
//! ## Repository Pattern
//! Each entity gets a repository owning its SQL. Repositories are cheap to
//! construct (they clone the pool handle) and are handed out by
//! [`crate::Database`].
//!
//! - [`customer`] - Customer persistence; credit fields are mutated only
//!   by the sale orchestrator
//! - [`product`] - Product persistence and stock adjustment
//! - [`sale`] - Sale queries, reporting, and the sale orchestrator (the
//!   one transaction boundary in the system)

pub mod customer;
pub mod product;
pub mod sale;
