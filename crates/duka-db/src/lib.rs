//! # duka-db: Database Layer for Duka POS
//!
//! This crate provides database access for the Duka POS backend.
//! It uses SQLite for local storage with sqlx for async operations, and
//! hosts the sale orchestrator - the one multi-step transaction in the
//! system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka POS Data Flow                               │
//! │                                                                         │
//! │  Transport request (POST /sales, GET /sales/report, ...)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      duka-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ CustomerRepo  │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_init.sql │   │   │
//! │  │   │ Connection    │    │ SaleRepo ★    │    │ ...          │   │   │
//! │  │   │ Management    │    │ (orchestrator)│    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and workflow error types
//! - [`repository`] - Repository implementations (customer, product, sale)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duka_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/duka.db")).await?;
//!
//! // The sale orchestrator: atomic credit + stock + sale creation
//! let sale = db.sales().create_sale(&request).await?;
//!
//! // Reporting
//! let report = db.sales().period_reports(None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
