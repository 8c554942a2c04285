//! # Database Error Types
//!
//! Error types for storage operations, and the combined error surface of
//! the sale workflow.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                          │
//! │                                                                 │
//! │  SQLite Error (sqlx::Error)                                     │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  DbError (this module)  ← adds context and categorization       │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  StoreError (this module) ← merges with CoreError; carries      │
//! │       │                     the HTTP status mapping             │
//! │       ▼                                                         │
//! │  Transport serializes ApiEnvelope::err(message) with the status │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure inside the sale transaction is one of these typed
//! variants. The orchestrator returns early on any of them, which drops
//! the sqlx transaction and rolls everything back - errors are never
//! converted to responses inside the data layer.

use duka_core::CoreError;
use thiserror::Error;

// =============================================================================
// DbError
// =============================================================================

/// Storage operation errors.
///
/// These wrap sqlx errors and provide categorization the sale workflow
/// relies on (unique violations drive sale-number retries).
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate sale number (regenerated and retried by the orchestrator)
    /// - Duplicate customer phone or email
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether this is a unique violation on the named column.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field } if field.contains(column))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// StoreError
// =============================================================================

/// Combined error surface of the sale workflow and stock adjustment.
///
/// Domain rejections (credit denied, insufficient stock, missing entities)
/// and storage failures abort the transaction the same way; they differ
/// only in the status the transport reports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl StoreError {
    /// HTTP status for the `{error, data}` envelope.
    ///
    /// ## Mapping
    /// - 404: customer/product/sale not found
    /// - 403: credit request exceeds the limit (not retryable)
    /// - 409: insufficient stock, uniqueness violation
    /// - 400: request validation
    /// - 500: anything else
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Domain(err) => match err {
                CoreError::CustomerNotFound(_)
                | CoreError::ProductNotFound(_)
                | CoreError::SaleNotFound(_) => 404,
                CoreError::CreditDenied { .. } => 403,
                CoreError::InsufficientStock { .. } => 409,
                CoreError::Validation(_) => 400,
            },
            StoreError::Db(err) => match err {
                DbError::NotFound { .. } => 404,
                DbError::UniqueViolation { .. } => 409,
                _ => 500,
            },
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Db(err.into())
    }
}

impl From<duka_core::ValidationError> for StoreError {
    fn from(err: duka_core::ValidationError) -> Self {
        StoreError::Domain(err.into())
    }
}

/// Result type for the sale workflow.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err: StoreError = CoreError::CreditDenied {
            customer_id: "c-1".into(),
            requested: 150,
            limit: 100,
        }
        .into();
        assert_eq!(err.status_code(), 403);

        let err: StoreError = CoreError::CustomerNotFound("c-9".into()).into();
        assert_eq!(err.status_code(), 404);

        let err: StoreError = CoreError::InsufficientStock {
            product_id: "p-1".into(),
            available: 1,
            requested: 3,
        }
        .into();
        assert_eq!(err.status_code(), 409);

        let err: StoreError = DbError::Internal("disk".into()).into();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_unique_violation_column_match() {
        let err = DbError::UniqueViolation {
            field: "sales.sale_number".to_string(),
        };
        assert!(err.is_unique_violation_on("sale_number"));
        assert!(!err.is_unique_violation_on("phone"));
    }
}
