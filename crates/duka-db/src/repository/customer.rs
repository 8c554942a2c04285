//! # Customer Repository
//!
//! Database operations for customers.
//!
//! Credit fields (`max_credit_limit`, `unpaid_credit_amount`) are only
//! ever mutated inside the sale orchestrator's transaction; this
//! repository reads them but offers no standalone credit mutation.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use duka_core::{Customer, NewCustomer};

pub(crate) const CUSTOMER_COLUMNS: &str =
    "id, name, email, phone, max_credit_limit, unpaid_credit_amount, created_at, updated_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer: Option<Customer> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Inserted customer with generated ID
    /// * `Err(DbError::UniqueViolation)` - phone or email already in use
    pub async fn insert(&self, new: &NewCustomer) -> DbResult<Customer> {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            max_credit_limit: new.max_credit_limit,
            unpaid_credit_amount: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, email, phone,
                max_credit_limit, unpaid_credit_amount,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.max_credit_limit)
        .bind(customer.unpaid_credit_amount)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers: Vec<Customer> = sqlx::query_as(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Counts customers (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    fn new_customer(name: &str, phone: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: None,
            phone: Some(phone.to_string()),
            max_credit_limit: 100_000,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let created = repo.insert(&new_customer("Asha N.", "0700111222")).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Asha N.");
        assert_eq!(fetched.max_credit_limit, 100_000);
        assert_eq!(fetched.unpaid_credit_amount, 0);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.customers().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_phone_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&new_customer("Asha N.", "0700111222")).await.unwrap();
        let err = repo
            .insert(&new_customer("Okello B.", "0700111222"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&new_customer("Zawadi", "071")).await.unwrap();
        repo.insert(&new_customer("Amara", "072")).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Amara", "Zawadi"]);
    }
}
