//! # Product Repository
//!
//! Database operations for products, including stock adjustment.
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Stock Update Strategy                         │
//! │                                                                 │
//! │  ❌ WRONG: read-modify-write (races under concurrency)          │
//! │     let p = get(id); update(id, p.stock_qty - 3);               │
//! │                                                                 │
//! │  ✅ CORRECT: guarded relative delta                             │
//! │     UPDATE products                                             │
//! │     SET stock_qty = stock_qty + ?delta                          │
//! │     WHERE id = ? AND stock_qty + ?delta >= 0                    │
//! │                                                                 │
//! │  Two concurrent sales of the last unit: the guard lets exactly  │
//! │  one through; the other sees zero rows affected and fails with  │
//! │  InsufficientStock.                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbResult, StoreError, StoreResult};
use duka_core::{CoreError, NewProduct, Product};

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, image_url, price, stock_qty, shop_id, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            image_url: new.image_url.clone(),
            price: new.price,
            stock_qty: new.stock_qty,
            shop_id: new.shop_id.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, image_url, price, stock_qty, shop_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.image_url)
        .bind(product.price)
        .bind(product.stock_qty)
        .bind(&product.shop_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Adjusts product stock by a relative delta.
    ///
    /// Negative deltas (sales, spoilage) are guarded so stock never goes
    /// below zero; positive deltas restock. The guard and the delta are one
    /// atomic statement, so concurrent adjustments cannot overdraw.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the product after the adjustment
    /// * `Err(ProductNotFound)` - no such product
    /// * `Err(InsufficientStock)` - the delta would drive stock negative
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<Product> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_qty = stock_qty + ?2, updated_at = ?3
            WHERE id = ?1 AND stock_qty + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(crate::error::DbError::from)?;

        if result.rows_affected() == 0 {
            // Disambiguate: missing row vs guard rejection.
            return Err(match self.get_by_id(id).await? {
                None => StoreError::Domain(CoreError::ProductNotFound(id.to_string())),
                Some(product) => StoreError::Domain(CoreError::InsufficientStock {
                    product_id: id.to_string(),
                    available: product.stock_qty,
                    requested: -delta,
                }),
            });
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::Domain(CoreError::ProductNotFound(id.to_string())))
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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
    use crate::pool::{Database, DbConfig};

    fn new_product(name: &str, stock_qty: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            image_url: None,
            price: 2_500,
            stock_qty,
            shop_id: Some("shop-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.insert(&new_product("Soap Bar", 10)).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(fetched.name, "Soap Bar");
        assert_eq!(fetched.stock_qty, 10);
    }

    #[tokio::test]
    async fn test_adjust_stock_decrement_and_restock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&new_product("Rice 5kg", 10)).await.unwrap();

        let after_sale = repo.adjust_stock(&product.id, -3).await.unwrap();
        assert_eq!(after_sale.stock_qty, 7);

        let after_restock = repo.adjust_stock(&product.id, 20).await.unwrap();
        assert_eq!(after_restock.stock_qty, 27);
    }

    #[tokio::test]
    async fn test_adjust_stock_rejects_overdraw() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(&new_product("Milk 500ml", 2)).await.unwrap();
        let err = repo.adjust_stock(&product.id, -5).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Domain(CoreError::InsufficientStock {
                available: 2,
                requested: 5,
                ..
            })
        ));

        // Stock untouched by the rejected adjustment.
        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock_qty, 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().adjust_stock("ghost", -1).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Domain(CoreError::ProductNotFound(_))
        ));
    }
}
