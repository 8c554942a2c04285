//! # Sale Repository
//!
//! Sale queries, reporting, and the sale orchestrator - the one place in
//! the system with multi-step coordination.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   create_sale Transaction                       │
//! │                                                                 │
//! │  BEGIN                                                          │
//! │    │                                                            │
//! │    ├── balance_amount > 0?                                      │
//! │    │     ├── fetch customer ──────────── absent → 404, abort    │
//! │    │     ├── authorize credit ────────── denied → 403, abort    │
//! │    │     └── guarded delta UPDATE:                              │
//! │    │           unpaid_credit_amount += B                        │
//! │    │           max_credit_limit     -= B                        │
//! │    │           WHERE max_credit_limit >= B                      │
//! │    │                                                            │
//! │    ├── INSERT sale (regenerate sale_number on collision,        │
//! │    │               bounded retries)                             │
//! │    │                                                            │
//! │    ├── per line item, in order:                                 │
//! │    │     ├── guarded decrement:                                 │
//! │    │     │     stock_qty -= qty WHERE stock_qty >= qty          │
//! │    │     │     (0 rows → 404 missing / 409 insufficient, abort) │
//! │    │     └── INSERT sale_item                                   │
//! │    │                                                            │
//! │  COMMIT ── then re-read the sale with its items                 │
//! │                                                                 │
//! │  Any error return drops the transaction → automatic rollback.   │
//! │  No partial sale, stock decrement, or credit grant survives.    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult, StoreError, StoreResult};
use crate::repository::customer::CUSTOMER_COLUMNS;
use duka_core::{
    authorize, categorize_sales, generate_sale_number, validation::validate_new_sale, CoreError,
    Customer, NewSale, PeriodReports, ReportPeriod, Sale, SaleItem, SaleSummary, SaleWithItems,
    SalesReport,
};

const SALE_COLUMNS: &str = "id, sale_number, customer_id, customer_name, customer_email, \
     sale_amount, balance_amount, paid_amount, sale_type, payment_method, \
     transaction_code, shop_id, created_at";

const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, product_id, qty, product_price, product_name, product_image, created_at";

/// How many sale numbers to try before giving up on the collision.
const SALE_NUMBER_ATTEMPTS: u32 = 5;

/// Repository for sale database operations and the checkout workflow.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Records a sale: the single atomic business operation of the system.
    ///
    /// Creates the sale and its items, decrements stock per line item and,
    /// when `balance_amount > 0`, extends customer credit - all inside one
    /// transaction. Any rejection aborts the whole thing; the caller sees
    /// either the full sale or an error with no observable side effects.
    ///
    /// ## Errors
    /// - `CustomerNotFound` (404): credit requested for an unknown customer
    /// - `CreditDenied` (403): `balance_amount` exceeds the remaining limit
    /// - `ProductNotFound` (404): a line item references an unknown product
    /// - `InsufficientStock` (409): a line item exceeds available stock
    /// - `Validation` (400): malformed request, rejected before the
    ///   transaction opens
    pub async fn create_sale(&self, req: &NewSale) -> StoreResult<SaleWithItems> {
        self.create_sale_numbered(req, generate_sale_number).await
    }

    /// [`create_sale`](Self::create_sale) with an injectable sale-number
    /// source, so collision handling is testable deterministically.
    async fn create_sale_numbered(
        &self,
        req: &NewSale,
        mut next_number: impl FnMut() -> String,
    ) -> StoreResult<SaleWithItems> {
        validate_new_sale(req)?;

        debug!(
            items = req.sale_items.len(),
            balance = req.balance_amount,
            "Creating sale"
        );

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        // Credit path. The pure authorization runs against the customer we
        // read; the guarded UPDATE re-checks the limit so a concurrent sale
        // that consumed it in the meantime still gets denied.
        if req.extends_credit() {
            let customer_id = req.customer_id.as_deref().unwrap_or_default();

            let customer: Option<Customer> =
                sqlx::query_as(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"))
                    .bind(customer_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let customer = customer
                .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

            if !authorize(req.balance_amount, customer.max_credit_limit).is_approved() {
                return Err(CoreError::CreditDenied {
                    customer_id: customer.id,
                    requested: req.balance_amount,
                    limit: customer.max_credit_limit,
                }
                .into());
            }

            let result = sqlx::query(
                r#"
                UPDATE customers
                SET unpaid_credit_amount = unpaid_credit_amount + ?1,
                    max_credit_limit = max_credit_limit - ?1,
                    updated_at = ?2
                WHERE id = ?3 AND max_credit_limit >= ?1
                "#,
            )
            .bind(req.balance_amount)
            .bind(now)
            .bind(&customer.id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(CoreError::CreditDenied {
                    customer_id: customer.id,
                    requested: req.balance_amount,
                    limit: customer.max_credit_limit,
                }
                .into());
            }

            debug!(customer_id = %customer_id, amount = req.balance_amount, "Credit extended");
        }

        // Sale insert. The sale number is random and only unique by DB
        // constraint; regenerate on collision, bounded.
        let mut sale = Sale {
            id: Uuid::new_v4().to_string(),
            sale_number: next_number(),
            customer_id: req.customer_id.clone(),
            customer_name: req.customer_name.clone(),
            customer_email: req.customer_email.clone(),
            sale_amount: req.sale_amount,
            balance_amount: req.balance_amount,
            paid_amount: req.paid_amount,
            sale_type: req.sale_type,
            payment_method: req.payment_method,
            transaction_code: req.transaction_code.clone(),
            shop_id: req.shop_id.clone(),
            created_at: now,
        };

        let mut attempts = 0;
        loop {
            match insert_sale(&mut tx, &sale).await {
                Ok(()) => break,
                Err(err) if err.is_unique_violation_on("sale_number") => {
                    attempts += 1;
                    if attempts >= SALE_NUMBER_ATTEMPTS {
                        return Err(err.into());
                    }
                    debug!(attempts, "Sale number collided, regenerating");
                    sale.sale_number = next_number();
                }
                Err(err) => return Err(err.into()),
            }
        }

        // Line items, in the order supplied: guarded stock decrement, then
        // the item row. A SaleItem never exists without its decrement.
        for item in &req.sale_items {
            decrement_stock(&mut tx, &item.product_id, item.qty, now).await?;

            let sale_item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: item.product_id.clone(),
                qty: item.qty,
                product_price: item.product_price,
                product_name: item.product_name.clone(),
                product_image: item.product_image.clone(),
                created_at: now,
            };
            insert_sale_item(&mut tx, &sale_item).await?;
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            sale_number = %sale.sale_number,
            items = req.sale_items.len(),
            "Sale recorded"
        );

        self.get_with_items(&sale.id).await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale: Option<Sale> =
            sqlx::query_as(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(sale)
    }

    /// Gets a sale together with its items.
    pub async fn get_with_items(&self, id: &str) -> StoreResult<SaleWithItems> {
        let sale = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))
            .map_err(StoreError::from)?;

        let sale_items = self.get_items(id).await?;

        Ok(SaleWithItems { sale, sale_items })
    }

    /// Gets all items for a sale, in the order they were supplied.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items: Vec<SaleItem> = sqlx::query_as(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY rowid"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists all sales newest-first, each with its items.
    pub async fn list(&self) -> DbResult<Vec<SaleWithItems>> {
        let sales: Vec<Sale> = sqlx::query_as(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(sales.len());
        for sale in sales {
            let sale_items = self.get_items(&sale.id).await?;
            result.push(SaleWithItems { sale, sale_items });
        }

        Ok(result)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Categorized report over a time window, optionally scoped to a shop.
    ///
    /// Bounds are half-open `[start, end)`; `None` means unbounded. The
    /// read is a consistent snapshot; no write coordination.
    pub async fn report(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        shop_id: Option<&str>,
    ) -> DbResult<SalesReport> {
        let summaries: Vec<SaleSummary> = sqlx::query_as(
            r#"
            SELECT shop_id, sale_amount, balance_amount, payment_method, sale_type
            FROM sales
            WHERE (?1 IS NULL OR created_at >= ?1)
              AND (?2 IS NULL OR created_at < ?2)
              AND (?3 IS NULL OR shop_id = ?3)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(shop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categorize_sales(summaries))
    }

    /// Reports for the standard dashboard windows (today, this week, this
    /// month, all time), optionally scoped to a shop.
    pub async fn period_reports(&self, shop_id: Option<&str>) -> DbResult<PeriodReports> {
        let now = Utc::now();

        let (today_start, today_end) = ReportPeriod::Today.bounds(now);
        let (week_start, week_end) = ReportPeriod::ThisWeek.bounds(now);
        let (month_start, month_end) = ReportPeriod::ThisMonth.bounds(now);

        Ok(PeriodReports {
            today: self.report(today_start, today_end, shop_id).await?,
            this_week: self.report(week_start, week_end, shop_id).await?,
            this_month: self.report(month_start, month_end, shop_id).await?,
            all_time: self.report(None, None, shop_id).await?,
        })
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Inserts the sale row.
async fn insert_sale(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, sale_number, customer_id, customer_name, customer_email,
            sale_amount, balance_amount, paid_amount,
            sale_type, payment_method, transaction_code, shop_id, created_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8,
            ?9, ?10, ?11, ?12, ?13
        )
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.sale_number)
    .bind(&sale.customer_id)
    .bind(&sale.customer_name)
    .bind(&sale.customer_email)
    .bind(sale.sale_amount)
    .bind(sale.balance_amount)
    .bind(sale.paid_amount)
    .bind(sale.sale_type)
    .bind(sale.payment_method)
    .bind(&sale.transaction_code)
    .bind(&sale.shop_id)
    .bind(sale.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts a sale item row.
async fn insert_sale_item(conn: &mut SqliteConnection, item: &SaleItem) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_items (
            id, sale_id, product_id, qty, product_price,
            product_name, product_image, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_id)
    .bind(&item.product_id)
    .bind(item.qty)
    .bind(item.product_price)
    .bind(&item.product_name)
    .bind(&item.product_image)
    .bind(item.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Atomic conditional stock decrement inside the checkout transaction.
///
/// Zero rows affected means either the product is missing (404) or the
/// guard `stock_qty >= qty` rejected the decrement (409); a re-read on the
/// same transaction disambiguates.
async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    qty: i64,
    now: DateTime<Utc>,
) -> StoreResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock_qty = stock_qty - ?1, updated_at = ?2
        WHERE id = ?3 AND stock_qty >= ?1
        "#,
    )
    .bind(qty)
    .bind(now)
    .bind(product_id)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from)?;

    if result.rows_affected() == 0 {
        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock_qty FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;

        return Err(match available {
            None => CoreError::ProductNotFound(product_id.to_string()),
            Some(available) => CoreError::InsufficientStock {
                product_id: product_id.to_string(),
                available,
                requested: qty,
            },
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use duka_core::{NewCustomer, NewProduct, NewSaleItem, PaymentMethod, Product, SaleType};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_customer(db: &Database, limit: i64) -> Customer {
        db.customers()
            .insert(&NewCustomer {
                name: "Asha N.".to_string(),
                email: None,
                phone: Some(format!("070{}", limit)),
                max_credit_limit: limit,
            })
            .await
            .unwrap()
    }

    async fn seed_product(db: &Database, name: &str, stock: i64) -> Product {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                image_url: None,
                price: 5_000,
                stock_qty: stock,
                shop_id: Some("shop-1".to_string()),
            })
            .await
            .unwrap()
    }

    fn line(product: &Product, qty: i64) -> NewSaleItem {
        NewSaleItem {
            product_id: product.id.clone(),
            qty,
            product_price: product.price,
            product_name: product.name.clone(),
            product_image: None,
        }
    }

    fn cash_sale(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            customer_id: None,
            customer_name: None,
            customer_email: None,
            sale_amount: items.iter().map(|i| i.qty * i.product_price).sum(),
            balance_amount: 0,
            paid_amount: items.iter().map(|i| i.qty * i.product_price).sum(),
            sale_type: SaleType::Paid,
            payment_method: PaymentMethod::Cash,
            transaction_code: None,
            shop_id: Some("shop-1".to_string()),
            sale_items: items,
        }
    }

    fn credit_sale(customer: &Customer, balance: i64, items: Vec<NewSaleItem>) -> NewSale {
        let total: i64 = items.iter().map(|i| i.qty * i.product_price).sum();
        NewSale {
            customer_id: Some(customer.id.clone()),
            customer_name: Some(customer.name.clone()),
            customer_email: customer.email.clone(),
            sale_amount: total,
            balance_amount: balance,
            paid_amount: total - balance,
            sale_type: SaleType::Credit,
            payment_method: PaymentMethod::Cash,
            transaction_code: None,
            shop_id: Some("shop-1".to_string()),
            sale_items: items,
        }
    }

    #[tokio::test]
    async fn test_cash_sale_creates_items_and_decrements_stock() {
        let db = test_db().await;
        let soap = seed_product(&db, "Soap Bar", 10).await;
        let rice = seed_product(&db, "Rice 5kg", 4).await;

        let sale = db
            .sales()
            .create_sale(&cash_sale(vec![line(&soap, 3), line(&rice, 1)]))
            .await
            .unwrap();

        // One item row per request line, in order.
        assert_eq!(sale.sale_items.len(), 2);
        assert_eq!(sale.sale_items[0].product_id, soap.id);
        assert_eq!(sale.sale_items[0].qty, 3);
        assert_eq!(sale.sale_items[1].product_id, rice.id);

        // Stock reduced by exactly the sold quantities.
        let soap_after = db.products().get_by_id(&soap.id).await.unwrap().unwrap();
        let rice_after = db.products().get_by_id(&rice.id).await.unwrap().unwrap();
        assert_eq!(soap_after.stock_qty, 7);
        assert_eq!(rice_after.stock_qty, 3);

        assert_eq!(
            sale.sale.sale_number.len(),
            duka_core::sale_number::SALE_NUMBER_LEN
        );
    }

    #[tokio::test]
    async fn test_credit_sale_moves_customer_credit() {
        // Customer with limit 100; sale with balance 50 and one line of
        // qty 2 against stock 10.
        let db = test_db().await;
        let customer = seed_customer(&db, 100).await;
        let product = seed_product(&db, "Sugar 1kg", 10).await;

        let sale = db
            .sales()
            .create_sale(&credit_sale(&customer, 50, vec![line(&product, 2)]))
            .await
            .unwrap();

        let customer_after = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(customer_after.max_credit_limit, 50);
        assert_eq!(customer_after.unpaid_credit_amount, 50);

        let product_after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product_after.stock_qty, 8);

        assert_eq!(sale.sale_items.len(), 1);
        assert_eq!(sale.sale_items[0].qty, 2);
        assert_eq!(sale.sale.balance_amount, 50);
    }

    #[tokio::test]
    async fn test_credit_over_limit_is_denied_with_no_side_effects() {
        // Customer with limit 100; requesting 150 must 403 and change nothing.
        let db = test_db().await;
        let customer = seed_customer(&db, 100).await;
        let product = seed_product(&db, "Sugar 1kg", 10).await;

        let err = db
            .sales()
            .create_sale(&credit_sale(&customer, 150, vec![line(&product, 2)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Domain(CoreError::CreditDenied {
                requested: 150,
                limit: 100,
                ..
            })
        ));
        assert_eq!(err.status_code(), 403);

        let customer_after = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(customer_after.max_credit_limit, 100);
        assert_eq!(customer_after.unpaid_credit_amount, 0);

        let product_after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product_after.stock_qty, 10);

        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_credit_sale_with_unknown_customer_is_not_found() {
        let db = test_db().await;
        let product = seed_product(&db, "Sugar 1kg", 10).await;

        let mut req = cash_sale(vec![line(&product, 1)]);
        req.customer_id = Some("ghost".to_string());
        req.balance_amount = 50;

        let err = db.sales().create_sale(&req).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Domain(CoreError::CustomerNotFound(_))
        ));
        assert_eq!(err.status_code(), 404);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_the_whole_sale() {
        // First line succeeds, second references a missing product. The
        // decrement applied for the first line must be rolled back, and so
        // must the credit grant.
        let db = test_db().await;
        let customer = seed_customer(&db, 100).await;
        let product = seed_product(&db, "Soap Bar", 10).await;

        let mut req = credit_sale(&customer, 40, vec![line(&product, 3)]);
        req.sale_items.push(NewSaleItem {
            product_id: "ghost".to_string(),
            qty: 1,
            product_price: 1_000,
            product_name: "Ghost".to_string(),
            product_image: None,
        });

        let err = db.sales().create_sale(&req).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(CoreError::ProductNotFound(_))
        ));

        // All-or-nothing: nothing committed.
        let product_after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product_after.stock_qty, 10);

        let customer_after = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(customer_after.max_credit_limit, 100);
        assert_eq!(customer_after.unpaid_credit_amount, 0);

        assert_eq!(db.sales().count().await.unwrap(), 0);
        let orphan_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphan_items, 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_aborts_with_conflict() {
        let db = test_db().await;
        let product = seed_product(&db, "Milk 500ml", 3).await;

        let err = db
            .sales()
            .create_sale(&cash_sale(vec![line(&product, 5)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Domain(CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));
        assert_eq!(err.status_code(), 409);

        let product_after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product_after.stock_qty, 3);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_sales_cannot_oversell() {
        // Combined quantity exceeds stock: at most one of the two requests
        // can succeed, and stock never goes negative.
        let db = test_db().await;
        let product = seed_product(&db, "Cooking Oil 1L", 3).await;

        let req_a = cash_sale(vec![line(&product, 2)]);
        let req_b = cash_sale(vec![line(&product, 2)]);

        let sales_a = db.sales();
        let sales_b = db.sales();
        let (res_a, res_b) = tokio::join!(sales_a.create_sale(&req_a), sales_b.create_sale(&req_b));

        let successes = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "only one sale fits in the available stock");

        let product_after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(product_after.stock_qty, 1);
        assert!(product_after.stock_qty >= 0);
    }

    #[tokio::test]
    async fn test_sale_numbers_are_distinct_and_persisted() {
        let db = test_db().await;
        let product = seed_product(&db, "Soap Bar", 10).await;

        let first = db
            .sales()
            .create_sale(&cash_sale(vec![line(&product, 1)]))
            .await
            .unwrap();
        let second = db
            .sales()
            .create_sale(&cash_sale(vec![line(&product, 1)]))
            .await
            .unwrap();

        assert_ne!(first.sale.sale_number, second.sale.sale_number);

        let fetched = db.sales().get_with_items(&first.sale.id).await.unwrap();
        assert_eq!(fetched.sale.sale_number, first.sale.sale_number);
    }

    #[tokio::test]
    async fn test_sale_number_collision_regenerates_and_commits() {
        let db = test_db().await;
        let product = seed_product(&db, "Soap Bar", 10).await;
        let sales = db.sales();

        // Occupy a sale number, then feed a generator that collides with
        // it on the first draw and yields a fresh number on the second.
        let taken = sales
            .create_sale_numbered(&cash_sale(vec![line(&product, 1)]), || "dup-number".to_string())
            .await
            .unwrap();
        assert_eq!(taken.sale.sale_number, "dup-number");

        let mut draws = 0;
        let sale = sales
            .create_sale_numbered(&cash_sale(vec![line(&product, 1)]), || {
                draws += 1;
                if draws == 1 {
                    "dup-number".to_string()
                } else {
                    "fresh-number".to_string()
                }
            })
            .await
            .unwrap();

        assert_eq!(sale.sale.sale_number, "fresh-number");
        assert_eq!(draws, 2);
        assert_eq!(sales.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sale_number_collisions_exhaust_as_conflict() {
        let db = test_db().await;
        let product = seed_product(&db, "Soap Bar", 10).await;
        let sales = db.sales();

        sales
            .create_sale_numbered(&cash_sale(vec![line(&product, 1)]), || "dup-number".to_string())
            .await
            .unwrap();

        // A generator that never stops colliding: the bounded retry gives
        // up and surfaces the uniqueness conflict; the aborted transaction
        // leaves no second sale behind.
        let mut draws = 0;
        let err = sales
            .create_sale_numbered(&cash_sale(vec![line(&product, 1)]), || {
                draws += 1;
                "dup-number".to_string()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Db(DbError::UniqueViolation { .. })
        ));
        assert_eq!(err.status_code(), 409);
        assert_eq!(draws as u32, SALE_NUMBER_ATTEMPTS);
        assert_eq!(sales.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_with_items_missing_sale() {
        let db = test_db().await;
        let err = db.sales().get_with_items("nope").await.unwrap_err();

        assert!(matches!(err, StoreError::Domain(CoreError::SaleNotFound(_))));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_list_returns_newest_first_with_items() {
        let db = test_db().await;
        let product = seed_product(&db, "Soap Bar", 10).await;
        let sales = db.sales();

        let first = sales.create_sale(&cash_sale(vec![line(&product, 1)])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = sales.create_sale(&cash_sale(vec![line(&product, 2)])).await.unwrap();

        let listed = sales.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].sale.id, second.sale.id);
        assert_eq!(listed[1].sale.id, first.sale.id);
        assert_eq!(listed[0].sale_items.len(), 1);
        assert_eq!(listed[0].sale_items[0].qty, 2);
    }

    #[tokio::test]
    async fn test_report_buckets_and_shop_filter() {
        let db = test_db().await;
        let customer = seed_customer(&db, 1_000).await;
        let product = seed_product(&db, "Soap Bar", 50).await;
        let sales = db.sales();

        // Cash sale in shop-1.
        sales.create_sale(&cash_sale(vec![line(&product, 1)])).await.unwrap();

        // Credit sale in shop-1.
        sales
            .create_sale(&credit_sale(&customer, 200, vec![line(&product, 1)]))
            .await
            .unwrap();

        // Mobile-money sale in shop-2.
        let mut mobile = cash_sale(vec![line(&product, 1)]);
        mobile.payment_method = PaymentMethod::MobileMoney;
        mobile.shop_id = Some("shop-2".to_string());
        sales.create_sale(&mobile).await.unwrap();

        let all = sales.report(None, None, None).await.unwrap();
        assert_eq!(all.total_sales.len(), 3);
        assert_eq!(all.sales_paid_in_cash.len(), 1);
        assert_eq!(all.sales_paid_in_credit.len(), 1);
        assert_eq!(all.sales_by_mobile_money.len(), 1);

        let shop_one = sales.report(None, None, Some("shop-1")).await.unwrap();
        assert_eq!(shop_one.total_sales.len(), 2);
        assert!(shop_one.sales_by_mobile_money.is_empty());

        // Everything was just created, so the dashboard windows agree.
        let periods = sales.period_reports(None).await.unwrap();
        assert_eq!(periods.today.total_sales.len(), 3);
        assert_eq!(periods.this_week.total_sales.len(), 3);
        assert_eq!(periods.this_month.total_sales.len(), 3);
        assert_eq!(periods.all_time.total_sales.len(), 3);
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_write() {
        let db = test_db().await;
        let product = seed_product(&db, "Soap Bar", 10).await;

        let err = db
            .sales()
            .create_sale(&cash_sale(vec![line(&product, 0)]))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }
}
