//! # Product Repository (the product ledger)
//!
//! Database operations for the shared product catalog and its stock levels.
//!
//! ## Stock Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              Who may touch products.stock_level                 │
//! │                                                                 │
//! │  Billing transaction ──► decrement_stock_if_sufficient()        │
//! │                          (conditional UPDATE, tx-scoped)        │
//! │                                                                 │
//! │  Admin stock screens ──► set_stock() / adjust_stock()           │
//! │                          (outside billing)                      │
//! │                                                                 │
//! │  ❌ NEVER: read stock, subtract in memory, write it back.       │
//! │     That loses updates under concurrent bills:                  │
//! │                                                                 │
//! │     Terminal A reads 10 ──► writes 10-6 = 4                     │
//! │     Terminal B reads 10 ──► writes 10-6 = 4   ← oversold!       │
//! │                                                                 │
//! │  ✅ The conditional decrement only applies when the stock is    │
//! │     still sufficient AT WRITE TIME:                             │
//! │                                                                 │
//! │     UPDATE products SET stock_level = stock_level - 6           │
//! │     WHERE id = ? AND stock_level >= 6                           │
//! │                                                                 │
//! │     Terminal A: 1 row affected  → 4 left                        │
//! │     Terminal B: 0 rows affected → InsufficientStock             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopledger_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, category, sku, net_price_paise, selling_price_paise, \
     stock_level, stock_alert_threshold, unit, product_type, is_active, created_at, updated_at";

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

    /// Gets a product by its ID (including soft-deleted ones).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Self::fetch(&self.pool, id).await
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products sorted by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists active products at or below their alert threshold, most
    /// depleted first. Feeds the admin low-stock screen.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND stock_level <= stock_alert_threshold \
             ORDER BY stock_level ASC, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name or SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, name, category, sku, net_price_paise, selling_price_paise,
                stock_level, stock_alert_threshold, unit, product_type,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.sku)
        .bind(product.net_price_paise)
        .bind(product.selling_price_paise)
        .bind(product.stock_level)
        .bind(product.stock_alert_threshold)
        .bind(&product.unit)
        .bind(product.product_type)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's catalog fields.
    ///
    /// Does NOT touch stock_level - stock moves only through the dedicated
    /// operations below.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = ?2,
                category = ?3,
                sku = ?4,
                net_price_paise = ?5,
                selling_price_paise = ?6,
                stock_alert_threshold = ?7,
                unit = ?8,
                product_type = ?9,
                is_active = ?10,
                updated_at = ?11
            WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.sku)
        .bind(product.net_price_paise)
        .bind(product.selling_price_paise)
        .bind(product.stock_alert_threshold)
        .bind(&product.unit)
        .bind(product.product_type)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Sets a product's stock to an absolute level (admin stock screen).
    pub async fn set_stock(&self, id: &str, stock_level: i64) -> DbResult<()> {
        debug!(id = %id, stock_level = %stock_level, "Setting stock");

        if stock_level < 0 {
            return Err(DbError::QueryFailed(
                "stock level cannot be negative".to_string(),
            ));
        }

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock_level = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock_level)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Applies a stock delta (positive for restocking, negative for
    /// corrections). Refuses to take the stock below zero.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET stock_level = stock_level + ?2, updated_at = ?3
             WHERE id = ?1 AND stock_level + ?2 >= 0",
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing product from an adjustment that would
            // have gone negative.
            return match Self::fetch(&self.pool, id).await? {
                None => Err(DbError::not_found("Product", id)),
                Some(p) => Err(DbError::QueryFailed(format!(
                    "stock adjustment of {} would take {} below zero (current {})",
                    delta, p.sku, p.stock_level
                ))),
            };
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// Historical bills still reference this product; their line items keep
    /// a snapshot, but the row stays for reporting and undeletion.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations (used by the billing coordinator)
    // =========================================================================

    /// Fetches a product on the given executor, so a transaction sees its
    /// own consistent snapshot.
    pub async fn fetch(
        executor: impl SqliteExecutor<'_>,
        id: &str,
    ) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    /// Conditionally decrements a product's stock.
    ///
    /// The decrement only applies if the stock is still sufficient at
    /// write time, closing the read-check-then-write race between
    /// concurrent bills.
    ///
    /// ## Returns
    /// * `Ok(true)` - decrement applied
    /// * `Ok(false)` - stock was no longer sufficient; nothing changed
    pub async fn decrement_stock_if_sufficient(
        executor: impl SqliteExecutor<'_>,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity = %quantity, "Conditional stock decrement");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET stock_level = stock_level - ?2, updated_at = ?3
             WHERE id = ?1 AND stock_level >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
