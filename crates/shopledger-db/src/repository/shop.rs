//! # Shop Repository
//!
//! Database operations for shops (billing terminal locations).
//!
//! Shops are plain reference data: the billing transaction reads them to
//! verify the target exists but never writes them.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopledger_core::Shop;

const SHOP_COLUMNS: &str = "id, name, location, created_at, updated_at";

/// Repository for shop database operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Gets a shop by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shop>> {
        Self::fetch(&self.pool, id).await
    }

    /// Gets a shop by its unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shop)
    }

    /// Lists all shops sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Shop>> {
        let shops = sqlx::query_as::<_, Shop>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(shops)
    }

    /// Inserts a new shop.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - shop name already exists
    pub async fn insert(&self, shop: &Shop) -> DbResult<()> {
        debug!(name = %shop.name, "Inserting shop");

        sqlx::query(
            "INSERT INTO shops (id, name, location, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&shop.id)
        .bind(&shop.name)
        .bind(&shop.location)
        .bind(shop.created_at)
        .bind(shop.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a shop's name and location.
    pub async fn update(&self, shop: &Shop) -> DbResult<()> {
        debug!(id = %shop.id, "Updating shop");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE shops SET name = ?2, location = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(&shop.id)
        .bind(&shop.name)
        .bind(&shop.location)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", &shop.id));
        }

        Ok(())
    }

    /// Deletes a shop.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - bills still reference this
    ///   shop; historical bills pin their shop row
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting shop");

        let result = sqlx::query("DELETE FROM shops WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", id));
        }

        Ok(())
    }

    /// Fetches a shop on the given executor (used inside the billing
    /// transaction).
    pub async fn fetch(executor: impl SqliteExecutor<'_>, id: &str) -> DbResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(shop)
    }
}
