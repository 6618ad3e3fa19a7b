//! # Bill Repository (the bill record store)
//!
//! Read and insert operations for bills and their line items.
//!
//! ## Immutability
//! Bills are historical facts. This repository exposes INSERT (used only
//! by the billing coordinator, inside its transaction) and reads. There is
//! deliberately no update or delete; once a bill commits, its items, total
//! and date never change.
//!
//! ## Snapshot Reads
//! Line items are returned from their frozen snapshot columns; the product
//! catalog is never joined for display data, so renaming or soft-deleting
//! a product cannot change what an old receipt says.

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::shop::ShopRepository;
use shopledger_core::{Bill, BillDetail, BillItem};

const BILL_COLUMNS: &str = "id, shop_id, customer_name, customer_mobile, total_amount_paise, \
     payment_method, amount_paid_paise, bill_date, created_at";

const ITEM_COLUMNS: &str = "id, bill_id, product_id, sku_snapshot, name_snapshot, unit_snapshot, \
     unit_price_paise, quantity, line_total_paise, created_at";

/// Fallback shop name for bills whose shop row has been deleted. The FK
/// normally prevents that; this covers databases restored from partial
/// backups.
const MISSING_SHOP_LABEL: &str = "[unknown shop]";

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Gets a bill header by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets the line items of a bill, in insertion order.
    pub async fn get_items(&self, bill_id: &str) -> DbResult<Vec<BillItem>> {
        let items = sqlx::query_as::<_, BillItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM bill_items WHERE bill_id = ?1 ORDER BY created_at, id"
        ))
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a bill with its shop detail and line items - the receipt view.
    pub async fn get_detail(&self, id: &str) -> DbResult<Option<BillDetail>> {
        let Some(bill) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let items = self.get_items(&bill.id).await?;
        let shop = ShopRepository::fetch(&self.pool, &bill.shop_id).await?;

        let (shop_name, shop_location) = match shop {
            Some(s) => (s.name, s.location),
            None => (MISSING_SHOP_LABEL.to_string(), None),
        };

        Ok(Some(BillDetail {
            bill,
            shop_name,
            shop_location,
            items,
        }))
    }

    /// Lists the most recent bills, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Bill>> {
        let bills = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills ORDER BY bill_date DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bills)
    }

    /// Lists a shop's bills, newest first.
    pub async fn list_by_shop(&self, shop_id: &str, limit: u32) -> DbResult<Vec<Bill>> {
        let bills = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE shop_id = ?1 ORDER BY bill_date DESC LIMIT ?2"
        ))
        .bind(shop_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bills)
    }

    /// Counts all bills (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped operations (used by the billing coordinator)
    // =========================================================================

    /// Inserts a bill header on the given executor.
    pub async fn insert_bill(executor: impl SqliteExecutor<'_>, bill: &Bill) -> DbResult<()> {
        debug!(id = %bill.id, shop_id = %bill.shop_id, "Inserting bill");

        sqlx::query(
            "INSERT INTO bills (
                id, shop_id, customer_name, customer_mobile, total_amount_paise,
                payment_method, amount_paid_paise, bill_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&bill.id)
        .bind(&bill.shop_id)
        .bind(&bill.customer_name)
        .bind(&bill.customer_mobile)
        .bind(bill.total_amount_paise)
        .bind(bill.payment_method)
        .bind(bill.amount_paid_paise)
        .bind(bill.bill_date)
        .bind(bill.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts one snapshot line item on the given executor.
    pub async fn insert_item(executor: impl SqliteExecutor<'_>, item: &BillItem) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO bill_items (
                id, bill_id, product_id, sku_snapshot, name_snapshot, unit_snapshot,
                unit_price_paise, quantity, line_total_paise, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&item.id)
        .bind(&item.bill_id)
        .bind(&item.product_id)
        .bind(&item.sku_snapshot)
        .bind(&item.name_snapshot)
        .bind(&item.unit_snapshot)
        .bind(item.unit_price_paise)
        .bind(item.quantity)
        .bind(item.line_total_paise)
        .bind(item.created_at)
        .execute(executor)
        .await?;

        Ok(())
    }
}
